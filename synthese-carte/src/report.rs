//! Rapport de rendu
//!
//! Collecte les compteurs et les avertissements d'un passage de rendu
//! sur un lot de fichiers GeoJSON, pour affichage console ou export
//! JSON.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

/// Statut global du rendu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenderStatus {
    /// Rendu réussi sans erreur
    Success,
    /// Rendu réussi mais certains fichiers ont échoué
    PartialSuccess,
    /// Rendu échoué
    Failed,
}

/// Avertissement de rendu, rattaché à un fichier source
#[derive(Debug, Clone, Serialize)]
pub struct RenderWarning {
    /// Fichier source
    pub file: String,
    /// Message d'avertissement
    pub message: String,
}

/// Rapport complet d'un passage de rendu
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    /// Code du critère appliqué
    pub criterion: String,
    /// Durée du rendu
    pub duration_secs: f64,
    /// Statut global
    pub status: RenderStatus,

    /// Nombre de fichiers traités
    pub files_processed: usize,
    /// Nombre de fichiers en erreur
    pub files_failed: usize,
    /// Nombre de features chargées
    pub features: usize,
    /// Nombre de features ayant reçu un style
    pub styled: usize,
    /// Nombre de features restées au style d'origine
    pub unstyled: usize,

    /// Liste des avertissements
    pub warnings: Vec<RenderWarning>,
    /// Messages d'erreur des fichiers en échec
    pub errors: Vec<String>,
}

impl RenderReport {
    /// Crée un nouveau rapport pour un critère
    pub fn new(criterion: &str) -> Self {
        Self {
            criterion: criterion.to_string(),
            duration_secs: 0.0,
            status: RenderStatus::Success,
            files_processed: 0,
            files_failed: 0,
            features: 0,
            styled: 0,
            unstyled: 0,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Enregistre un fichier traité avec succès
    pub fn record_file_success(&mut self, features: usize, styled: usize) {
        self.files_processed += 1;
        self.features += features;
        self.styled += styled;
        self.unstyled += features.saturating_sub(styled);
    }

    /// Enregistre un fichier en échec
    pub fn record_file_failure(&mut self, file: &str, message: &str) {
        self.files_processed += 1;
        self.files_failed += 1;
        self.errors.push(format!("[{}] {}", file, message));
    }

    /// Enregistre un avertissement
    pub fn record_warning(&mut self, file: &str, message: &str) {
        self.warnings.push(RenderWarning {
            file: file.to_string(),
            message: message.to_string(),
        });
    }

    /// Fusionne les compteurs d'un rapport partiel (traitement parallèle)
    pub fn merge(&mut self, other: RenderReport) {
        self.files_processed += other.files_processed;
        self.files_failed += other.files_failed;
        self.features += other.features;
        self.styled += other.styled;
        self.unstyled += other.unstyled;
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
    }

    /// Définit la durée du rendu
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final basé sur les échecs
    pub fn finalize(&mut self) {
        self.status = if self.files_failed == 0 {
            RenderStatus::Success
        } else if self.files_failed < self.files_processed {
            RenderStatus::PartialSuccess
        } else {
            RenderStatus::Failed
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("RENDER REPORT - Criterion {}", self.criterion);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- SUMMARY ---");
        println!(
            "Files: {} processed, {} failed",
            self.files_processed, self.files_failed
        );
        println!(
            "Features: {} loaded, {} styled, {} unstyled",
            self.features, self.styled, self.unstyled
        );

        if !self.warnings.is_empty() {
            println!("\n--- WARNINGS ({}) ---", self.warnings.len());
            for w in self.warnings.iter().take(10) {
                println!("  [{}] {}", w.file, w.message);
            }
            if self.warnings.len() > 10 {
                println!("  ... and {} more", self.warnings.len() - 10);
            }
        }

        if !self.errors.is_empty() {
            println!("\n--- ERRORS ({}) ---", self.errors.len());
            for e in self.errors.iter().take(20) {
                println!("  {}", e);
            }
            if self.errors.len() > 20 {
                println!("  ... and {} more", self.errors.len() - 20);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {} files, {} features, {} styled, {} errors",
            self.criterion,
            self.files_processed,
            self.features,
            self.styled,
            self.errors.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_file_success() {
        let mut report = RenderReport::new("area-aggregation");
        report.record_file_success(10, 8);
        report.record_file_success(5, 5);

        assert_eq!(report.files_processed, 2);
        assert_eq!(report.features, 15);
        assert_eq!(report.styled, 13);
        assert_eq!(report.unstyled, 2);
    }

    #[test]
    fn test_merge() {
        let mut total = RenderReport::new("statut");
        let mut partial = RenderReport::new("statut");
        partial.record_file_success(4, 3);
        partial.record_file_failure("bad.geojson", "not valid GeoJSON");

        total.merge(partial);
        assert_eq!(total.files_processed, 2);
        assert_eq!(total.files_failed, 1);
        assert_eq!(total.errors.len(), 1);
    }

    #[test]
    fn test_finalize_statuses() {
        let mut report = RenderReport::new("statut");
        report.record_file_success(1, 1);
        report.finalize();
        assert_eq!(report.status, RenderStatus::Success);

        report.record_file_failure("a.geojson", "boom");
        report.finalize();
        assert_eq!(report.status, RenderStatus::PartialSuccess);

        let mut report = RenderReport::new("statut");
        report.record_file_failure("a.geojson", "boom");
        report.finalize();
        assert_eq!(report.status, RenderStatus::Failed);
    }

    #[test]
    fn test_save_to_file() {
        let mut report = RenderReport::new("statut");
        report.record_file_success(2, 2);
        report.finalize();

        let path = std::env::temp_dir().join("synthese_report_test.json");
        report.save_to_file(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"criterion\": \"statut\""));
        std::fs::remove_file(&path).ok();
    }
}
