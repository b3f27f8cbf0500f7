//! Configuration de la carte de synthèse
//!
//! La configuration reprend les clés `SYNTHESE` de GeoNature
//! (SCREAMING_SNAKE_CASE) : activation de l'agrégation par mailles,
//! classes de la légende par nombre d'observations et liste des
//! critères d'affichage configurés.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use critere::{
    is_valid_hex, CritereError, Criterion, CriterionKind, LegendClass, StyleOverrides, ValueRule,
    AREA_AGGREGATION_CRITERIA_CODE, DEFAULT_CRITERIA_CODE,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration complète de la carte
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct SyntheseConfig {
    /// Agrégation par mailles disponible
    pub area_aggregation_enabled: bool,
    /// Agrégation par mailles sélectionnée au chargement
    pub area_aggregation_by_default: bool,
    /// Classes de la légende d'agrégation, seuil minimal et couleur
    pub area_aggregation_legend_classes: Vec<LegendClass>,
    /// Critères d'affichage configurés, indexés par code
    pub map_criteria_list: BTreeMap<String, CriterionConfig>,
}

/// Déclaration d'un critère dans la configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionConfig {
    /// Critère proposé à l'utilisateur
    #[serde(default = "default_true")]
    pub activate: bool,
    /// Critère sélectionné au chargement
    #[serde(default)]
    pub default: bool,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: CriterionKind,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub values: Vec<ValueRule>,
    #[serde(default)]
    pub styles: StyleOverrides,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}

impl CriterionConfig {
    /// Critère prêt à être sélectionné
    pub fn to_criterion(&self, code: &str) -> Criterion {
        Criterion {
            code: code.to_string(),
            label: Some(self.label.clone()),
            kind: Some(self.kind),
            field: self.field.clone(),
            values: self.values.clone(),
            styles: self.styles.clone(),
            description: self.description.clone(),
        }
    }
}

impl SyntheseConfig {
    /// Charge une configuration depuis un fichier JSON
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        debug!(
            criteria = config.map_criteria_list.len(),
            "Loaded config from {}",
            path.display()
        );
        Ok(config)
    }

    /// Charge une configuration embarquée
    pub fn from_preset(name: &str) -> Result<Self> {
        let content = match name {
            "default" => include_str!("presets/default.json"),
            "demo" => include_str!("presets/demo.json"),
            _ => bail!("Unknown preset '{}' (available: default, demo)", name),
        };
        serde_json::from_str(content).with_context(|| format!("Failed to parse preset '{}'", name))
    }

    /// Valide et normalise la configuration.
    ///
    /// Les classes de légende sont triées par seuil décroissant, l'ordre
    /// attendu par la recherche de couleur.
    pub fn validate(&mut self) -> Result<(), CritereError> {
        if self.area_aggregation_enabled && self.area_aggregation_legend_classes.is_empty() {
            return Err(CritereError::EmptyLegendClasses);
        }
        self.area_aggregation_legend_classes
            .sort_by(|a, b| b.min.cmp(&a.min));
        for class in &self.area_aggregation_legend_classes {
            if !is_valid_hex(&class.color) {
                return Err(CritereError::InvalidColorFormat(class.color.clone()));
            }
        }

        for (code, criterion) in &self.map_criteria_list {
            if code == DEFAULT_CRITERIA_CODE || code == AREA_AGGREGATION_CRITERIA_CODE {
                return Err(CritereError::invalid_config(
                    "MAP_CRITERIA_LIST",
                    format!("code '{}' is reserved", code),
                ));
            }
            if criterion.activate && criterion.values.is_empty() {
                return Err(CritereError::invalid_config(
                    "MAP_CRITERIA_LIST",
                    format!("criterion '{}' is active but has no values", code),
                ));
            }
            for rule in &criterion.values {
                if !is_valid_hex(&rule.color) {
                    return Err(CritereError::InvalidColorFormat(rule.color.clone()));
                }
            }
        }
        Ok(())
    }

    /// Critère sélectionné au chargement de la carte
    pub fn initial_criterion(&self) -> Criterion {
        if self.area_aggregation_enabled && self.area_aggregation_by_default {
            return Criterion::area_aggregation();
        }
        self.map_criteria_list
            .iter()
            .find(|(_, c)| c.activate && c.default)
            .map(|(code, c)| c.to_criterion(code))
            .unwrap_or_else(Criterion::default_display)
    }

    /// Critère désigné par son code
    pub fn criterion_by_code(&self, code: &str) -> Result<Criterion, CritereError> {
        if code == DEFAULT_CRITERIA_CODE {
            return Ok(Criterion::default_display());
        }
        if code == AREA_AGGREGATION_CRITERIA_CODE {
            if !self.area_aggregation_enabled {
                return Err(CritereError::UnknownCriterion(code.to_string()));
            }
            return Ok(Criterion::area_aggregation());
        }
        self.map_criteria_list
            .get(code)
            .filter(|c| c.activate)
            .map(|c| c.to_criterion(code))
            .ok_or_else(|| CritereError::UnknownCriterion(code.to_string()))
    }

    /// Critères sélectionnables, dans l'ordre d'affichage
    pub fn available_criteria(&self) -> Vec<Criterion> {
        let mut criteria = vec![Criterion::default_display()];
        if self.area_aggregation_enabled {
            criteria.push(Criterion::area_aggregation());
        }
        criteria.extend(
            self.map_criteria_list
                .iter()
                .filter(|(_, c)| c.activate)
                .map(|(code, c)| c.to_criterion(code)),
        );
        criteria
    }
}
