//! Types d'erreurs pour le crate critere

use thiserror::Error;

/// Erreurs pouvant survenir lors de la préparation ou du rendu des critères
#[derive(Debug, Error)]
pub enum CritereError {
    /// Couleur hexadécimale invalide (attendu: #RGB ou #RRGGBB)
    #[error("Invalid hex color format: {0}")]
    InvalidColorFormat(String),

    /// Liste de classes de légende vide en mode agrégation par maille
    #[error("Area aggregation legend classes list is empty")]
    EmptyLegendClasses,

    /// Code de critère inconnu
    #[error("Unknown criterion code: {0}")]
    UnknownCriterion(String),

    /// Configuration invalide
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },
}

impl CritereError {
    /// Crée une erreur de configuration avec contexte
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
