//! Traductions consommées par le contrôleur

use std::collections::HashMap;

use anyhow::{Context, Result};

/// Service de traduction consommé par le contrôleur
pub trait Translator {
    /// Traduction immédiate d'une clé (la clé elle-même à défaut)
    fn instant(&self, key: &str) -> String;
}

/// Catalogue statique de traductions, clés aplaties façon `ngx-translate`
/// (`Synthese.Map.SeveralValues`)
#[derive(Debug, Clone, Default)]
pub struct StaticTranslator {
    catalog: HashMap<String, String>,
}

impl StaticTranslator {
    /// Catalogue français embarqué
    pub fn french() -> Result<Self> {
        Self::from_json(include_str!("fr.json")).context("Failed to parse embedded fr catalog")
    }

    /// Catalogue vide : chaque clé se traduit par elle-même
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_json(json: &str) -> Result<Self> {
        let catalog: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { catalog })
    }
}

impl Translator for StaticTranslator {
    fn instant(&self, key: &str) -> String {
        self.catalog
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
