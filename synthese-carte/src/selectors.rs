//! Sélecteurs de requête, mis à jour par copie
//!
//! Le service de requête externe consomme un jeu de sélecteurs
//! clé/valeur ; chaque mise à jour produit un nouveau jeu, l'original
//! restant inchangé.

use std::collections::BTreeMap;

/// Jeu de sélecteurs transmis au service de requête
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorSet {
    entries: BTreeMap<String, String>,
}

impl SelectorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retourne un nouveau jeu avec la clé positionnée
    #[must_use]
    pub fn set(&self, key: &str, value: &str) -> Self {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), value.to_string());
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_returns_new_set() {
        let original = SelectorSet::new();
        let updated = original.set("format", "grouped_geom");

        assert!(original.get("format").is_none());
        assert_eq!(updated.get("format"), Some("grouped_geom"));
    }

    #[test]
    fn test_set_overwrites_key() {
        let selectors = SelectorSet::new()
            .set("format", "grouped_geom")
            .set("format", "grouped_geom_by_areas");

        assert_eq!(selectors.get("format"), Some("grouped_geom_by_areas"));
        assert_eq!(selectors.len(), 1);
    }
}
