//! Préparation des règles de style d'un critère
//!
//! Fusionne, par règle et en précédence croissante : le style de base,
//! le style d'origine courant (marqueurs ou mailles), les surcharges du
//! critère puis celles de la règle, et force enfin le remplissage avec
//! la couleur de la règle. Une règle joker (`*`) est ajoutée en fin de
//! liste pour les géométries portant plusieurs valeurs distinctes.
//!
//! Fonction pure : préparer deux fois le même critère produit un
//! résultat identique. Le cache est tenu par le contrôleur, indexé par
//! code de critère, à côté du critère lui-même.

use std::collections::HashMap;

use tracing::debug;

use crate::types::{Criterion, CriterionKind, RuleValue, Style, StyleOverrides, ValueRule};
use crate::WILDCARD_VALUE;

/// Règle prête à l'emploi : valeurs couvertes + style fusionné
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRule {
    pub values: Vec<String>,
    pub label: String,
    pub description: Option<String>,
    pub style: Style,
}

/// Critère préparé : règles fusionnées + index valeur individuelle → règle
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCriterion {
    pub code: String,
    pub label: Option<String>,
    pub kind: Option<CriterionKind>,
    pub field: Option<String>,
    /// Règles dans l'ordre de la configuration, joker en dernier
    pub rules: Vec<PreparedRule>,
    by_value: HashMap<String, usize>,
}

impl PreparedCriterion {
    /// Règle couvrant une valeur individuelle (`*` comprise)
    pub fn rule_for(&self, value: &str) -> Option<&PreparedRule> {
        self.by_value.get(value).map(|&index| &self.rules[index])
    }

    /// Valeurs individuelles indexées, joker exclu (ordre non garanti)
    pub fn class_values(&self) -> impl Iterator<Item = &str> {
        self.by_value
            .keys()
            .map(String::as_str)
            .filter(|value| *value != WILDCARD_VALUE)
    }
}

/// Prépare les règles de style d'un critère.
///
/// # Arguments
///
/// * `criterion` - Le critère issu de la configuration
/// * `origin` - Le style d'origine actif (marqueurs par défaut, ou
///   mailles si l'agrégation est active)
/// * `several_values_label` - Libellé traduit de la règle joker
pub fn prepare(
    criterion: &Criterion,
    origin: &StyleOverrides,
    several_values_label: &str,
) -> PreparedCriterion {
    let mut base = Style::default();
    origin.apply(&mut base);
    criterion.styles.apply(&mut base);

    let wildcard = wildcard_rule(several_values_label);

    let mut rules = Vec::with_capacity(criterion.values.len() + 1);
    let mut by_value = HashMap::new();

    for rule in criterion.values.iter().chain(std::iter::once(&wildcard)) {
        let mut style = base.clone();
        rule.styles.apply(&mut style);
        // Le remplissage est toujours forcé avec la couleur de la règle
        style.fill = true;
        style.fill_color = rule.color.clone();

        let index = rules.len();
        for value in rule.value.values() {
            by_value.insert(value.clone(), index);
        }

        rules.push(PreparedRule {
            values: rule.value.values().to_vec(),
            label: rule.label.clone(),
            description: rule.description.clone(),
            style,
        });
    }

    debug!(
        code = criterion.code.as_str(),
        rules = rules.len(),
        "Prepared criteria values"
    );

    PreparedCriterion {
        code: criterion.code.clone(),
        label: criterion.label.clone(),
        kind: criterion.kind,
        field: criterion.field.clone(),
        rules,
        by_value,
    }
}

/// Règle joker appliquée aux géométries à valeurs multiples
fn wildcard_rule(label: &str) -> ValueRule {
    ValueRule {
        value: RuleValue::Single(WILDCARD_VALUE.to_string()),
        label: label.to_string(),
        color: "#ffffff".to_string(),
        description: None,
        styles: StyleOverrides {
            weight: Some(1.0),
            color: Some("#a9a9a9".to_string()),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_criterion() -> Criterion {
        Criterion {
            code: "statut".to_string(),
            label: Some("Statut".to_string()),
            kind: Some(CriterionKind::Nomenclatures),
            field: Some("id_nomenclature_valid_status".to_string()),
            values: vec![
                ValueRule {
                    value: RuleValue::Single("1".to_string()),
                    label: "Certain".to_string(),
                    color: "#00FF00".to_string(),
                    description: None,
                    styles: StyleOverrides::default(),
                },
                ValueRule {
                    value: RuleValue::Multiple(vec!["2".to_string(), "3".to_string()]),
                    label: "Douteux".to_string(),
                    color: "#FF8800".to_string(),
                    description: Some("Validation en attente".to_string()),
                    styles: StyleOverrides {
                        weight: Some(1.5),
                        ..Default::default()
                    },
                },
            ],
            styles: StyleOverrides {
                opacity: Some(0.9),
                ..Default::default()
            },
            description: None,
        }
    }

    #[test]
    fn test_prepare_forces_fill_color() {
        let prepared = prepare(
            &sample_criterion(),
            &StyleOverrides::origin_default(),
            "Plusieurs valeurs",
        );

        for rule in &prepared.rules {
            assert!(rule.style.fill);
        }
        assert_eq!(prepared.rules[0].style.fill_color, "#00FF00");
        assert_eq!(prepared.rules[1].style.fill_color, "#FF8800");
    }

    #[test]
    fn test_prepare_precedence() {
        let prepared = prepare(
            &sample_criterion(),
            &StyleOverrides::origin_default(),
            "Plusieurs valeurs",
        );

        // Surcharge du critère appliquée sur toutes les règles
        assert_eq!(prepared.rules[0].style.opacity, 0.9);
        // Surcharge de la règle prioritaire sur l'origine (weight 3)
        assert_eq!(prepared.rules[1].style.weight, 1.5);
        // Origine conservée quand rien ne la surcharge
        assert_eq!(prepared.rules[0].style.color, "#3388FF");
        assert_eq!(prepared.rules[0].style.weight, 3.0);
    }

    #[test]
    fn test_prepare_appends_wildcard_last() {
        let prepared = prepare(
            &sample_criterion(),
            &StyleOverrides::origin_default(),
            "Plusieurs valeurs",
        );

        let wildcard = prepared.rules.last().unwrap();
        assert_eq!(wildcard.values, [WILDCARD_VALUE.to_string()]);
        assert_eq!(wildcard.label, "Plusieurs valeurs");
        assert_eq!(wildcard.style.fill_color, "#ffffff");
        assert_eq!(wildcard.style.color, "#a9a9a9");
        assert_eq!(wildcard.style.weight, 1.0);
    }

    #[test]
    fn test_prepare_expands_multi_values() {
        let prepared = prepare(
            &sample_criterion(),
            &StyleOverrides::origin_default(),
            "Plusieurs valeurs",
        );

        // Chaque valeur individuelle pointe vers sa règle
        assert_eq!(prepared.rule_for("2").unwrap().label, "Douteux");
        assert_eq!(prepared.rule_for("3").unwrap().label, "Douteux");
        assert_eq!(prepared.rule_for("1").unwrap().label, "Certain");
        assert!(prepared.rule_for("99").is_none());
    }

    #[test]
    fn test_prepare_idempotent() {
        let criterion = sample_criterion();
        let origin = StyleOverrides::origin_default();

        let first = prepare(&criterion, &origin, "Plusieurs valeurs");
        let second = prepare(&criterion, &origin, "Plusieurs valeurs");

        assert_eq!(first, second);
        // Le critère source n'est pas modifié
        assert_eq!(criterion, sample_criterion());
    }

    #[test]
    fn test_class_values_excludes_wildcard() {
        let prepared = prepare(
            &sample_criterion(),
            &StyleOverrides::origin_default(),
            "Plusieurs valeurs",
        );

        let mut values: Vec<&str> = prepared.class_values().collect();
        values.sort_unstable();
        assert_eq!(values, ["1", "2", "3"]);
    }
}
