//! Résolution du style d'une géométrie selon le critère actif

use std::cmp::Ordering;

use tracing::trace;

use crate::prepare::PreparedCriterion;
use crate::types::{CriterionKind, LegendClass, Style};
use crate::{CritereError, WILDCARD_VALUE};

/// Style à appliquer à une géométrie, selon les valeurs portées par ses
/// observations pour le champ du critère.
///
/// Une géométrie portant plus d'une valeur distincte est résolue par la
/// règle joker, quel que soit le mode du critère. En mode
/// `nomenclatures`, la correspondance est directe. En mode `classes` ou
/// `dates`, le parcours des seuils reproduit le comportement historique :
/// les seuils sont visités dans l'ordre trié (numérique décroissant pour
/// `classes`, lexicographique croissant pour `dates`), chaque seuil
/// franchi écrase le style retenu, et le dernier seuil s'applique sans
/// condition.
///
/// Retourne `None` quand aucune règle ne couvre la géométrie.
pub fn resolve_feature_style<'a>(
    prepared: &'a PreparedCriterion,
    values: &[String],
) -> Option<&'a Style> {
    let feature_value: Option<&str> = if values.len() > 1 {
        Some(WILDCARD_VALUE)
    } else {
        values.first().map(String::as_str)
    };

    if prepared.kind == Some(CriterionKind::Nomenclatures)
        || feature_value == Some(WILDCARD_VALUE)
    {
        return feature_value
            .and_then(|value| prepared.rule_for(value))
            .map(|rule| &rule.style);
    }

    match prepared.kind {
        Some(CriterionKind::Classes) => {
            let mut classes: Vec<&str> = prepared.class_values().collect();
            classes.sort_unstable_by(|a, b| {
                numeric(b).partial_cmp(&numeric(a)).unwrap_or(Ordering::Equal)
            });

            let feature_number = feature_value.and_then(|value| value.parse::<f64>().ok());
            overwrite_scan(prepared, &classes, |class| match feature_number {
                Some(number) => number > numeric(class),
                None => false,
            })
        }
        Some(CriterionKind::Dates) => {
            let mut classes: Vec<&str> = prepared.class_values().collect();
            classes.sort_unstable();

            overwrite_scan(prepared, &classes, |class| {
                feature_value.map_or(false, |value| value > class)
            })
        }
        _ => {
            trace!(code = prepared.code.as_str(), "No classification kind, no style");
            None
        }
    }
}

fn numeric(value: &str) -> f64 {
    value.parse().unwrap_or(f64::NAN)
}

/// Parcours avec écrasement : chaque seuil franchi remplace le style
/// retenu, le dernier seuil s'applique inconditionnellement.
fn overwrite_scan<'a>(
    prepared: &'a PreparedCriterion,
    classes: &[&str],
    passes: impl Fn(&str) -> bool,
) -> Option<&'a Style> {
    let last = classes.len().checked_sub(1)?;

    let mut applied = None;
    for (i, class) in classes.iter().enumerate() {
        if i != last {
            if passes(class) {
                applied = prepared.rule_for(class).map(|rule| &rule.style);
            }
        } else {
            applied = prepared.rule_for(class).map(|rule| &rule.style);
        }
    }
    applied
}

/// Couleur de la classe de légende couvrant un nombre d'observations.
///
/// Les classes sont parcourues dans l'ordre de la liste (configuration
/// décroissante par `min`) : une classe non finale est retenue dès que
/// `count > min`, la dernière classe sert de repli inconditionnel.
///
/// # Errors
///
/// Retourne `CritereError::EmptyLegendClasses` si la liste est vide —
/// erreur de configuration, à valider avant activation.
pub fn bucket_color(classes: &[LegendClass], count: u64) -> Result<&str, CritereError> {
    let last = classes
        .len()
        .checked_sub(1)
        .ok_or(CritereError::EmptyLegendClasses)?;

    for class in &classes[..last] {
        if count > class.min {
            return Ok(&class.color);
        }
    }
    Ok(&classes[last].color)
}
