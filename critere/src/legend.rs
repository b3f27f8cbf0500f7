//! Génération des légendes : critères et agrégation par maille
//!
//! Deux rendus mutuellement exclusifs, sélectionnés par le critère
//! actif. Aucune légende n'est produite pour le critère par défaut.

use crate::color::hex_to_rgba;
use crate::prepare::PreparedCriterion;
use crate::resolve::bucket_color;
use crate::types::LegendClass;
use crate::CritereError;

/// Entrée de légende : libellé + déclarations CSS de la pastille
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub description: Option<String>,
    pub css: Vec<String>,
}

/// Construit les entrées de légende d'un critère préparé, une par règle.
///
/// La pastille reprend le style fusionné de la règle : fond d'après
/// `fillColor`/`fillOpacity` (converti en rgba seulement si l'opacité
/// est < 1 ; omis si `fill` est faux ou l'opacité nulle), bordure
/// d'après `color`/`weight`/`opacity` (mêmes règles d'omission).
pub fn criteria_legend(prepared: &PreparedCriterion) -> Result<Vec<LegendEntry>, CritereError> {
    let mut entries = Vec::with_capacity(prepared.rules.len());

    for rule in &prepared.rules {
        let style = &rule.style;
        let mut css = Vec::new();

        // Fond de la pastille
        if style.fill && style.fill_opacity != 0.0 {
            let background = if style.fill_opacity < 1.0 {
                hex_to_rgba(&style.fill_color, style.fill_opacity)?
            } else {
                style.fill_color.clone()
            };
            css.push(format!("background-color: {}", background));
        }

        // Bordure de la pastille
        if style.stroke && style.opacity != 0.0 && style.weight != 0.0 {
            let border_color = if style.opacity < 1.0 {
                hex_to_rgba(&style.color, style.opacity)?
            } else {
                style.color.clone()
            };
            css.push(format!("border: {}px solid {}", style.weight, border_color));
        }

        entries.push(LegendEntry {
            label: rule.label.clone(),
            description: rule.description.clone(),
            css,
        });
    }

    Ok(entries)
}

/// Rendu HTML de la légende d'un critère
///
/// Sortie identique octet pour octet à chaque appel pour un même
/// critère préparé.
pub fn criteria_legend_html(prepared: &PreparedCriterion) -> Result<String, CritereError> {
    let title = prepared.label.as_deref().unwrap_or(&prepared.code);
    let mut labels = vec![format!("<strong> {} </strong>", title)];

    for entry in criteria_legend(prepared)? {
        let line = format!(r#"<i style="{}"></i> {}"#, entry.css.join(";"), entry.label);
        match entry.description {
            Some(description) => {
                labels.push(format!(r#"<span title="{}">{}</span>"#, description, line))
            }
            None => labels.push(line),
        }
    }

    Ok(labels.join("<br>"))
}

/// Rendu HTML de la légende d'agrégation par maille.
///
/// Les seuils sont listés en ordre croissant (liste de configuration
/// renversée), chaque ligne montrant la couleur de la classe couvrant
/// `min + 1` et l'intervalle `min&ndash;suivant` — ouvert (`N+`) pour la
/// classe supérieure.
///
/// # Errors
///
/// Retourne `CritereError::EmptyLegendClasses` si la liste est vide.
pub fn areas_legend_html(classes: &[LegendClass]) -> Result<String, CritereError> {
    if classes.is_empty() {
        return Err(CritereError::EmptyLegendClasses);
    }

    let mut grades: Vec<u64> = classes.iter().map(|class| class.min).collect();
    grades.reverse();

    let mut labels = vec!["<strong> Nombre <br> d'observations </strong>".to_string()];
    for (i, min) in grades.iter().enumerate() {
        let color = bucket_color(classes, min + 1)?;
        let range = match grades.get(i + 1) {
            Some(next) => format!("{}&ndash;{}", min, next),
            None => format!("{}+", min),
        };
        labels.push(format!(
            r#"<i style="border-radius: 2px; background:{}"></i> {}"#,
            color, range
        ));
    }

    Ok(labels.join("<br>"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prepare::prepare;
    use crate::types::{Criterion, CriterionKind, RuleValue, StyleOverrides, ValueRule};

    fn sample_prepared() -> PreparedCriterion {
        let criterion = Criterion {
            code: "statut".to_string(),
            label: Some("Statut de validation".to_string()),
            kind: Some(CriterionKind::Nomenclatures),
            field: Some("id_nomenclature_valid_status".to_string()),
            values: vec![
                ValueRule {
                    value: RuleValue::Single("1".to_string()),
                    label: "Certain".to_string(),
                    color: "#00ff00".to_string(),
                    description: Some("Observation validée".to_string()),
                    styles: StyleOverrides::default(),
                },
                ValueRule {
                    value: RuleValue::Single("2".to_string()),
                    label: "Douteux".to_string(),
                    color: "#ff8800".to_string(),
                    description: None,
                    styles: StyleOverrides {
                        fill_opacity: Some(1.0),
                        stroke: Some(false),
                        ..Default::default()
                    },
                },
            ],
            styles: StyleOverrides::default(),
            description: None,
        };
        prepare(&criterion, &StyleOverrides::origin_default(), "Plusieurs valeurs")
    }

    #[test]
    fn test_criteria_legend_css() {
        let entries = criteria_legend(&sample_prepared()).unwrap();
        assert_eq!(entries.len(), 3); // 2 règles + joker

        // fillOpacity 0.2 (base) < 1 → fond rgba
        assert_eq!(
            entries[0].css[0],
            "background-color: rgba(0,255,0,0.2)"
        );
        // opacity 1 → couleur de bordure telle quelle
        assert_eq!(entries[0].css[1], "border: 3px solid #3388FF");

        // fillOpacity forcée à 1 → fond hex direct; stroke false → pas de bordure
        assert_eq!(entries[1].css, ["background-color: #ff8800"]);
    }

    #[test]
    fn test_criteria_legend_omits_zero_weight_border() {
        let criterion = Criterion {
            code: "c".to_string(),
            label: None,
            kind: Some(CriterionKind::Nomenclatures),
            field: None,
            values: vec![ValueRule {
                value: RuleValue::Single("1".to_string()),
                label: "Sans bordure".to_string(),
                color: "#123456".to_string(),
                description: None,
                styles: StyleOverrides {
                    weight: Some(0.0),
                    fill_opacity: Some(0.0),
                    ..Default::default()
                },
            }],
            styles: StyleOverrides::default(),
            description: None,
        };
        let prepared = prepare(&criterion, &StyleOverrides::origin_default(), "*");

        let entries = criteria_legend(&prepared).unwrap();
        // fillOpacity 0 → pas de fond; weight 0 → pas de bordure
        assert!(entries[0].css.is_empty());
    }

    #[test]
    fn test_criteria_legend_html_deterministic() {
        let prepared = sample_prepared();

        let first = criteria_legend_html(&prepared).unwrap();
        let second = criteria_legend_html(&prepared).unwrap();
        assert_eq!(first, second);

        assert!(first.starts_with("<strong> Statut de validation </strong><br>"));
        assert!(first.contains(r#"<span title="Observation validée">"#));
        assert!(first.contains("Plusieurs valeurs"));
    }

    #[test]
    fn test_areas_legend_html() {
        let classes = vec![
            LegendClass { min: 50, color: "#cc0000".to_string() },
            LegendClass { min: 10, color: "#bb0000".to_string() },
            LegendClass { min: 0, color: "#aa0000".to_string() },
        ];

        let html = areas_legend_html(&classes).unwrap();
        let lines: Vec<&str> = html.split("<br>").collect();

        assert_eq!(lines[0], "<strong> Nombre ");
        // Seuils croissants: 0–10, 10–50, 50+
        assert!(lines[2].ends_with("0&ndash;10"));
        assert!(lines[2].contains("background:#aa0000"));
        assert!(lines[3].ends_with("10&ndash;50"));
        assert!(lines[3].contains("background:#bb0000"));
        assert!(lines[4].ends_with("50+"));
        assert!(lines[4].contains("background:#cc0000"));
    }

    #[test]
    fn test_areas_legend_empty_classes() {
        assert!(matches!(
            areas_legend_html(&[]),
            Err(CritereError::EmptyLegendClasses)
        ));
    }
}
