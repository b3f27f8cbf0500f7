//! # critere
//!
//! Moteur de critères d'affichage cartographique pour données
//! d'observation : classification des géométries, calcul des styles et
//! génération des légendes.
//!
//! ## Features
//!
//! - Préparation pure et idempotente des règles de style d'un critère
//! - Résolution du style par géométrie (nomenclatures, classes, dates)
//! - Classes de comptage pour l'agrégation par maille
//! - Rendu HTML des légendes (critères et mailles)
//!
//! ## Usage
//!
//! ```rust
//! use critere::{prepare, resolve_feature_style, Criterion, StyleOverrides};
//!
//! let criterion: Criterion = serde_json::from_str(r##"{
//!     "code": "statut",
//!     "type": "nomenclatures",
//!     "field": "id_nomenclature_valid_status",
//!     "values": [
//!         { "value": "1", "label": "Certain", "color": "#00FF00" }
//!     ]
//! }"##).unwrap();
//!
//! let prepared = prepare(&criterion, &StyleOverrides::origin_default(), "Plusieurs valeurs");
//! let style = resolve_feature_style(&prepared, &["1".to_string()]).unwrap();
//! assert_eq!(style.fill_color, "#00FF00");
//! ```

pub mod color;
pub mod error;
pub mod legend;
pub mod prepare;
pub mod resolve;
pub mod types;

pub use color::{hex_to_rgba, is_valid_hex};
pub use error::CritereError;
pub use legend::{areas_legend_html, criteria_legend, criteria_legend_html, LegendEntry};
pub use prepare::{prepare, PreparedCriterion, PreparedRule};
pub use resolve::{bucket_color, resolve_feature_style};
pub use types::{
    Criterion, CriterionKind, DisplayEvent, DisplayKind, LegendClass, QueryFormat, RuleValue,
    Style, StyleOverrides, ValueRule, AREA_AGGREGATION_CRITERIA_CODE, DEFAULT_CRITERIA_CODE,
    WILDCARD_VALUE,
};

/// Format de regroupement induit par un critère : par maille pour le
/// critère d'agrégation, à plat pour tous les autres.
pub fn query_format(criterion: &Criterion) -> QueryFormat {
    if criterion.is_area_aggregation() {
        QueryFormat::GroupedGeomByAreas
    } else {
        QueryFormat::GroupedGeom
    }
}

/// Événement d'affichage décrivant un critère, à émettre vers le
/// consommateur de la requête lors de chaque changement.
pub fn display_event(criterion: &Criterion) -> DisplayEvent {
    DisplayEvent {
        kind: if criterion.is_area_aggregation() {
            DisplayKind::Grid
        } else {
            DisplayKind::Point
        },
        name: Some(criterion.code.clone()),
        field: criterion.field.clone(),
    }
}
