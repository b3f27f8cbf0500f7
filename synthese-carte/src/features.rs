//! Lecture des propriétés et des emprises des features GeoJSON
//!
//! Les features agrégées portent un objet `properties.observations` en
//! colonnes : chaque clé (`id_synthese`, champ de critère) contient le
//! tableau des valeurs des observations regroupées sur la géométrie.

use geo::algorithm::bounding_rect::BoundingRect;
use geo::{coord, Rect};
use geojson::Feature;
use serde_json::Value;

fn observations(feature: &Feature) -> Option<&serde_json::Map<String, Value>> {
    feature
        .properties
        .as_ref()
        .and_then(|props| props.get("observations"))
        .and_then(Value::as_object)
}

/// Identifiants des observations regroupées sur une feature
/// (`properties.observations.id_synthese`)
pub fn observation_ids(feature: &Feature) -> Vec<i64> {
    let Some(ids) = observations(feature)
        .and_then(|obs| obs.get("id_synthese"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    ids.iter().filter_map(Value::as_i64).collect()
}

/// Nombre d'observations regroupées sur une feature
pub fn observation_count(feature: &Feature) -> u64 {
    observations(feature)
        .and_then(|obs| obs.get("id_synthese"))
        .and_then(Value::as_array)
        .map_or(0, |ids| ids.len() as u64)
}

/// Valeurs portées par les observations d'une feature pour un champ
/// donné. Un tableau JSON produit une valeur par élément, un scalaire
/// une valeur unique, une clé absente aucune.
pub fn field_values(feature: &Feature, field: &str) -> Vec<String> {
    let Some(value) = observations(feature).and_then(|obs| obs.get(field)) else {
        return Vec::new();
    };

    match value {
        Value::Array(items) => items.iter().map(json_to_string).collect(),
        Value::Null => Vec::new(),
        other => vec![json_to_string(other)],
    }
}

fn json_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Emprise d'une feature, si sa géométrie est convertible et non vide
pub fn feature_bounds(feature: &Feature) -> Option<Rect> {
    let geometry = feature.geometry.as_ref()?;
    let geometry: geo::Geometry<f64> = geometry.try_into().ok()?;
    geometry.bounding_rect()
}

/// Union de deux emprises
pub fn merge_rects(a: Rect, b: Rect) -> Rect {
    Rect::new(
        coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
        coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
    )
}
