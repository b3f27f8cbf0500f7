//! Surface cartographique : interface consommée et doublure mémoire

use std::collections::BTreeMap;

use geo::Rect;

use critere::Style;

/// Identifiant opaque d'une couche posée sur la carte
pub type LayerId = u64;

/// Identifiant opaque d'une légende montée sur la carte
pub type LegendId = u64;

/// Surface cartographique consommée par le contrôleur.
///
/// Abstraction des primitives de rendu (groupes de couches, styles,
/// légendes) : le contrôleur ne manipule jamais la bibliothèque
/// cartographique directement.
pub trait MapSurface {
    /// Ajoute une géométrie et retourne son identifiant de couche
    fn add_layer(&mut self, feature: &geojson::Feature) -> LayerId;

    fn remove_layer(&mut self, layer: LayerId);

    /// Applique un style complet à une couche
    fn set_style(&mut self, layer: LayerId, style: &Style);

    /// Cadre la vue sur l'emprise donnée (meilleur effort)
    fn fit_bounds(&mut self, bounds: Rect);

    /// Monte une légende et retourne son identifiant
    fn add_legend(&mut self, html: String) -> LegendId;

    fn remove_legend(&mut self, legend: LegendId);
}

/// Doublure mémoire de la surface cartographique.
///
/// Enregistre couches, styles, légendes et cadrages sans rien rendre.
/// Utilisée par la CLI pour produire du GeoJSON stylé, et par les tests.
#[derive(Debug, Default)]
pub struct HeadlessMap {
    next_layer: LayerId,
    next_legend: LegendId,
    layers: BTreeMap<LayerId, geojson::Feature>,
    styles: BTreeMap<LayerId, Style>,
    legends: BTreeMap<LegendId, String>,
    last_bounds: Option<Rect>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn legend_count(&self) -> usize {
        self.legends.len()
    }

    /// HTML de la légende montée, s'il y en a une
    pub fn legend_html(&self) -> Option<&str> {
        self.legends.values().next().map(String::as_str)
    }

    pub fn style_of(&self, layer: LayerId) -> Option<&Style> {
        self.styles.get(&layer)
    }

    pub fn last_bounds(&self) -> Option<Rect> {
        self.last_bounds
    }

    /// Couches présentes, avec leur style appliqué le cas échéant
    pub fn layers(&self) -> impl Iterator<Item = (LayerId, &geojson::Feature, Option<&Style>)> {
        self.layers
            .iter()
            .map(|(&id, feature)| (id, feature, self.styles.get(&id)))
    }
}

impl MapSurface for HeadlessMap {
    fn add_layer(&mut self, feature: &geojson::Feature) -> LayerId {
        let id = self.next_layer;
        self.next_layer += 1;
        self.layers.insert(id, feature.clone());
        id
    }

    fn remove_layer(&mut self, layer: LayerId) {
        self.layers.remove(&layer);
        self.styles.remove(&layer);
    }

    fn set_style(&mut self, layer: LayerId, style: &Style) {
        if self.layers.contains_key(&layer) {
            self.styles.insert(layer, style.clone());
        }
    }

    fn fit_bounds(&mut self, bounds: Rect) {
        self.last_bounds = Some(bounds);
    }

    fn add_legend(&mut self, html: String) -> LegendId {
        let id = self.next_legend;
        self.next_legend += 1;
        self.legends.insert(id, html);
        id
    }

    fn remove_legend(&mut self, legend: LegendId) {
        self.legends.remove(&legend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_feature() -> geojson::Feature {
        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::Point(vec![5.0, 45.0]))),
            id: None,
            properties: None,
            foreign_members: None,
        }
    }

    #[test]
    fn test_headless_map_layers() {
        let mut map = HeadlessMap::new();
        let a = map.add_layer(&point_feature());
        let b = map.add_layer(&point_feature());
        assert_ne!(a, b);
        assert_eq!(map.layer_count(), 2);

        map.remove_layer(a);
        assert_eq!(map.layer_count(), 1);
        assert!(map.style_of(a).is_none());
    }

    #[test]
    fn test_headless_map_style_requires_layer() {
        let mut map = HeadlessMap::new();
        let layer = map.add_layer(&point_feature());

        map.set_style(layer, &Style::default());
        assert!(map.style_of(layer).is_some());

        // Style ignoré pour une couche retirée
        map.set_style(42, &Style::default());
        assert!(map.style_of(42).is_none());
    }

    #[test]
    fn test_headless_map_single_legend() {
        let mut map = HeadlessMap::new();
        let first = map.add_legend("<strong>a</strong>".to_string());
        map.remove_legend(first);
        map.add_legend("<strong>b</strong>".to_string());

        assert_eq!(map.legend_count(), 1);
        assert_eq!(map.legend_html(), Some("<strong>b</strong>"));
    }
}
