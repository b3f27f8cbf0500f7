//! Contrôleur de la carte de synthèse
//!
//! Porte l'état courant (critère sélectionné, couches posées, styles
//! appliqués, légende montée, sélection) et orchestre le moteur
//! `critere` sur une surface cartographique abstraite. Les calculs de
//! style et de légende restent des fonctions pures du moteur ; le
//! contrôleur ne fait que les cacher et les appliquer.

use std::collections::{BTreeMap, HashMap};

use critere::{
    areas_legend_html, bucket_color, criteria_legend_html, display_event, prepare, query_format,
    resolve_feature_style, CritereError, Criterion, DisplayEvent, PreparedCriterion, Style,
    StyleOverrides,
};
use geo::Rect;
use geojson::FeatureCollection;
use tracing::{debug, info};

use crate::config::SyntheseConfig;
use crate::features::{
    feature_bounds, field_values, merge_rects, observation_count, observation_ids,
};
use crate::i18n::Translator;
use crate::map::{LayerId, LegendId, MapSurface};
use crate::notify::{Notifier, NotifyKind};
use crate::selectors::SelectorSet;

/// Toast affiché quand l'observation demandée n'est couverte par
/// aucune couche (typiquement en mode maille sur une maille absente)
const OBSERVATION_NOT_FOUND_MESSAGE: &str = "L'observation selectionnée n'est présente dans \
     aucune maille - passez en mode 'point' pour la localiser";

/// Contrôleur de la carte : critère actif, couches, styles et légende
pub struct CarteController<M, T, N> {
    config: SyntheseConfig,
    map: M,
    translator: T,
    notifier: N,
    selectors: SelectorSet,
    selected: Criterion,
    /// Cache des critères préparés, indexé par code
    prepared: HashMap<String, PreparedCriterion>,
    /// Couches posées, dans l'ordre des features chargées
    layers: Vec<LayerId>,
    /// Couches couvrant chaque observation (id_synthese)
    layers_dict: BTreeMap<i64, Vec<LayerId>>,
    layer_bounds: HashMap<LayerId, Rect>,
    /// Styles de critère appliqués, pour restaurer après une sélection
    applied_styles: HashMap<LayerId, Style>,
    selected_layers: Vec<LayerId>,
    legend: Option<LegendId>,
    enable_fit_bounds: bool,
    first_load: bool,
    last_event: Option<DisplayEvent>,
}

impl<M: MapSurface, T: Translator, N: Notifier> CarteController<M, T, N> {
    /// Construit le contrôleur, valide la configuration et sélectionne
    /// le critère initial (légende et sélecteur de format compris).
    pub fn new(
        mut config: SyntheseConfig,
        map: M,
        translator: T,
        notifier: N,
    ) -> Result<Self, CritereError> {
        config.validate()?;
        let initial = config.initial_criterion();

        let mut controller = Self {
            config,
            map,
            translator,
            notifier,
            selectors: SelectorSet::new(),
            selected: Criterion::default_display(),
            prepared: HashMap::new(),
            layers: Vec::new(),
            layers_dict: BTreeMap::new(),
            layer_bounds: HashMap::new(),
            applied_styles: HashMap::new(),
            selected_layers: Vec::new(),
            legend: None,
            enable_fit_bounds: true,
            first_load: true,
            last_event: None,
        };
        controller.select_criterion(initial)?;
        Ok(controller)
    }

    /// Sélectionne un critère : met à jour les sélecteurs de requête,
    /// prépare ses règles, remonte la légende et retourne l'événement
    /// d'affichage à émettre vers le service de requête.
    pub fn select_criterion(&mut self, criterion: Criterion) -> Result<DisplayEvent, CritereError> {
        self.clear_selection();
        self.selected = criterion;

        if let Some(ref field) = self.selected.field {
            self.selectors = self.selectors.set("with_field", field);
        }
        self.ensure_prepared();
        self.selectors = self
            .selectors
            .set("format", query_format(&self.selected).as_str());
        self.refresh_legend()?;

        let event = display_event(&self.selected);
        info!(
            criterion = self.selected.code.as_str(),
            format = query_format(&self.selected).as_str(),
            "Selected display criterion"
        );
        self.last_event = Some(event.clone());
        Ok(event)
    }

    /// Sélectionne un critère désigné par son code dans la configuration
    pub fn select_criterion_by_code(&mut self, code: &str) -> Result<DisplayEvent, CritereError> {
        let criterion = self.config.criterion_by_code(code)?;
        self.select_criterion(criterion)
    }

    /// Charge un lot de features : remplace les couches, applique les
    /// styles du critère actif et cadre la vue sur l'emprise chargée.
    pub fn load_features(&mut self, collection: &FeatureCollection) -> Result<(), CritereError> {
        for layer in std::mem::take(&mut self.layers) {
            self.map.remove_layer(layer);
        }
        self.layers_dict.clear();
        self.layer_bounds.clear();
        self.applied_styles.clear();
        self.selected_layers.clear();

        let mut bounds: Option<Rect> = None;
        for feature in &collection.features {
            let layer = self.map.add_layer(feature);
            self.layers.push(layer);
            for id in observation_ids(feature) {
                self.layers_dict.entry(id).or_default().push(layer);
            }
            if let Some(rect) = feature_bounds(feature) {
                self.layer_bounds.insert(layer, rect);
                bounds = Some(match bounds {
                    Some(acc) => merge_rects(acc, rect),
                    None => rect,
                });
            }
        }

        if self.selected.is_area_aggregation() {
            self.apply_areas_styles(collection)?;
        } else if !self.selected.values.is_empty() {
            self.apply_criteria_styles(collection);
        }

        if self.enable_fit_bounds && !self.first_load {
            if let Some(rect) = bounds {
                self.map.fit_bounds(rect);
            }
        }
        debug!(
            features = collection.features.len(),
            observations = self.layers_dict.len(),
            "Loaded feature batch"
        );
        self.first_load = false;
        self.enable_fit_bounds = true;
        Ok(())
    }

    /// Sélectionne une observation : surligne les couches qui la
    /// couvrent et cadre la vue dessus. Si aucune couche ne la couvre,
    /// notifie l'utilisateur sans modifier la carte.
    pub fn select_observation(&mut self, id_synthese: i64) {
        self.clear_selection();

        let Some(layers) = self.layers_dict.get(&id_synthese).cloned() else {
            self.notifier
                .notify(NotifyKind::Warning, OBSERVATION_NOT_FOUND_MESSAGE);
            return;
        };

        let mut bounds: Option<Rect> = None;
        for layer in layers {
            self.apply_selection(layer);
            if let Some(rect) = self.layer_bounds.get(&layer).copied() {
                bounds = Some(match bounds {
                    Some(acc) => merge_rects(acc, rect),
                    None => rect,
                });
            }
        }
        if let Some(rect) = bounds {
            self.map.fit_bounds(rect);
        }
    }

    /// Sélectionne une couche cliquée et retourne les observations
    /// qu'elle couvre, pour synchroniser la liste attenante.
    pub fn select_layer(&mut self, layer: LayerId) -> Vec<i64> {
        self.clear_selection();
        self.apply_selection(layer);
        self.layers_dict
            .iter()
            .filter(|(_, layers)| layers.contains(&layer))
            .map(|(&id, _)| id)
            .collect()
    }

    /// Remonte la légende correspondant au critère actif
    fn refresh_legend(&mut self) -> Result<(), CritereError> {
        // Retirer la légende désarme le cadrage automatique, le temps
        // que les données du nouveau critère arrivent
        self.enable_fit_bounds = false;
        if let Some(legend) = self.legend.take() {
            self.map.remove_legend(legend);
        }

        let html = if self.selected.is_area_aggregation() {
            Some(areas_legend_html(
                &self.config.area_aggregation_legend_classes,
            )?)
        } else if let Some(prepared) = self.prepared.get(&self.selected.code) {
            Some(criteria_legend_html(prepared)?)
        } else {
            None
        };
        if let Some(html) = html {
            self.legend = Some(self.map.add_legend(html));
        }
        Ok(())
    }

    /// Prépare les règles du critère actif si besoin (cache par code)
    fn ensure_prepared(&mut self) {
        if self.selected.values.is_empty() || self.prepared.contains_key(&self.selected.code) {
            return;
        }
        let origin = self.origin_style();
        let label = self.translator.instant("Synthese.Map.SeveralValues");
        let prepared = prepare(&self.selected, &origin, &label);
        self.prepared.insert(self.selected.code.clone(), prepared);
    }

    fn apply_areas_styles(&mut self, collection: &FeatureCollection) -> Result<(), CritereError> {
        let classes = self.config.area_aggregation_legend_classes.clone();
        let layers = self.layers.clone();
        for (layer, feature) in layers.into_iter().zip(&collection.features) {
            let count = observation_count(feature);
            let color = bucket_color(&classes, count)?.to_string();
            let mut style = Style::default();
            StyleOverrides::origin_areas().apply(&mut style);
            style.fill_color = color;
            self.map.set_style(layer, &style);
            self.applied_styles.insert(layer, style);
        }
        Ok(())
    }

    fn apply_criteria_styles(&mut self, collection: &FeatureCollection) {
        let Some(prepared) = self.prepared.get(&self.selected.code) else {
            return;
        };
        let Some(field) = prepared.field.clone() else {
            return;
        };

        let mut resolved = Vec::with_capacity(self.layers.len());
        for (&layer, feature) in self.layers.iter().zip(&collection.features) {
            let values = field_values(feature, &field);
            if let Some(style) = resolve_feature_style(prepared, &values) {
                resolved.push((layer, style.clone()));
            }
        }
        for (layer, style) in resolved {
            self.map.set_style(layer, &style);
            self.applied_styles.insert(layer, style);
        }
    }

    /// Surligne une couche avec le style de sélection du mode courant
    fn apply_selection(&mut self, layer: LayerId) {
        let mut style = self.layer_base_style(layer);
        self.selection_style().apply(&mut style);
        self.map.set_style(layer, &style);
        self.selected_layers.push(layer);
    }

    /// Restaure le style de critère des couches surlignées
    fn clear_selection(&mut self) {
        for layer in std::mem::take(&mut self.selected_layers) {
            let style = self.layer_base_style(layer);
            self.map.set_style(layer, &style);
        }
    }

    /// Style de repos d'une couche : style de critère appliqué, sinon
    /// style d'origine du mode courant
    fn layer_base_style(&self, layer: LayerId) -> Style {
        if let Some(style) = self.applied_styles.get(&layer) {
            return style.clone();
        }
        let mut style = Style::default();
        self.origin_style().apply(&mut style);
        style
    }

    fn origin_style(&self) -> StyleOverrides {
        if self.selected.is_area_aggregation() {
            StyleOverrides::origin_areas()
        } else {
            StyleOverrides::origin_default()
        }
    }

    fn selection_style(&self) -> StyleOverrides {
        if self.selected.is_area_aggregation() {
            StyleOverrides::selected_areas()
        } else {
            StyleOverrides::selected_default()
        }
    }

    pub fn selected_criterion(&self) -> &Criterion {
        &self.selected
    }

    /// Sélecteurs courants du service de requête
    pub fn selectors(&self) -> &SelectorSet {
        &self.selectors
    }

    /// Dernier événement d'affichage émis
    pub fn last_event(&self) -> Option<&DisplayEvent> {
        self.last_event.as_ref()
    }

    pub fn config(&self) -> &SyntheseConfig {
        &self.config
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn into_map(self) -> M {
        self.map
    }
}
