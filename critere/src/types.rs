//! Types de données pour le moteur de critères

use serde::{Deserialize, Serialize};

/// Code réservé du critère d'affichage par défaut (sans classification)
pub const DEFAULT_CRITERIA_CODE: &str = "default";

/// Code réservé du critère d'agrégation des observations par maille
pub const AREA_AGGREGATION_CRITERIA_CODE: &str = "area-aggregation";

/// Valeur synthétique de la règle joker, affectée aux géométries
/// portant plusieurs valeurs distinctes pour le champ du critère
pub const WILDCARD_VALUE: &str = "*";

/// Style complet applicable à une géométrie
///
/// Sous-ensemble des options de tracé Leaflet (`L.Path`), tel que
/// consommé par la surface cartographique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub stroke: bool,
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill: bool,
    pub fill_color: String,
    pub fill_opacity: f64,
}

impl Default for Style {
    /// Style de base, appliqué avant toute surcharge
    fn default() -> Self {
        Self {
            stroke: true,
            color: "#3388ff".to_string(),
            weight: 3.0,
            opacity: 1.0,
            fill: true,
            fill_color: "#3388ff".to_string(),
            fill_opacity: 0.2,
        }
    }
}

/// Surcharge partielle de style : chaque champ absent laisse la valeur en place
///
/// Les fichiers de configuration portent les clés Leaflet (`fillColor`,
/// `fillOpacity`), d'où le renommage camelCase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
}

impl StyleOverrides {
    /// Applique la surcharge sur un style complet (les champs présents gagnent)
    pub fn apply(&self, style: &mut Style) {
        if let Some(stroke) = self.stroke {
            style.stroke = stroke;
        }
        if let Some(ref color) = self.color {
            style.color = color.clone();
        }
        if let Some(weight) = self.weight {
            style.weight = weight;
        }
        if let Some(opacity) = self.opacity {
            style.opacity = opacity;
        }
        if let Some(fill) = self.fill {
            style.fill = fill;
        }
        if let Some(ref fill_color) = self.fill_color {
            style.fill_color = fill_color.clone();
        }
        if let Some(fill_opacity) = self.fill_opacity {
            style.fill_opacity = fill_opacity;
        }
    }

    /// Vrai si aucun champ n'est surchargé
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Style d'origine des géométries en mode par défaut
    pub fn origin_default() -> Self {
        Self {
            color: Some("#3388FF".to_string()),
            weight: Some(3.0),
            fill: Some(false),
            ..Default::default()
        }
    }

    /// Style d'origine des mailles d'agrégation
    pub fn origin_areas() -> Self {
        Self {
            color: Some("#FFFFFF".to_string()),
            weight: Some(0.4),
            fill_opacity: Some(0.8),
            ..Default::default()
        }
    }

    /// Style de sélection en mode par défaut
    pub fn selected_default() -> Self {
        Self {
            color: Some("#FF0000".to_string()),
            ..Default::default()
        }
    }

    /// Style de sélection en mode maille
    pub fn selected_areas() -> Self {
        Self {
            color: Some("#FF0000".to_string()),
            weight: Some(3.0),
            ..Default::default()
        }
    }
}

/// Valeur(s) couvertes par une règle : scalaire ou liste
///
/// Résolu une fois pour toutes à la préparation ; le chemin chaud de
/// résolution par géométrie ne re-teste jamais la forme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Single(String),
    Multiple(Vec<String>),
}

impl RuleValue {
    /// Valeurs individuelles couvertes par la règle
    pub fn values(&self) -> &[String] {
        match self {
            RuleValue::Single(value) => std::slice::from_ref(value),
            RuleValue::Multiple(values) => values,
        }
    }
}

/// Une classe de valeurs au sein d'un critère, avec sa couleur de remplissage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRule {
    pub value: RuleValue,
    pub label: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "StyleOverrides::is_empty")]
    pub styles: StyleOverrides,
}

/// Mode de classification d'un critère
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriterionKind {
    /// Valeurs de nomenclature : correspondance directe valeur → règle
    Nomenclatures,
    /// Seuils numériques, parcourus en ordre décroissant
    Classes,
    /// Seuils de dates ISO, comparaison lexicographique
    Dates,
}

/// Critère d'affichage : règle nommée contrôlant la classification
/// et le style des géométries de la carte
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CriterionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<ValueRule>,
    #[serde(default, skip_serializing_if = "StyleOverrides::is_empty")]
    pub styles: StyleOverrides,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Criterion {
    /// Critère d'affichage par défaut (aucune classification, aucune légende)
    pub fn default_display() -> Self {
        Self::reserved(DEFAULT_CRITERIA_CODE)
    }

    /// Critère d'agrégation des observations par maille
    pub fn area_aggregation() -> Self {
        Self::reserved(AREA_AGGREGATION_CRITERIA_CODE)
    }

    fn reserved(code: &str) -> Self {
        Self {
            code: code.to_string(),
            label: None,
            kind: None,
            field: None,
            values: Vec::new(),
            styles: StyleOverrides::default(),
            description: None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.code == DEFAULT_CRITERIA_CODE
    }

    pub fn is_area_aggregation(&self) -> bool {
        self.code == AREA_AGGREGATION_CRITERIA_CODE
    }
}

/// Classe de légende pour l'agrégation par maille
///
/// La configuration liste les classes en ordre décroissant de `min` ;
/// la dernière (la plus petite) sert de repli inconditionnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendClass {
    pub min: u64,
    pub color: String,
}

/// Type d'affichage émis vers le consommateur de la requête
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    /// Mailles d'agrégation
    Grid,
    /// Géométries d'observation
    Point,
}

/// Événement décrivant le critère actif, émis à chaque changement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayEvent {
    #[serde(rename = "type")]
    pub kind: DisplayKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Format de regroupement demandé au service de requête
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFormat {
    /// Géométries regroupées à plat
    GroupedGeom,
    /// Géométries regroupées par maille
    GroupedGeomByAreas,
}

impl QueryFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryFormat::GroupedGeom => "grouped_geom",
            QueryFormat::GroupedGeomByAreas => "grouped_geom_by_areas",
        }
    }
}

impl std::fmt::Display for QueryFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides_precedence() {
        let mut style = Style::default();
        StyleOverrides::origin_areas().apply(&mut style);

        assert_eq!(style.color, "#FFFFFF");
        assert_eq!(style.weight, 0.4);
        assert_eq!(style.fill_opacity, 0.8);
        // Champs non surchargés inchangés
        assert!(style.stroke);
        assert_eq!(style.opacity, 1.0);
    }

    #[test]
    fn test_rule_value_values() {
        let single = RuleValue::Single("1".to_string());
        assert_eq!(single.values(), ["1".to_string()]);

        let multiple = RuleValue::Multiple(vec!["1".to_string(), "2".to_string()]);
        assert_eq!(multiple.values().len(), 2);
    }

    #[test]
    fn test_criterion_deserialization() {
        let json = r##"{
            "code": "statut",
            "label": "Statut de validation",
            "type": "nomenclatures",
            "field": "id_nomenclature_valid_status",
            "values": [
                { "value": "1", "label": "Certain", "color": "#00FF00" },
                { "value": ["2", "3"], "label": "Douteux", "color": "#FF8800",
                  "styles": { "fillOpacity": 0.5 } }
            ]
        }"##;

        let criterion: Criterion = serde_json::from_str(json).unwrap();
        assert_eq!(criterion.code, "statut");
        assert_eq!(criterion.kind, Some(CriterionKind::Nomenclatures));
        assert_eq!(criterion.values.len(), 2);
        assert_eq!(criterion.values[1].value.values().len(), 2);
        assert_eq!(criterion.values[1].styles.fill_opacity, Some(0.5));
    }

    #[test]
    fn test_reserved_criteria() {
        assert!(Criterion::default_display().is_default());
        assert!(Criterion::area_aggregation().is_area_aggregation());
        assert!(!Criterion::area_aggregation().is_default());
    }

    #[test]
    fn test_query_format_strings() {
        assert_eq!(QueryFormat::GroupedGeom.as_str(), "grouped_geom");
        assert_eq!(
            QueryFormat::GroupedGeomByAreas.as_str(),
            "grouped_geom_by_areas"
        );
    }
}
