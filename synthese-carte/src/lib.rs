//! # synthese-carte
//!
//! Carte de synthèse des observations : application des critères
//! d'affichage du moteur [`critere`] sur une surface cartographique,
//! gestion de la sélection et rendu des légendes.
//!
//! ## Features
//!
//! - Contrôleur de carte : critère actif, couches, styles, légende
//! - Agrégation des observations par maille avec classes de comptage
//! - Surface cartographique abstraite + doublure mémoire pour la CLI
//! - Rapport de rendu JSON
//!
//! ## Usage CLI
//!
//! ```bash
//! # Styler un dossier de GeoJSON par nombre d'observations
//! synthese-carte render --path ./geojson/ --output ./styled/
//!
//! # Générer la légende d'un critère configuré
//! synthese-carte legend --criterion statut --config demo
//! ```

pub mod cli;
pub mod config;
pub mod controller;
pub mod features;
pub mod i18n;
pub mod map;
pub mod notify;
pub mod report;
pub mod selectors;

pub use config::SyntheseConfig;
pub use controller::CarteController;
pub use map::{HeadlessMap, MapSurface};
pub use report::{RenderReport, RenderStatus};
