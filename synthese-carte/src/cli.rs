//! Définition et implémentation des commandes CLI
//!
//! CLI simplifiée:
//! - `render`: applique un critère à des fichiers GeoJSON et écrit les
//!   features stylées
//! - `legend`: génère le HTML de légende d'un critère
//! - `check`: valide un fichier de configuration

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Subcommand;
use geojson::{FeatureCollection, GeoJson};
use rayon::prelude::*;
use tracing::{info, warn};

use critere::{areas_legend_html, criteria_legend_html, prepare, StyleOverrides};

use crate::config::SyntheseConfig;
use crate::controller::CarteController;
use crate::i18n::{StaticTranslator, Translator};
use crate::map::HeadlessMap;
use crate::notify::RecordingNotifier;
use crate::report::RenderReport;

#[derive(Subcommand)]
pub enum Commands {
    /// Apply a display criterion to GeoJSON files and write styled features
    Render {
        /// Path to a GeoJSON file or a directory of GeoJSON files
        #[arg(short, long)]
        path: PathBuf,

        /// Output directory for styled GeoJSON files
        #[arg(short, long)]
        output: PathBuf,

        /// Criterion code (default, area-aggregation, or a configured code)
        #[arg(long, default_value = "area-aggregation")]
        criterion: String,

        /// Config preset name (default/demo) or path to a JSON config
        #[arg(long, default_value = "default")]
        config: String,

        /// Write the JSON render report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Generate the legend HTML for a criterion
    Legend {
        /// Criterion code (area-aggregation or a configured code)
        #[arg(long, default_value = "area-aggregation")]
        criterion: String,

        /// Config preset name (default/demo) or path to a JSON config
        #[arg(long, default_value = "default")]
        config: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a configuration file
    Check {
        /// Config preset name (default/demo) or path to a JSON config
        #[arg(long, default_value = "default")]
        config: String,
    },
}

/// Exécute la commande render
pub fn cmd_render(
    path: &Path,
    output: &Path,
    criterion: &str,
    config_spec: &str,
    report_path: Option<&Path>,
) -> Result<()> {
    let start = Instant::now();
    let config = load_config(config_spec)?;

    let files = collect_geojson_files(path)?;
    if files.is_empty() {
        anyhow::bail!("No GeoJSON files found in {}", path.display());
    }
    std::fs::create_dir_all(output)
        .with_context(|| format!("Cannot create output directory {}", output.display()))?;

    info!(
        files = files.len(),
        criterion = criterion,
        "Starting render"
    );

    let partials: Vec<RenderReport> = files
        .par_iter()
        .map(|file| {
            let mut partial = RenderReport::new(criterion);
            match process_file(file, output, criterion, &config) {
                Ok((features, styled)) => partial.record_file_success(features, styled),
                Err(e) => {
                    warn!("Failed to render {}: {}", file.display(), e);
                    partial.record_file_failure(&file.display().to_string(), &format!("{:#}", e));
                }
            }
            partial
        })
        .collect();

    let mut report = RenderReport::new(criterion);
    for partial in partials {
        report.merge(partial);
    }
    report.set_duration(start.elapsed());
    report.finalize();
    report.display();

    if let Some(report_path) = report_path {
        report
            .save_to_file(report_path)
            .with_context(|| format!("Cannot write report to {}", report_path.display()))?;
        info!("Report written to {}", report_path.display());
    }

    println!(
        "Render complete: {}/{} files, {} features styled",
        report.files_processed - report.files_failed,
        report.files_processed,
        report.styled
    );
    Ok(())
}

/// Traite un fichier : charge, style et écrit les features
fn process_file(
    file: &Path,
    output: &Path,
    criterion: &str,
    config: &SyntheseConfig,
) -> Result<(usize, usize)> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Cannot read {}", file.display()))?;
    let geojson: GeoJson = content
        .parse()
        .with_context(|| format!("Invalid GeoJSON in {}", file.display()))?;
    let collection = FeatureCollection::try_from(geojson)
        .with_context(|| format!("Expected a FeatureCollection in {}", file.display()))?;

    let mut controller = CarteController::new(
        config.clone(),
        HeadlessMap::new(),
        StaticTranslator::french()?,
        RecordingNotifier::new(),
    )?;
    controller.select_criterion_by_code(criterion)?;
    controller.load_features(&collection)?;

    let map = controller.into_map();
    let mut styled = 0;
    let features: Vec<geojson::Feature> = map
        .layers()
        .map(|(_, feature, style)| {
            let mut feature = feature.clone();
            if let Some(style) = style {
                styled += 1;
                if let Ok(value) = serde_json::to_value(style) {
                    feature
                        .properties
                        .get_or_insert_with(Default::default)
                        .insert("_style".to_string(), value);
                }
            }
            feature
        })
        .collect();
    let total = features.len();

    let styled_collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    let file_name = file
        .file_name()
        .with_context(|| format!("Invalid file name {}", file.display()))?;
    let output_file = output.join(file_name);
    std::fs::write(&output_file, styled_collection.to_string())
        .with_context(|| format!("Cannot write {}", output_file.display()))?;

    Ok((total, styled))
}

/// Exécute la commande legend
pub fn cmd_legend(criterion: &str, config_spec: &str, output: Option<&Path>) -> Result<()> {
    let mut config = load_config(config_spec)?;
    config.validate()?;

    let criterion = config.criterion_by_code(criterion)?;
    let html = if criterion.is_area_aggregation() {
        areas_legend_html(&config.area_aggregation_legend_classes)?
    } else if criterion.is_default() {
        anyhow::bail!("The default display criterion has no legend");
    } else {
        let translator = StaticTranslator::french()?;
        let prepared = prepare(
            &criterion,
            &StyleOverrides::origin_default(),
            &translator.instant("Synthese.Map.SeveralValues"),
        );
        criteria_legend_html(&prepared)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, &html)
                .with_context(|| format!("Cannot write {}", path.display()))?;
            info!("Legend written to {}", path.display());
        }
        None => println!("{}", html),
    }
    Ok(())
}

/// Exécute la commande check
pub fn cmd_check(config_spec: &str) -> Result<()> {
    let mut config = load_config(config_spec)?;
    config.validate().context("Invalid configuration")?;

    let criteria = config.available_criteria();
    println!("Configuration OK");
    println!(
        "Area aggregation: {} ({} legend classes)",
        if config.area_aggregation_enabled {
            "enabled"
        } else {
            "disabled"
        },
        config.area_aggregation_legend_classes.len()
    );
    println!("Criteria: {}", criteria.len());
    for criterion in &criteria {
        println!(
            "  {} ({} values)",
            criterion.code,
            criterion.values.len()
        );
    }
    Ok(())
}

/// Charge une configuration depuis un preset ou un fichier
fn load_config(spec: &str) -> Result<SyntheseConfig> {
    let path = Path::new(spec);
    if path.is_file() {
        SyntheseConfig::load(path)
    } else {
        SyntheseConfig::from_preset(spec)
    }
}

/// Collecte récursivement les fichiers GeoJSON d'un dossier
fn collect_geojson_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        files.push(path.to_path_buf());
        return Ok(files);
    }

    for entry in std::fs::read_dir(path)
        .with_context(|| format!("Cannot read directory {}", path.display()))?
    {
        let entry = entry?;
        let entry_path = entry.path();

        if entry_path.is_dir() {
            files.extend(collect_geojson_files(&entry_path)?);
        } else if entry_path
            .extension()
            .map_or(false, |ext| ext == "geojson" || ext == "json")
        {
            files.push(entry_path);
        }
    }

    files.sort();
    Ok(files)
}
