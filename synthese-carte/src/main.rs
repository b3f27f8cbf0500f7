//! Point d'entrée CLI pour synthese-carte

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use synthese_carte::cli::{self, Commands};

/// Styler et légender des observations GeoJSON selon un critère d'affichage
#[derive(Parser)]
#[command(name = "synthese-carte")]
#[command(author, version)]
#[command(about = "Appliquer des critères d'affichage à des observations GeoJSON")]
#[command(
    long_about = "Applique les critères d'affichage de la carte de synthèse (agrégation par \
                  maille, nomenclatures, classes, dates) à des fichiers GeoJSON, et génère les \
                  légendes HTML correspondantes."
)]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Render {
            path,
            output,
            criterion,
            config,
            report,
        } => {
            info!(path = %path.display(), criterion = %criterion, "Render");
            cli::cmd_render(&path, &output, &criterion, &config, report.as_deref())?;
        }
        Commands::Legend {
            criterion,
            config,
            output,
        } => {
            cli::cmd_legend(&criterion, &config, output.as_deref())?;
        }
        Commands::Check { config } => {
            cli::cmd_check(&config)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
