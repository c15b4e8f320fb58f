//! Pipeline runner
//!
//! Ad hoc entry point for batch runs: point it at a JSON config and it
//! produces the per-horizon matrices, the fitted scaler and the split
//! summary in the configured output directory.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use freight_ml::features::catalog::default_catalog;
use freight_ml::pipeline::{Pipeline, PipelineConfig};

#[derive(Parser)]
#[command(name = "freight_ml")]
#[command(about = "Feature pipeline for dry-bulk freight rate forecasting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline from a JSON config
    Run {
        /// Path to the pipeline configuration
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Print the built-in feature catalog as JSON
    Catalog {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder().with_max_level(Level::INFO).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => {
            let config = PipelineConfig::from_file(&config)
                .with_context(|| format!("failed to read config {:?}", config))?;
            let report = Pipeline::new(config).run()?;

            println!("\nRun Summary");
            println!("===========");
            println!("Series loaded:   {}", report.series_loaded);
            println!("Series aligned:  {}", report.series_aligned);
            println!("Entries skipped: {}", report.entries_skipped);
            println!(
                "Features:        {} built of {} requested",
                report.features_built, report.features_requested
            );
            println!("Frame rows:      {}", report.frame_rows);
            println!(
                "Split:           train {} / validation {} / test {}",
                report.split.train_rows, report.split.validation_rows, report.split.test_rows
            );
            for artifact in &report.artifacts {
                println!("Artifact:        {}", artifact.display());
            }
        }

        Commands::Catalog { output } => {
            let json = default_catalog().to_json()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {:?}", path))?;
                    info!("wrote catalog to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}
