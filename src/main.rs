//! Pothole Analysis - CLI Entry Point
//!
//! `analyze` runs the external analysis command over a records file and
//! prints the result envelope; `fallback` prints only the in-process report.
//! Logs go to stderr so stdout carries nothing but JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use pothole_analysis::{
    analyze_records_file, fallback_report, render_json, AnalysisRunner, ConfigOverrides,
    ConfigService,
};

/// Command-line arguments for pothole-analysis
#[derive(Parser, Debug)]
#[command(name = "pothole-analysis")]
#[command(about = "Run the external pothole analysis with result reconciliation and fallback")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the external analysis over a records file
    Analyze {
        /// JSON file with a records array (or `{"potholes": [...]}`)
        #[arg(short, long)]
        records: PathBuf,

        /// JSON config file; created with defaults if missing
        #[arg(short, long, env = "POTHOLE_ANALYSIS_CONFIG")]
        config: Option<PathBuf>,

        /// Command template with {input} and {output} placeholders
        #[arg(long)]
        command_template: Option<String>,

        /// Where to write the input records for the command
        #[arg(long)]
        input_path: Option<PathBuf>,

        /// Where the command is expected to write its result
        #[arg(long)]
        output_path: Option<PathBuf>,

        /// Working directory for the command
        #[arg(long)]
        working_dir: Option<PathBuf>,

        /// Command time limit in seconds (0 waits indefinitely)
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },
    /// Compute only the in-process report for a records file
    Fallback {
        /// JSON file with a records array (or `{"potholes": [...]}`)
        #[arg(short, long)]
        records: PathBuf,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pothole_analysis=info,pothole_analysis_engine=info".into()),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Analyze {
            records,
            config,
            command_template,
            input_path,
            output_path,
            working_dir,
            timeout_secs,
            compact,
        } => {
            let service = ConfigService::load(config.as_deref())
                .context("Failed to load analysis configuration")?;
            match service.config_path() {
                Some(path) => info!("Loaded analysis configuration from {}", path.display()),
                None => info!("Using default analysis configuration"),
            }
            let mut analysis_config = service.into_config();
            analysis_config.apply_overrides(ConfigOverrides {
                command_template,
                input_path,
                output_path,
                working_dir,
                timeout_secs,
            });
            analysis_config
                .validate()
                .map_err(anyhow::Error::msg)
                .context("Invalid analysis configuration")?;

            info!(
                "Starting pothole-analysis v{} (records: {})",
                env!("CARGO_PKG_VERSION"),
                records.display()
            );

            let runner = AnalysisRunner::new(analysis_config)?;
            let envelope = analyze_records_file(&runner, &records)
                .await
                .context("Analysis invocation failed")?;
            println!("{}", render_json(&envelope, compact)?);
        }
        Commands::Fallback { records, compact } => {
            let report = fallback_report(&records)
                .await
                .context("Fallback analysis failed")?;
            println!("{}", render_json(&report, compact)?);
        }
    }

    Ok(())
}
