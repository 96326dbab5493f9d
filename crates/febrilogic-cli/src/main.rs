//! FebriLogic: ranked probabilities for acute febrile illness.
//! Entry point for the command-line binary.

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use febrilogic_config::Config;
use febrilogic_data::ReferenceData;
use febrilogic_engine::ReferenceTables;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Logs go to stderr; stdout carries the JSON report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "FebriLogic starting");

    let data = ReferenceData::load(&config.data.symptom_weights_file, &config.data.biomarker_stats_file)?;
    info!(
        n_diseases = data.symptom_weights().len(),
        loaded_at = %data.loaded_at(),
        "Reference tables ready"
    );

    let output = match cli.command {
        Command::Diagnose(args) => {
            let top_k = args.top_k.unwrap_or(config.ranking.top_k);
            serde_json::to_string_pretty(&commands::diagnose(&data, &args, top_k)?)?
        }
        Command::Evaluate(args) => {
            let report = commands::evaluate(&data, &args.patients, &args.biomarkers, args.details)?;
            serde_json::to_string_pretty(&report)?
        }
    };
    println!("{output}");

    Ok(())
}
