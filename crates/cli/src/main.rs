//! # OMR Pipeline CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - `run`: explicit tool locations (flags or environment)
//! - `convert`: tool locations from a config file, derived output names
//! - `validate`: config and tool location checks

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_convert, run_pipeline, run_validate};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging based on CLI options
    init_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "OMR pipeline starting");

    // Execute command
    let result = match &cli.command {
        Commands::Run(args) => run_pipeline(args),
        Commands::Convert(args) => run_convert(args),
        Commands::Validate(args) => run_validate(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let config = if cli.quiet {
        ObservabilityConfig {
            log_format: cli.log_format.into(),
            default_log_level: "warn".to_string(),
            force_level: true,
        }
    } else {
        let default_level = match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        ObservabilityConfig {
            log_format: cli.log_format.into(),
            default_log_level: default_level.to_string(),
            force_level: false,
        }
    };

    observability::init_with_config(config)
}
