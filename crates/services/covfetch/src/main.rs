//! covfetch
//!
//! Fetches the defects of a stream from a defect service once a build step
//! committed its analysis results, and decides the outcome of the build:
//!
//! - **Parse**: Parse and display the configuration file
//! - **Fetch**: Fetch the defects for a build and write a JSON report
//!
//! The process exits with a failure code when the build ends up failed.

mod build_record;
mod cli;
mod commands;
mod error;
mod prelude;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands};
use cov_config::CovUserConfig;
use cov_defects::BuildOutcome;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{handle_fetch, handle_parse};
use crate::prelude::*;

/// # Examples
///
/// ```bash
/// # Parse configuration
/// covfetch --config covfetch.toml parse
///
/// # Fetch the defects of build 12 of job demo
/// covfetch --config covfetch.toml fetch --build-url job/demo/12/ --output result.json
/// ```
#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "covfetch=info,cov_defects=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = CovUserConfig::from_file(&cli.config)?;

    match cli.command {
        Commands::Parse => {
            handle_parse(&config)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Fetch {
            build_url,
            outcome,
            output,
        } => {
            let report = handle_fetch(&config, build_url, outcome, &output).await?;
            if report.outcome.is_better_than(BuildOutcome::Failure) {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
