//! Command-line interface for covfetch.

use clap::{Parser, Subcommand};
use cov_defects::BuildOutcome;
use std::path::PathBuf;

/// Command-line interface for covfetch.
#[derive(Parser)]
#[command(name = "covfetch")]
#[command(about = "Fetch the defects of a stream and decide the outcome of a build")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse and display the configuration file
    Parse,

    /// Fetch the defects of the configured stream for a build
    Fetch {
        /// Path of the build relative to the build host root URL, e.g. job/demo/12/
        #[arg(long)]
        build_url: String,

        /// Outcome of the build before fetching defects
        #[arg(long, default_value = "success")]
        outcome: BuildOutcome,

        /// File the JSON report is written to
        #[arg(short, long, default_value = "covfetch-result.json")]
        output: PathBuf,
    },
}
