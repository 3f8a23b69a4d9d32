//! CLI argument definitions using clap
//!
//! Commands:
//! - quarry query --dataset <path> [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// quarry - filtered entity retrieval over an in-memory collection store
#[derive(Parser, Debug)]
#[command(name = "quarry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a dataset, then answer one JSON query request per stdin line
    Query {
        /// Path to the dataset file
        #[arg(long)]
        dataset: PathBuf,

        /// Path to the engine configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
