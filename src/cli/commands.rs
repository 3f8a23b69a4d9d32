//! CLI command implementations
//!
//! `query` boots in a fixed order:
//! 1. Configuration load
//! 2. Dataset load (collections, partitions, rows, flush, load)
//! 3. Serving loop: one request line in, one response line out
//!
//! A request that fails becomes an error response; only configuration,
//! dataset and I/O failures end the process.

use std::collections::HashSet;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::api::QueryEngine;
use crate::config::EngineConfig;
use crate::observability::{Event, Logger};
use crate::schema::CollectionSchema;
use crate::storage::Catalog;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_requests, write_json};

/// Dataset file structure
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    pub collections: Vec<CollectionSpec>,
}

/// One collection in a dataset file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionSpec {
    pub name: String,
    pub schema: CollectionSchema,

    /// Partitions created besides the default one
    #[serde(default)]
    pub partitions: Vec<PartitionSpec>,

    /// Rows inserted into the default partition
    #[serde(default)]
    pub rows: Vec<Value>,

    /// Seal growing data after inserting
    #[serde(default)]
    pub flush: bool,

    /// Partitions to load; absent loads the whole collection, `[]` loads none
    #[serde(default)]
    pub loaded: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartitionSpec {
    pub name: String,
    #[serde(default)]
    pub rows: Vec<Value>,
}

impl Dataset {
    /// Load a dataset from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::dataset(format!("failed to read dataset {}: {}", path.display(), e))
        })?;

        let dataset: Dataset = serde_json::from_str(&content)
            .map_err(|e| CliError::dataset(format!("invalid dataset JSON: {}", e)))?;

        let mut seen = HashSet::new();
        for spec in &dataset.collections {
            if !seen.insert(spec.name.as_str()) {
                return Err(CliError::dataset(format!(
                    "collection '{}' declared twice",
                    spec.name
                )));
            }
        }

        Ok(dataset)
    }

    /// Builds a catalog holding every collection of the dataset
    pub fn into_catalog(self, config: &EngineConfig) -> CliResult<Catalog> {
        let catalog = Catalog::new(config);

        for spec in self.collections {
            catalog.create_collection(&spec.name, spec.schema)?;

            if !spec.rows.is_empty() {
                catalog.insert(&spec.name, None, &spec.rows)?;
            }

            for partition in &spec.partitions {
                catalog.create_partition(&spec.name, &partition.name)?;
                if !partition.rows.is_empty() {
                    catalog.insert(&spec.name, Some(partition.name.as_str()), &partition.rows)?;
                }
            }

            if spec.flush {
                catalog.flush(&spec.name)?;
            }

            match spec.loaded.as_deref() {
                None => catalog.load(&spec.name, None)?,
                Some([]) => {}
                Some(names) => catalog.load(&spec.name, Some(names))?,
            }
        }

        Ok(catalog)
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Query { dataset, config } => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            query(&dataset, config.as_deref(), stdin.lock(), &mut stdout.lock())
        }
    }
}

/// Loads configuration and dataset, then answers every request line
/// of `input` on `output`.
pub fn query<R: BufRead, W: Write>(
    dataset_path: &Path,
    config_path: Option<&Path>,
    input: R,
    output: &mut W,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let catalog = Dataset::load(dataset_path)?.into_catalog(&config)?;
    let engine = QueryEngine::new(&catalog, config);

    for line in read_requests(input) {
        let response = engine.handle_json(&line?);
        write_json(output, &response.to_json())?;
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    let config = match path {
        Some(p) => EngineConfig::load(p)?,
        None => EngineConfig::default(),
    };

    let source = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "default".to_string());
    let max_limit = config.max_limit.to_string();
    let max_offset = config.max_offset.to_string();
    Logger::event(
        Event::ConfigLoaded,
        &[
            ("max_limit", max_limit.as_str()),
            ("max_offset", max_offset.as_str()),
            ("source", source.as_str()),
        ],
    );

    Ok(config)
}
