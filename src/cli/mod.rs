//! CLI module for quarry
//!
//! Provides the `query` command: load a dataset, then serve JSON query
//! requests line by line over stdin/stdout.

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{query, run, run_command, CollectionSpec, Dataset, PartitionSpec};
pub use errors::{CliError, CliResult};
pub use io::{read_requests, write_json};
