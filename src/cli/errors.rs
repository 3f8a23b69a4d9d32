//! CLI-specific error types
//!
//! All CLI errors are fatal: the process prints the error and exits non-zero.
//! Per-request failures are not CLI errors; they become error responses.

use std::io;

use thiserror::Error;

use crate::api::QueryError;
use crate::config::ConfigError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("QUARRY_CLI_IO_ERROR: {0}")]
    Io(#[from] io::Error),

    #[error("QUARRY_CLI_IO_ERROR: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{}: {}", .0.code(), .0)]
    Config(#[from] ConfigError),

    #[error("QUARRY_CLI_DATASET_INVALID: {0}")]
    Storage(#[from] StorageError),

    #[error("QUARRY_CLI_DATASET_INVALID: {0}")]
    Dataset(String),

    #[error("{0}")]
    Query(#[from] QueryError),
}

impl CliError {
    pub fn dataset(message: impl Into<String>) -> Self {
        CliError::Dataset(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            CliError::Io(_) | CliError::Json(_) => "QUARRY_CLI_IO_ERROR",
            CliError::Config(e) => e.code(),
            CliError::Storage(_) | CliError::Dataset(_) => "QUARRY_CLI_DATASET_INVALID",
            CliError::Query(e) => e.code(),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = CliError::dataset("collection 'c' declared twice");
        assert_eq!(err.code(), "QUARRY_CLI_DATASET_INVALID");
        assert_eq!(
            err.to_string(),
            "QUARRY_CLI_DATASET_INVALID: collection 'c' declared twice"
        );

        let err = CliError::from(ConfigError::Invalid("max_limit must be > 0".into()));
        assert_eq!(err.code(), "QUARRY_CONFIG_INVALID");
        assert!(err.to_string().starts_with("QUARRY_CONFIG_INVALID: "));

        let err = CliError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(err.code(), "QUARRY_CLI_IO_ERROR");
    }
}
