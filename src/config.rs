//! Engine configuration
//!
//! Loaded from a JSON file; every field has a default so `{}` is a
//! valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard upper bound for both `offset` and `limit`
pub const MAX_WINDOW: i64 = 16384;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        "QUARRY_CONFIG_INVALID"
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Largest accepted `offset`
    #[serde(default = "default_max_window")]
    pub max_offset: i64,

    /// Largest accepted `limit`
    #[serde(default = "default_max_window")]
    pub max_limit: i64,

    /// Partition created with every collection and used when an insert names none
    #[serde(default = "default_partition")]
    pub default_partition: String,

    /// Emit QUERY_* log events
    #[serde(default = "default_log_queries")]
    pub log_queries: bool,
}

fn default_max_window() -> i64 {
    MAX_WINDOW
}
fn default_partition() -> String {
    "_default".to_string()
}
fn default_log_queries() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_offset: default_max_window(),
            max_limit: default_max_window(),
            default_partition: default_partition(),
            log_queries: default_log_queries(),
        }
    }
}

impl EngineConfig {
    /// Load and validate configuration from a file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (name, value) in [("max_offset", self.max_offset), ("max_limit", self.max_limit)] {
            if value < 1 || value > MAX_WINDOW {
                return Err(ConfigError::Invalid(format!(
                    "{} must be in [1, {}], got {}",
                    name, MAX_WINDOW, value
                )));
            }
        }

        if self.default_partition.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_partition must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
