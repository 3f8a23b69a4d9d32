//! Executor error types
//!
//! Error codes:
//! - QUARRY_PARTITION_NOT_FOUND
//! - QUARRY_COLLECTION_NOT_LOADED
//! - QUARRY_FIELD_NOT_FOUND
//! - QUARRY_INVALID_RANGE

use std::fmt;

/// Executor-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// A requested partition does not exist
    PartitionNotFound,
    /// The requested partitions are not loaded for serving
    CollectionNotLoaded,
    /// A requested output field does not exist
    FieldNotFound,
    /// offset or limit outside its valid range
    InvalidRange,
}

impl ExecutorErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::PartitionNotFound => "QUARRY_PARTITION_NOT_FOUND",
            ExecutorErrorCode::CollectionNotLoaded => "QUARRY_COLLECTION_NOT_LOADED",
            ExecutorErrorCode::FieldNotFound => "QUARRY_FIELD_NOT_FOUND",
            ExecutorErrorCode::InvalidRange => "QUARRY_INVALID_RANGE",
        }
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Executor error type with full context
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorError {
    code: ExecutorErrorCode,
    message: String,
}

impl ExecutorError {
    pub fn partition_not_found(partition: &str) -> Self {
        Self {
            code: ExecutorErrorCode::PartitionNotFound,
            message: format!("partition name {} not found", partition),
        }
    }

    pub fn collection_not_loaded(collection: &str) -> Self {
        Self {
            code: ExecutorErrorCode::CollectionNotLoaded,
            message: format!("collection {} was not loaded into memory", collection),
        }
    }

    pub fn field_not_found(field: &str) -> Self {
        Self {
            code: ExecutorErrorCode::FieldNotFound,
            message: format!("Field {} not exist", field),
        }
    }

    /// `name` is `offset` or `limit`
    pub fn invalid_range(name: &str, value: i64, min: i64, max: i64) -> Self {
        Self {
            code: ExecutorErrorCode::InvalidRange,
            message: format!(
                "{} [{}] is invalid, should be in range [{}, {}], but got {}",
                name, value, min, max, value
            ),
        }
    }

    pub fn code(&self) -> ExecutorErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl std::error::Error for ExecutorError {}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
