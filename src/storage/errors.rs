//! Storage error types
//!
//! Error codes:
//! - QUARRY_COLLECTION_EXISTS
//! - QUARRY_COLLECTION_NOT_FOUND
//! - QUARRY_PARTITION_EXISTS
//! - QUARRY_PARTITION_NOT_FOUND
//! - QUARRY_ROW_VALIDATION_FAILED (insert rejected by the schema)

use std::fmt;

use crate::schema::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    CollectionExists,
    CollectionNotFound,
    PartitionExists,
    PartitionNotFound,
    /// Insert batch rejected by row validation
    RowRejected,
}

impl StorageErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::CollectionExists => "QUARRY_COLLECTION_EXISTS",
            StorageErrorCode::CollectionNotFound => "QUARRY_COLLECTION_NOT_FOUND",
            StorageErrorCode::PartitionExists => "QUARRY_PARTITION_EXISTS",
            StorageErrorCode::PartitionNotFound => "QUARRY_PARTITION_NOT_FOUND",
            StorageErrorCode::RowRejected => "QUARRY_ROW_VALIDATION_FAILED",
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with context
#[derive(Debug, Clone)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    source: Option<SchemaError>,
}

impl StorageError {
    fn new(code: StorageErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            source: None,
        }
    }

    pub fn collection_exists(name: &str) -> Self {
        Self::new(
            StorageErrorCode::CollectionExists,
            format!("collection {} already exists", name),
        )
    }

    pub fn collection_not_found(name: &str) -> Self {
        Self::new(
            StorageErrorCode::CollectionNotFound,
            format!("collection {} not found", name),
        )
    }

    pub fn partition_exists(collection: &str, partition: &str) -> Self {
        Self::new(
            StorageErrorCode::PartitionExists,
            format!(
                "partition {} already exists in collection {}",
                partition, collection
            ),
        )
    }

    pub fn partition_not_found(partition: &str) -> Self {
        Self::new(
            StorageErrorCode::PartitionNotFound,
            format!("partition name {} not found", partition),
        )
    }

    /// Wraps a row validation failure from the schema layer
    pub fn row_rejected(source: SchemaError) -> Self {
        Self {
            code: StorageErrorCode::RowRejected,
            message: source.message().to_string(),
            source: Some(source),
        }
    }

    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<SchemaError> for StorageError {
    fn from(e: SchemaError) -> Self {
        Self::row_rejected(e)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
