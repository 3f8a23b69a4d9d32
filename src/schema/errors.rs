//! Schema error types
//!
//! Error codes:
//! - QUARRY_SCHEMA_INVALID
//! - QUARRY_ROW_VALIDATION_FAILED

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema structure is malformed
    SchemaInvalid,
    /// Inserted row violates the schema
    RowValidationFailed,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::SchemaInvalid => "QUARRY_SCHEMA_INVALID",
            SchemaErrorCode::RowValidationFailed => "QUARRY_ROW_VALIDATION_FAILED",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation failure details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field name
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn extra_field(field: impl Into<String>) -> Self {
        Self::new(field, "no undeclared fields", "extra field present")
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, "non-null value", "null")
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Schema error with context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    details: Option<ValidationDetails>,
}

impl SchemaError {
    /// Create a malformed schema error
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::SchemaInvalid,
            message: reason.into(),
            details: None,
        }
    }

    /// Create a row validation error; `row` is the index within the insert batch
    pub fn row_invalid(row: usize, details: ValidationDetails) -> Self {
        Self {
            code: SchemaErrorCode::RowValidationFailed,
            message: format!("row {} failed validation: {}", row, details),
            details: Some(details),
        }
    }

    /// Create a row-level error that is not about a single field
    pub fn row_rejected(row: usize, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::RowValidationFailed,
            message: format!("row {} rejected: {}", row, reason.into()),
            details: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns validation details if applicable
    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
