//! API error types
//!
//! Request-shape errors are raised here. Errors from lower subsystems
//! (planner, executor) pass through [`QueryError`] with their codes
//! unchanged.
//!
//! Error codes:
//! - QUARRY_INVALID_TYPE
//! - QUARRY_INVALID_QUERY_FORMAT
//! - QUARRY_INVALID_REQUEST

use std::fmt;

use thiserror::Error;

use crate::executor::ExecutorError;
use crate::planner::PlannerError;

/// API-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// Argument has the wrong JSON type
    InvalidType,
    /// `output_fields` is not a list of strings
    InvalidQueryFormat,
    /// Request is not a well-formed query request
    InvalidRequest,
}

impl ApiErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorCode::InvalidType => "QUARRY_INVALID_TYPE",
            ApiErrorCode::InvalidQueryFormat => "QUARRY_INVALID_QUERY_FORMAT",
            ApiErrorCode::InvalidRequest => "QUARRY_INVALID_REQUEST",
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Request-shape error
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    code: ApiErrorCode,
    message: String,
}

impl ApiError {
    pub fn invalid_type(message: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::InvalidType,
            message: message.into(),
        }
    }

    pub fn invalid_query_format() -> Self {
        Self {
            code: ApiErrorCode::InvalidQueryFormat,
            message: "Invalid query format. 'output_fields' must be a list".to_string(),
        }
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::InvalidRequest,
            message: reason.into(),
        }
    }

    pub fn code(&self) -> ApiErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for request parsing
pub type ApiResult<T> = Result<T, ApiError>;

/// Any error a query can fail with
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    #[error(transparent)]
    Request(#[from] ApiError),

    #[error(transparent)]
    Planner(#[from] PlannerError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl QueryError {
    /// Stable `QUARRY_*` code of the underlying error
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Request(e) => e.code().code(),
            QueryError::Planner(e) => e.code().code(),
            QueryError::Executor(e) => e.code().code(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            QueryError::Request(e) => e.message(),
            QueryError::Planner(e) => e.message(),
            QueryError::Executor(e) => e.message(),
        }
    }
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
