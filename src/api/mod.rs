//! API layer for quarry
//!
//! The query surface: typed [`QueryRequest`]s or raw JSON lines in,
//! records or a coded error out.
//!
//! # Design Principles
//!
//! - Argument shapes are checked before any schema lookup
//! - Error codes from lower subsystems pass through unchanged
//! - No partial success: an error never comes with records
//! - Read-only: queries never mutate stored entities

mod errors;
mod handler;
mod request;
mod response;

pub use errors::{ApiError, ApiErrorCode, ApiResult, QueryError, QueryResult};
pub use handler::QueryEngine;
pub use request::QueryRequest;
pub use response::{ErrorResponse, Response, SuccessResponse};
