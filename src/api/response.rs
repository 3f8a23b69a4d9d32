//! API response types
//!
//! `{"status":"ok","data":[...]}` or `{"status":"error","code","message"}`.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::executor::Record;

use super::errors::QueryError;

/// Success response
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub status: String,
    pub data: Vec<Record>,
}

impl SuccessResponse {
    pub fn new(data: Vec<Record>) -> Self {
        Self {
            status: "ok".to_string(),
            data,
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            status: "error".to_string(),
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    pub fn from_error(err: &QueryError) -> Self {
        Self::new(err.code(), err.message())
    }
}

/// Unified response type
#[derive(Debug, Clone)]
pub enum Response {
    Success(SuccessResponse),
    Error(ErrorResponse),
}

impl Response {
    pub fn success(data: Vec<Record>) -> Self {
        Response::Success(SuccessResponse::new(data))
    }

    pub fn error(err: &QueryError) -> Self {
        Response::Error(ErrorResponse::from_error(err))
    }

    /// Convert to a single-line JSON string
    pub fn to_json(&self) -> String {
        let encoded = match self {
            Response::Success(r) => serde_json::to_string(r),
            Response::Error(r) => serde_json::to_string(r),
        };
        encoded.unwrap_or_else(|e| {
            json!({
                "status": "error",
                "code": "QUARRY_INVALID_REQUEST",
                "message": format!("response encoding failed: {}", e),
            })
            .to_string()
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::schema::{FieldValue, ScalarValue};

    #[test]
    fn test_success_response() {
        let record = Record::new(vec![(
            "pk".to_string(),
            FieldValue::Scalar(ScalarValue::Int(1)),
        )]);
        let resp = Response::success(vec![record]);
        assert!(resp.is_success());
        assert_eq!(resp.to_json(), r#"{"status":"ok","data":[{"pk":1}]}"#);
    }

    #[test]
    fn test_error_response() {
        let err: QueryError = ApiError::invalid_type("The type of expr must be string").into();
        let resp = Response::error(&err);
        assert!(!resp.is_success());
        let json = resp.to_json();
        assert!(json.contains("\"status\":\"error\""));
        assert!(json.contains("QUARRY_INVALID_TYPE"));
        assert!(json.contains("The type of expr must be string"));
    }
}
