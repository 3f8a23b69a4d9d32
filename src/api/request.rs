//! API request types
//!
//! [`QueryRequest`] is the typed query surface. [`QueryRequest::parse_json`]
//! builds one from a raw JSON object, checking argument shapes before any
//! schema lookup happens.

use serde_json::{Map, Value};

use super::errors::{ApiError, ApiResult};

const KNOWN_KEYS: [&str; 6] = [
    "collection",
    "expr",
    "output_fields",
    "partition_names",
    "offset",
    "limit",
];

/// Query request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryRequest {
    pub collection: String,
    /// `None` matches every entity
    pub expr: Option<String>,
    pub output_fields: Option<Vec<String>>,
    pub partition_names: Option<Vec<String>>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl QueryRequest {
    /// A filtered query
    pub fn new(collection: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            expr: Some(expr.into()),
            ..Self::default()
        }
    }

    /// A query without a filter expression
    pub fn match_all(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            ..Self::default()
        }
    }

    pub fn output_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn partition_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partition_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Parses a JSON request object.
    ///
    /// `expr` is required here; match-all is only available through
    /// [`QueryRequest::match_all`].
    pub fn parse_json(value: &Value) -> ApiResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| ApiError::invalid_request("query request must be a JSON object"))?;

        if let Some(unknown) = obj.keys().find(|k| !KNOWN_KEYS.contains(&k.as_str())) {
            return Err(ApiError::invalid_request(format!(
                "unknown request field '{}'",
                unknown
            )));
        }

        let collection = match obj.get("collection") {
            Some(Value::String(s)) => s.clone(),
            None | Some(Value::Null) => {
                return Err(ApiError::invalid_request("collection is required"))
            }
            Some(_) => {
                return Err(ApiError::invalid_type(
                    "The type of collection must be string",
                ))
            }
        };

        let expr = match obj.get("expr") {
            Some(Value::String(s)) => s.clone(),
            _ => return Err(ApiError::invalid_type("The type of expr must be string")),
        };

        let output_fields = match obj.get("output_fields") {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(
                string_list(items).ok_or_else(ApiError::invalid_query_format)?,
            ),
            Some(_) => return Err(ApiError::invalid_query_format()),
        };

        let partition_names = match obj.get("partition_names") {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(string_list(items).ok_or_else(|| {
                ApiError::invalid_type("The type of partition_names must be list of string")
            })?),
            Some(_) => {
                return Err(ApiError::invalid_type(
                    "The type of partition_names must be list of string",
                ))
            }
        };

        Ok(Self {
            collection,
            expr: Some(expr),
            output_fields,
            partition_names,
            offset: integer_arg(obj, "offset")?,
            limit: integer_arg(obj, "limit")?,
        })
    }
}

fn string_list(items: &[Value]) -> Option<Vec<String>> {
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

/// Reads an optional integer argument. Integers above `i64::MAX` saturate
/// and are rejected later by range validation.
fn integer_arg(obj: &Map<String, Value>, name: &str) -> ApiResult<Option<i64>> {
    match obj.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => {
            Ok(Some(n.as_i64().unwrap_or(i64::MAX)))
        }
        Some(other) => Err(ApiError::invalid_type(format!(
            "{} [{}] is invalid, should be int",
            name, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiErrorCode;
    use serde_json::json;

    #[test]
    fn test_builders() {
        let req = QueryRequest::new("c", "pk > 1")
            .output_fields(["*", "%"])
            .partition_names(vec!["p1".to_string()])
            .offset(1)
            .limit(2);
        assert_eq!(req.expr.as_deref(), Some("pk > 1"));
        assert_eq!(req.output_fields, Some(vec!["*".to_string(), "%".to_string()]));
        assert_eq!(req.offset, Some(1));
        assert_eq!(req.limit, Some(2));

        assert_eq!(QueryRequest::match_all("c").expr, None);
    }

    #[test]
    fn test_parse_full_request() {
        let req = QueryRequest::parse_json(&json!({
            "collection": "c",
            "expr": "pk in [1]",
            "output_fields": ["float"],
            "partition_names": ["_default"],
            "offset": 0,
            "limit": 10,
        }))
        .unwrap();
        assert_eq!(req.collection, "c");
        assert_eq!(req.output_fields, Some(vec!["float".to_string()]));
        assert_eq!(req.partition_names, Some(vec!["_default".to_string()]));
        assert_eq!(req.limit, Some(10));
    }

    #[test]
    fn test_expr_must_be_string() {
        for expr in [json!(null), json!(1), json!(["pk > 1"])] {
            let err = QueryRequest::parse_json(&json!({"collection": "c", "expr": expr}))
                .unwrap_err();
            assert_eq!(err.code(), ApiErrorCode::InvalidType);
            assert_eq!(err.message(), "The type of expr must be string");
        }
        let err = QueryRequest::parse_json(&json!({"collection": "c"})).unwrap_err();
        assert_eq!(err.code(), ApiErrorCode::InvalidType);
    }

    #[test]
    fn test_output_fields_must_be_list_of_strings() {
        for fields in [json!("*"), json!(1), json!({"a": 1}), json!([1, 2])] {
            let err = QueryRequest::parse_json(&json!({
                "collection": "c",
                "expr": "pk > 1",
                "output_fields": fields,
            }))
            .unwrap_err();
            assert_eq!(err.code(), ApiErrorCode::InvalidQueryFormat);
            assert!(err.message().contains("'output_fields' must be a list"));
        }
    }

    #[test]
    fn test_offset_and_limit_must_be_integers() {
        for bad in [json!("1"), json!([1]), json!(1.5), json!(true)] {
            let err = QueryRequest::parse_json(&json!({
                "collection": "c",
                "expr": "pk > 1",
                "limit": bad,
            }))
            .unwrap_err();
            assert_eq!(err.code(), ApiErrorCode::InvalidType);
            assert!(err.message().starts_with("limit"));
        }
        let req = QueryRequest::parse_json(&json!({
            "collection": "c",
            "expr": "pk > 1",
            "offset": -1,
        }))
        .unwrap();
        assert_eq!(req.offset, Some(-1));
    }

    #[test]
    fn test_request_shape() {
        let err = QueryRequest::parse_json(&json!(["c"])).unwrap_err();
        assert_eq!(err.code(), ApiErrorCode::InvalidRequest);

        let err = QueryRequest::parse_json(&json!({"expr": "pk > 1"})).unwrap_err();
        assert_eq!(err.code(), ApiErrorCode::InvalidRequest);

        let err = QueryRequest::parse_json(&json!({
            "collection": "c",
            "expr": "pk > 1",
            "consistency": "strong",
        }))
        .unwrap_err();
        assert!(err.message().contains("consistency"));
    }
}
