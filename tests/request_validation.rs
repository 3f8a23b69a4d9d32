//! Request Validation Tests
//!
//! JSON request handling through `QueryEngine::handle_json`:
//! - Argument shapes are checked before any schema lookup
//! - Every failure is a single error response, never partial data
//! - Error codes pass through unchanged from the failing subsystem

use quarry::api::{QueryEngine, QueryRequest, Response};
use quarry::config::EngineConfig;
use quarry::schema::{CollectionSchema, DataType, FieldDef};
use quarry::storage::Catalog;
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn config() -> EngineConfig {
    EngineConfig {
        log_queries: false,
        ..EngineConfig::default()
    }
}

fn setup_catalog() -> Catalog {
    let catalog = Catalog::new(&config());
    let schema = CollectionSchema::new(
        vec![
            FieldDef::primary("pk", DataType::VarChar),
            FieldDef::scalar("count", DataType::Int16),
            FieldDef::float_vector("embedding", 2),
        ],
        false,
    )
    .unwrap();
    catalog.create_collection("c", schema).unwrap();
    let rows: Vec<_> = ["b", "a", "c"]
        .iter()
        .enumerate()
        .map(|(i, pk)| json!({"pk": pk, "count": i, "embedding": [0.0, 0.0]}))
        .collect();
    catalog.insert("c", None, &rows).unwrap();
    catalog.load("c", None).unwrap();
    catalog
}

fn handle(catalog: &Catalog, request: Value) -> Value {
    let engine = QueryEngine::new(catalog, config());
    let response = engine.handle_json(&request.to_string());
    serde_json::from_str(&response.to_json()).unwrap()
}

fn error_code(response: &Value) -> &str {
    assert_eq!(response["status"], "error", "{}", response);
    assert!(response.get("data").is_none());
    response["code"].as_str().unwrap()
}

// =============================================================================
// Success Tests
// =============================================================================

#[test]
fn test_varchar_primary_key_ordering() {
    let catalog = setup_catalog();
    let response = handle(&catalog, json!({"collection": "c", "expr": "count >= 0"}));
    assert_eq!(
        response,
        json!({"status": "ok", "data": [{"pk": "a"}, {"pk": "b"}, {"pk": "c"}]})
    );
}

#[test]
fn test_null_optionals_are_omitted() {
    let catalog = setup_catalog();
    let response = handle(
        &catalog,
        json!({
            "collection": "c",
            "expr": "pk in [\"a\"]",
            "output_fields": null,
            "partition_names": null,
            "offset": null,
            "limit": null,
        }),
    );
    assert_eq!(response, json!({"status": "ok", "data": [{"pk": "a"}]}));
}

// =============================================================================
// Shape Tests
// =============================================================================

#[test]
fn test_expr_required_as_string() {
    let catalog = setup_catalog();
    for request in [
        json!({"collection": "c"}),
        json!({"collection": "c", "expr": null}),
        json!({"collection": "c", "expr": 5}),
    ] {
        let response = handle(&catalog, request);
        assert_eq!(error_code(&response), "QUARRY_INVALID_TYPE");
        assert_eq!(response["message"], "The type of expr must be string");
    }
}

#[test]
fn test_empty_expr_is_syntax_error() {
    let catalog = setup_catalog();
    for expr in ["", " \t "] {
        let response = handle(&catalog, json!({"collection": "c", "expr": expr}));
        assert_eq!(error_code(&response), "QUARRY_EXPR_SYNTAX");
    }
}

#[test]
fn test_partition_names_must_be_strings() {
    let catalog = setup_catalog();
    for names in [json!("_default"), json!([1]), json!({"p": 1})] {
        let response = handle(
            &catalog,
            json!({"collection": "c", "expr": "count > 0", "partition_names": names}),
        );
        assert_eq!(error_code(&response), "QUARRY_INVALID_TYPE");
    }
}

#[test]
fn test_malformed_requests() {
    let catalog = setup_catalog();
    let engine = QueryEngine::new(&catalog, config());
    for raw in ["", "{", "[]", "\"query\"", r#"{"expr": "count > 0"}"#] {
        let response = engine.handle_json(raw);
        assert!(!response.is_success());
        assert!(response.to_json().contains("QUARRY_INVALID_REQUEST"), "{}", raw);
    }
}

#[test]
fn test_unknown_request_key() {
    let catalog = setup_catalog();
    let response = handle(
        &catalog,
        json!({"collection": "c", "expr": "count > 0", "guarantee_timestamp": 0}),
    );
    assert_eq!(error_code(&response), "QUARRY_INVALID_REQUEST");
    assert!(response["message"]
        .as_str()
        .unwrap()
        .contains("guarantee_timestamp"));
}

// =============================================================================
// Ordering Tests
// =============================================================================

/// Range errors win over expression errors.
#[test]
fn test_range_checked_before_expression() {
    let catalog = setup_catalog();
    let response = handle(
        &catalog,
        json!({"collection": "c", "expr": "nope >", "offset": -1}),
    );
    assert_eq!(error_code(&response), "QUARRY_INVALID_RANGE");
}

/// Expression errors win over projection and partition errors.
#[test]
fn test_expression_checked_before_projection() {
    let catalog = setup_catalog();
    let response = handle(
        &catalog,
        json!({
            "collection": "c",
            "expr": "nope > 1",
            "output_fields": ["missing"],
            "partition_names": ["missing"],
        }),
    );
    assert_eq!(error_code(&response), "QUARRY_UNKNOWN_FIELD");
    assert_eq!(response["message"], "fieldName(nope) not found");
}

#[test]
fn test_projection_checked_before_partitions() {
    let catalog = setup_catalog();
    let response = handle(
        &catalog,
        json!({
            "collection": "c",
            "expr": "count > 1",
            "output_fields": ["missing"],
            "partition_names": ["missing"],
        }),
    );
    assert_eq!(error_code(&response), "QUARRY_FIELD_NOT_FOUND");
}

#[test]
fn test_typed_and_json_surfaces_agree() {
    let catalog = setup_catalog();
    let engine = QueryEngine::new(&catalog, config());

    let typed = engine
        .query(&QueryRequest::new("c", "count < 2").output_fields(["*"]).limit(1))
        .unwrap();
    let json = engine.handle_json(
        r#"{"collection": "c", "expr": "count < 2", "output_fields": ["*"], "limit": 1}"#,
    );
    assert_eq!(json.to_json(), Response::success(typed).to_json());
}
