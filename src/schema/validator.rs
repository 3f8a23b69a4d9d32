//! Row validator: converts inserted JSON rows into entities
//!
//! Validation semantics:
//! - Every declared field is present (except an auto-id primary key)
//! - No undeclared fields exist
//! - Values match the declared type exactly, integer widths are range-checked
//! - Vector lengths match the declared dimension
//! - Null values are rejected
//!
//! Validation is deterministic and never mutates the input.

use std::collections::HashMap;

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::types::{CollectionSchema, DataType, FieldDef};
use super::value::{Entity, PrimaryKey, ScalarValue, VectorValue};

/// Validates rows against a collection schema.
pub struct RowValidator<'a> {
    schema: &'a CollectionSchema,
}

impl<'a> RowValidator<'a> {
    pub fn new(schema: &'a CollectionSchema) -> Self {
        Self { schema }
    }

    /// Validates one row and builds the entity it describes.
    ///
    /// `row` is the position within the insert batch (for error messages).
    /// `generated_pk` must be `Some` exactly when the schema uses auto_id.
    pub fn validate_row(
        &self,
        row: usize,
        value: &Value,
        generated_pk: Option<i64>,
    ) -> SchemaResult<Entity> {
        let obj = value.as_object().ok_or_else(|| {
            SchemaError::row_invalid(
                row,
                ValidationDetails::new("$row", "object", json_type_name(value)),
            )
        })?;

        for key in obj.keys() {
            if self.schema.field(key).is_none() {
                return Err(SchemaError::row_invalid(
                    row,
                    ValidationDetails::extra_field(key),
                ));
            }
        }

        let primary = self.schema.primary_field();
        let mut scalars = HashMap::new();
        let mut vectors = HashMap::new();

        for field in self.schema.fields() {
            if field.is_primary && self.schema.auto_id() {
                if obj.contains_key(&field.name) {
                    return Err(SchemaError::row_rejected(
                        row,
                        format!(
                            "primary key '{}' is generated (auto_id) and must not be supplied",
                            field.name
                        ),
                    ));
                }
                continue;
            }

            let value = obj
                .get(&field.name)
                .ok_or_else(|| SchemaError::row_invalid(row, ValidationDetails::missing_field(&field.name)))?;

            if value.is_null() {
                return Err(SchemaError::row_invalid(
                    row,
                    ValidationDetails::null_value(&field.name),
                ));
            }

            if field.is_vector() {
                vectors.insert(field.name.clone(), convert_vector(row, field, value)?);
            } else {
                scalars.insert(field.name.clone(), convert_scalar(row, field, value)?);
            }
        }

        let primary_key = match (generated_pk, scalars.get(&primary.name)) {
            (Some(id), _) => {
                scalars.insert(primary.name.clone(), ScalarValue::Int(id));
                PrimaryKey::Int(id)
            }
            (None, Some(ScalarValue::Int(v))) => PrimaryKey::Int(*v),
            (None, Some(ScalarValue::String(v))) => PrimaryKey::VarChar(v.clone()),
            (None, _) => {
                return Err(SchemaError::row_invalid(
                    row,
                    ValidationDetails::missing_field(&primary.name),
                ))
            }
        };

        Ok(Entity::new(primary_key, scalars, vectors))
    }
}

fn convert_scalar(row: usize, field: &FieldDef, value: &Value) -> SchemaResult<ScalarValue> {
    let mismatch = || {
        SchemaError::row_invalid(
            row,
            ValidationDetails::new(&field.name, field.data_type.type_name(), json_type_name(value)),
        )
    };

    match field.data_type {
        DataType::Bool => value.as_bool().map(ScalarValue::Bool).ok_or_else(mismatch),
        DataType::VarChar => value
            .as_str()
            .map(|s| ScalarValue::String(s.to_string()))
            .ok_or_else(mismatch),
        DataType::Double => value.as_f64().map(ScalarValue::Float).ok_or_else(mismatch),
        DataType::Float => {
            let v = value.as_f64().ok_or_else(mismatch)?;
            let narrowed = DataType::Float.round_to_width(v);
            if v.is_finite() && narrowed.is_infinite() {
                return Err(SchemaError::row_invalid(
                    row,
                    ValidationDetails::new(
                        &field.name,
                        format!("Float in [{}, {}]", f32::MIN, f32::MAX),
                        v.to_string(),
                    ),
                ));
            }
            Ok(ScalarValue::Float(narrowed))
        }
        t => {
            let v = value.as_i64().ok_or_else(mismatch)?;
            if let Some((min, max)) = t.integer_range() {
                if v < min || v > max {
                    return Err(SchemaError::row_invalid(
                        row,
                        ValidationDetails::new(
                            &field.name,
                            format!("{} in [{}, {}]", t.type_name(), min, max),
                            v.to_string(),
                        ),
                    ));
                }
            }
            Ok(ScalarValue::Int(v))
        }
    }
}

fn convert_vector(row: usize, field: &FieldDef, value: &Value) -> SchemaResult<VectorValue> {
    let dim = field.dim.unwrap_or(0) as usize;
    let elements = value.as_array().ok_or_else(|| {
        SchemaError::row_invalid(
            row,
            ValidationDetails::new(&field.name, "array", json_type_name(value)),
        )
    })?;

    let expected_len = match field.data_type {
        DataType::BinaryVector => dim / 8,
        _ => dim,
    };
    if elements.len() != expected_len {
        return Err(SchemaError::row_invalid(
            row,
            ValidationDetails::new(
                &field.name,
                format!("{} elements", expected_len),
                format!("{} elements", elements.len()),
            ),
        ));
    }

    let element_error = |i: usize, expected: &str, actual: &Value| {
        SchemaError::row_invalid(
            row,
            ValidationDetails::new(
                format!("{}[{}]", field.name, i),
                expected,
                json_type_name(actual),
            ),
        )
    };

    match field.data_type {
        DataType::BinaryVector => elements
            .iter()
            .enumerate()
            .map(|(i, e)| {
                e.as_u64()
                    .filter(|b| *b <= u8::MAX as u64)
                    .map(|b| b as u8)
                    .ok_or_else(|| element_error(i, "byte", e))
            })
            .collect::<SchemaResult<Vec<u8>>>()
            .map(VectorValue::Binary),
        _ => elements
            .iter()
            .enumerate()
            .map(|(i, e)| {
                e.as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| element_error(i, "float", e))
            })
            .collect::<SchemaResult<Vec<f32>>>()
            .map(VectorValue::Float),
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
