//! Collection schemas, values and row validation for quarry
//!
//! A schema is an ordered list of fields with exactly one primary key.
//! Rows are validated against it once, at insert time; everything
//! downstream works on typed [`Entity`] values.
//!
//! # Design Principles
//!
//! - Schemas are immutable once a collection is created
//! - No nulls, defaults, or coercion on insert
//! - Integer widths are range-checked, vector lengths match `dim`
//! - Deterministic validation

mod errors;
mod types;
mod validator;
mod value;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, ValidationDetails};
pub use types::{CollectionSchema, DataType, FieldDef};
pub use validator::RowValidator;
pub use value::{Entity, FieldValue, PrimaryKey, ScalarValue, VectorValue};
