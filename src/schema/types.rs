//! Schema type definitions
//!
//! Supported scalar types:
//! - bool
//! - int8, int16, int32, int64
//! - float, double
//! - varchar: UTF-8 string
//!
//! Supported vector types:
//! - float_vector: `dim` f32 elements
//! - binary_vector: `dim` bits packed into `dim / 8` bytes

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};

/// Field data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    #[serde(alias = "string")]
    VarChar,
    FloatVector,
    BinaryVector,
}

impl DataType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::Bool => "Bool",
            DataType::Int8 => "Int8",
            DataType::Int16 => "Int16",
            DataType::Int32 => "Int32",
            DataType::Int64 => "Int64",
            DataType::Float => "Float",
            DataType::Double => "Double",
            DataType::VarChar => "VarChar",
            DataType::FloatVector => "FloatVector",
            DataType::BinaryVector => "BinaryVector",
        }
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, DataType::FloatVector | DataType::BinaryVector)
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, DataType::Float | DataType::Double)
    }

    /// Rounds a floating value to the field's storage width
    pub fn round_to_width(&self, value: f64) -> f64 {
        match self {
            DataType::Float => value as f32 as f64,
            _ => value,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_floating()
    }

    pub fn is_string(&self) -> bool {
        matches!(self, DataType::VarChar)
    }

    /// Inclusive value range for integer types
    pub fn integer_range(&self) -> Option<(i64, i64)> {
        match self {
            DataType::Int8 => Some((i8::MIN as i64, i8::MAX as i64)),
            DataType::Int16 => Some((i16::MIN as i64, i16::MAX as i64)),
            DataType::Int32 => Some((i32::MIN as i64, i32::MAX as i64)),
            DataType::Int64 => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// A single field of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name, unique within the collection
    pub name: String,
    /// Field data type
    #[serde(rename = "type")]
    pub data_type: DataType,
    /// Whether this is the primary key field
    #[serde(default)]
    pub is_primary: bool,
    /// Vector dimension (vector fields only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dim: Option<u32>,
}

impl FieldDef {
    /// Create a scalar field
    pub fn scalar(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_primary: false,
            dim: None,
        }
    }

    /// Create a primary key field
    pub fn primary(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            is_primary: true,
            ..Self::scalar(name, data_type)
        }
    }

    /// Create a float vector field
    pub fn float_vector(name: impl Into<String>, dim: u32) -> Self {
        Self {
            name: name.into(),
            data_type: DataType::FloatVector,
            is_primary: false,
            dim: Some(dim),
        }
    }

    /// Create a binary vector field
    pub fn binary_vector(name: impl Into<String>, dim: u32) -> Self {
        Self {
            name: name.into(),
            data_type: DataType::BinaryVector,
            is_primary: false,
            dim: Some(dim),
        }
    }

    pub fn is_vector(&self) -> bool {
        self.data_type.is_vector()
    }
}

/// Collection schema: an ordered list of fields with exactly one primary key.
///
/// Immutable once constructed. Field order is the declaration order and is
/// the order used for projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSchema {
    fields: Vec<FieldDef>,
    auto_id: bool,
    primary_index: usize,
}

#[derive(Deserialize)]
struct RawCollectionSchema {
    fields: Vec<FieldDef>,
    #[serde(default)]
    auto_id: bool,
}

impl<'de> Deserialize<'de> for CollectionSchema {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawCollectionSchema::deserialize(deserializer)?;
        CollectionSchema::new(raw.fields, raw.auto_id).map_err(serde::de::Error::custom)
    }
}

impl CollectionSchema {
    /// Builds a schema, validating its structure.
    pub fn new(fields: Vec<FieldDef>, auto_id: bool) -> SchemaResult<Self> {
        if fields.is_empty() {
            return Err(SchemaError::invalid("schema must declare at least one field"));
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if field.name.is_empty() {
                return Err(SchemaError::invalid("field name must not be empty"));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::invalid(format!(
                    "duplicate field name '{}'",
                    field.name
                )));
            }
            Self::validate_field(field)?;
        }

        let primaries: Vec<usize> = fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_primary)
            .map(|(i, _)| i)
            .collect();

        let primary_index = match primaries.as_slice() {
            [index] => *index,
            [] => return Err(SchemaError::invalid("schema must declare a primary key field")),
            _ => {
                return Err(SchemaError::invalid(
                    "schema must declare exactly one primary key field",
                ))
            }
        };

        let primary = &fields[primary_index];
        if !matches!(primary.data_type, DataType::Int64 | DataType::VarChar) {
            return Err(SchemaError::invalid(format!(
                "primary key field '{}' must be Int64 or VarChar, got {}",
                primary.name, primary.data_type
            )));
        }
        if auto_id && primary.data_type != DataType::Int64 {
            return Err(SchemaError::invalid(format!(
                "auto_id requires an Int64 primary key, '{}' is {}",
                primary.name, primary.data_type
            )));
        }

        Ok(Self {
            fields,
            auto_id,
            primary_index,
        })
    }

    fn validate_field(field: &FieldDef) -> SchemaResult<()> {
        match (field.data_type, field.dim) {
            (DataType::FloatVector, Some(dim)) if dim > 0 => Ok(()),
            (DataType::BinaryVector, Some(dim)) if dim > 0 && dim % 8 == 0 => Ok(()),
            (DataType::BinaryVector, Some(dim)) => Err(SchemaError::invalid(format!(
                "binary vector field '{}' dim must be a positive multiple of 8, got {}",
                field.name, dim
            ))),
            (t, dim) if t.is_vector() => Err(SchemaError::invalid(format!(
                "vector field '{}' requires a positive dim, got {:?}",
                field.name, dim
            ))),
            (_, Some(_)) => Err(SchemaError::invalid(format!(
                "scalar field '{}' must not declare dim",
                field.name
            ))),
            (_, None) => Ok(()),
        }
    }

    /// All fields in declaration order
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The primary key field
    pub fn primary_field(&self) -> &FieldDef {
        &self.fields[self.primary_index]
    }

    /// Whether primary key values are generated on insert
    pub fn auto_id(&self) -> bool {
        self.auto_id
    }

    /// Non-vector fields in declaration order (includes the primary key)
    pub fn scalar_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| !f.is_vector())
    }

    /// Vector fields in declaration order
    pub fn vector_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.is_vector())
    }
}
