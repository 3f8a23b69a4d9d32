//! Field values and stored entities

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// A scalar field value.
///
/// All integer widths are held as `i64` and both float widths as `f64`.
/// Row validation range-checks integer widths and rounds `Float` values to
/// `f32` precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl ScalarValue {
    /// Returns the numeric value widened to f64, if numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Int(v) => Some(*v as f64),
            ScalarValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Orders two values of compatible kinds.
    ///
    /// Integers compare exactly, mixed integer/float compare as f64,
    /// strings compare bytewise. Returns `None` for incompatible kinds or NaN.
    pub fn compare(&self, other: &ScalarValue) -> Option<Ordering> {
        match (self, other) {
            (ScalarValue::Int(a), ScalarValue::Int(b)) => Some(a.cmp(b)),
            (ScalarValue::Bool(a), ScalarValue::Bool(b)) => Some(a.cmp(b)),
            (ScalarValue::String(a), ScalarValue::String(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y),
                _ => None,
            },
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(v) => write!(f, "{}", v),
            ScalarValue::Int(v) => write!(f, "{}", v),
            ScalarValue::Float(v) => write!(f, "{}", v),
            ScalarValue::String(v) => write!(f, "{:?}", v),
        }
    }
}

/// A vector field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VectorValue {
    Float(Vec<f32>),
    Binary(Vec<u8>),
}

/// Any field value, as materialized into a result record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(ScalarValue),
    Vector(VectorValue),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            FieldValue::Scalar(v) => Some(v),
            FieldValue::Vector(_) => None,
        }
    }

    pub fn as_vector(&self) -> Option<&VectorValue> {
        match self {
            FieldValue::Vector(v) => Some(v),
            FieldValue::Scalar(_) => None,
        }
    }
}

/// Primary key value. Results are ordered by this type's `Ord`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimaryKey {
    Int(i64),
    VarChar(String),
}

impl PrimaryKey {
    pub fn to_scalar(&self) -> ScalarValue {
        match self {
            PrimaryKey::Int(v) => ScalarValue::Int(*v),
            PrimaryKey::VarChar(v) => ScalarValue::String(v.clone()),
        }
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimaryKey::Int(v) => write!(f, "{}", v),
            PrimaryKey::VarChar(v) => write!(f, "{:?}", v),
        }
    }
}

/// One committed row.
///
/// `scalars` holds every non-vector field including the primary key field.
/// Entities are immutable once committed and shared behind `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    primary_key: PrimaryKey,
    scalars: HashMap<String, ScalarValue>,
    vectors: HashMap<String, VectorValue>,
}

impl Entity {
    pub fn new(
        primary_key: PrimaryKey,
        scalars: HashMap<String, ScalarValue>,
        vectors: HashMap<String, VectorValue>,
    ) -> Self {
        Self {
            primary_key,
            scalars,
            vectors,
        }
    }

    pub fn primary_key(&self) -> &PrimaryKey {
        &self.primary_key
    }

    pub fn scalar(&self, field: &str) -> Option<&ScalarValue> {
        self.scalars.get(field)
    }

    pub fn vector(&self, field: &str) -> Option<&VectorValue> {
        self.vectors.get(field)
    }

    /// Returns a copy of the named field's value, scalar or vector
    pub fn field_value(&self, field: &str) -> Option<FieldValue> {
        self.scalars
            .get(field)
            .cloned()
            .map(FieldValue::Scalar)
            .or_else(|| self.vectors.get(field).cloned().map(FieldValue::Vector))
    }
}
