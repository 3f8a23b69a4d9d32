//! Output-field projection
//!
//! Requested tokens are classified once into [`OutputField`] and resolved
//! into a concrete field list in schema declaration order. The primary key
//! is always part of the projection.

use std::collections::HashSet;

use crate::schema::{CollectionSchema, Entity};

use super::errors::{ExecutorError, ExecutorResult};
use super::result::Record;

/// One requested output-field token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputField {
    Explicit(String),
    /// `*`
    AllScalars,
    /// `%`
    AllVectors,
}

impl OutputField {
    /// Only the exact tokens `*` and `%` are wildcards; `**` or `*%` are
    /// field names like any other.
    pub fn parse(token: &str) -> Self {
        match token {
            "*" => OutputField::AllScalars,
            "%" => OutputField::AllVectors,
            name => OutputField::Explicit(name.to_string()),
        }
    }
}

/// Resolved projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<String>,
}

impl Projection {
    /// Resolves requested tokens against `schema`.
    ///
    /// `None` and an empty list both project the primary key only.
    pub fn resolve(
        schema: &CollectionSchema,
        output_fields: Option<&[String]>,
    ) -> ExecutorResult<Self> {
        let mut selected: HashSet<&str> = HashSet::new();
        selected.insert(schema.primary_field().name.as_str());

        for token in output_fields.unwrap_or_default() {
            match OutputField::parse(token) {
                OutputField::AllScalars => {
                    selected.extend(schema.scalar_fields().map(|f| f.name.as_str()))
                }
                OutputField::AllVectors => {
                    selected.extend(schema.vector_fields().map(|f| f.name.as_str()))
                }
                OutputField::Explicit(name) => {
                    let field = schema
                        .field(&name)
                        .ok_or_else(|| ExecutorError::field_not_found(&name))?;
                    selected.insert(field.name.as_str());
                }
            }
        }

        let fields = schema
            .fields()
            .iter()
            .filter(|f| selected.contains(f.name.as_str()))
            .map(|f| f.name.clone())
            .collect();

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Materializes one record
    pub fn project(&self, entity: &Entity) -> Record {
        Record::new(
            self.fields
                .iter()
                .filter_map(|name| entity.field_value(name).map(|v| (name.clone(), v)))
                .collect(),
        )
    }
}
