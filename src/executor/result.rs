//! Result types for query execution

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::schema::FieldValue;

/// One projected entity: field name to value, in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new(fields: Vec<(String, FieldValue)>) -> Self {
        Self { fields }
    }

    /// Value of the named field, if projected
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Projected field names in order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Result of query execution
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    /// Records ascending by primary key
    pub records: Vec<Record>,
    /// Number of entities the filter was applied to
    pub scanned_count: usize,
    /// Number of distinct primary keys that matched, before paging
    pub matched_count: usize,
}

impl ExecutionResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
