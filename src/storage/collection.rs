//! Collection: a schema plus its partitions

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

use super::errors::{StorageError, StorageResult};
use super::partition::Partition;
use crate::schema::{CollectionSchema, PrimaryKey, RowValidator};

/// Acknowledgment of an insert batch.
///
/// Once returned, every entity of the batch is visible to queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertAck {
    pub partition: String,
    pub primary_keys: Vec<PrimaryKey>,
}

impl InsertAck {
    pub fn insert_count(&self) -> usize {
        self.primary_keys.len()
    }
}

/// Low bits of a generated key left free below the millisecond timestamp
const AUTO_ID_SEQUENCE_BITS: u32 = 18;

/// First generated key: creation time in milliseconds, shifted past the
/// sequence bits.
fn auto_id_base() -> i64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);
    millis.max(1) << AUTO_ID_SEQUENCE_BITS
}

#[derive(Debug)]
pub struct Collection {
    name: String,
    schema: Arc<CollectionSchema>,
    default_partition: String,
    /// Creation order is scan order
    partitions: RwLock<Vec<Arc<Partition>>>,
    next_auto_id: AtomicI64,
}

impl Collection {
    /// Creates a collection holding only its default partition
    pub fn new(
        name: impl Into<String>,
        schema: CollectionSchema,
        default_partition: impl Into<String>,
    ) -> Self {
        let default_partition = default_partition.into();
        Self {
            name: name.into(),
            schema: Arc::new(schema),
            partitions: RwLock::new(vec![Arc::new(Partition::new(default_partition.clone()))]),
            default_partition,
            next_auto_id: AtomicI64::new(auto_id_base()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Arc<CollectionSchema> {
        Arc::clone(&self.schema)
    }

    pub fn default_partition(&self) -> &str {
        &self.default_partition
    }

    pub fn create_partition(&self, name: &str) -> StorageResult<()> {
        let mut partitions = self.partitions.write().unwrap_or_else(|e| e.into_inner());
        if partitions.iter().any(|p| p.name() == name) {
            return Err(StorageError::partition_exists(&self.name, name));
        }
        partitions.push(Arc::new(Partition::new(name)));
        Ok(())
    }

    pub fn has_partition(&self, name: &str) -> bool {
        self.partitions().iter().any(|p| p.name() == name)
    }

    /// Partition names in creation order
    pub fn partition_names(&self) -> Vec<String> {
        self.partitions()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    pub fn partition(&self, name: &str) -> Option<Arc<Partition>> {
        self.partitions().iter().find(|p| p.name() == name).cloned()
    }

    /// Validates and inserts a batch of JSON rows.
    ///
    /// The batch is all-or-nothing: if any row fails validation nothing is
    /// inserted. Generated primary keys are strictly increasing; ids reserved
    /// by a rejected batch are skipped.
    pub fn insert(&self, partition: Option<&str>, rows: &[Value]) -> StorageResult<InsertAck> {
        let partition_name = partition.unwrap_or(&self.default_partition);
        let target = self
            .partition(partition_name)
            .ok_or_else(|| StorageError::partition_not_found(partition_name))?;

        let first_id = if self.schema.auto_id() {
            Some(
                self.next_auto_id
                    .fetch_add(rows.len() as i64, Ordering::Relaxed),
            )
        } else {
            None
        };

        let validator = RowValidator::new(&self.schema);
        let entities = rows
            .iter()
            .enumerate()
            .map(|(i, row)| validator.validate_row(i, row, first_id.map(|id| id + i as i64)))
            .collect::<Result<Vec<_>, _>>()?;

        let primary_keys = entities.iter().map(|e| e.primary_key().clone()).collect();
        target.append(entities);

        Ok(InsertAck {
            partition: partition_name.to_string(),
            primary_keys,
        })
    }

    /// Seals growing data in every partition; returns entities sealed
    pub fn flush(&self) -> usize {
        self.partitions().iter().map(|p| p.flush()).sum()
    }

    /// Loads every partition into the serving path
    pub fn load(&self) {
        for partition in self.partitions().iter() {
            partition.set_loaded(true);
        }
    }

    /// Loads the named partitions. Fails without loading anything if any
    /// name is unknown.
    pub fn load_partitions(&self, names: &[String]) -> StorageResult<()> {
        let targets = self.resolve(names)?;
        for partition in targets {
            partition.set_loaded(true);
        }
        Ok(())
    }

    /// Releases every partition from the serving path
    pub fn release(&self) {
        for partition in self.partitions().iter() {
            partition.set_loaded(false);
        }
    }

    pub fn release_partitions(&self, names: &[String]) -> StorageResult<()> {
        let targets = self.resolve(names)?;
        for partition in targets {
            partition.set_loaded(false);
        }
        Ok(())
    }

    /// With no names: whether any partition is loaded.
    /// Otherwise: whether every named partition exists and is loaded.
    pub fn is_loaded(&self, names: &[String]) -> bool {
        let partitions = self.partitions();
        if names.is_empty() {
            return partitions.iter().any(|p| p.is_loaded());
        }
        names.iter().all(|name| {
            partitions
                .iter()
                .any(|p| p.name() == name && p.is_loaded())
        })
    }

    /// Physical entity count across partitions, duplicates included
    pub fn num_entities(&self) -> usize {
        self.partitions().iter().map(|p| p.num_entities()).sum()
    }

    fn resolve(&self, names: &[String]) -> StorageResult<Vec<Arc<Partition>>> {
        names
            .iter()
            .map(|name| {
                self.partition(name)
                    .ok_or_else(|| StorageError::partition_not_found(name))
            })
            .collect()
    }

    fn partitions(&self) -> RwLockReadGuard<'_, Vec<Arc<Partition>>> {
        self.partitions.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DataType, FieldDef};
    use crate::storage::StorageErrorCode;
    use serde_json::json;

    fn collection(auto_id: bool) -> Collection {
        let schema = CollectionSchema::new(
            vec![
                FieldDef::primary("int64", DataType::Int64),
                FieldDef::scalar("varchar", DataType::VarChar),
            ],
            auto_id,
        )
        .unwrap();
        Collection::new("c", schema, "_default")
    }

    #[test]
    fn test_default_partition_exists() {
        let c = collection(false);
        assert_eq!(c.partition_names(), vec!["_default".to_string()]);
        assert!(c.has_partition("_default"));
    }

    #[test]
    fn test_create_partition_twice_fails() {
        let c = collection(false);
        c.create_partition("p1").unwrap();
        let err = c.create_partition("p1").unwrap_err();
        assert_eq!(err.code(), StorageErrorCode::PartitionExists);
        assert_eq!(c.partition_names(), vec!["_default", "p1"]);
    }

    #[test]
    fn test_insert_into_named_partition() {
        let c = collection(false);
        c.create_partition("p1").unwrap();
        let ack = c
            .insert(Some("p1"), &[json!({"int64": 1, "varchar": "a"})])
            .unwrap();

        assert_eq!(ack.partition, "p1");
        assert_eq!(ack.insert_count(), 1);
        assert_eq!(c.partition("p1").unwrap().num_entities(), 1);
        assert_eq!(c.partition("_default").unwrap().num_entities(), 0);
    }

    #[test]
    fn test_insert_unknown_partition() {
        let c = collection(false);
        let err = c
            .insert(Some("nope"), &[json!({"int64": 1, "varchar": "a"})])
            .unwrap_err();
        assert_eq!(err.code(), StorageErrorCode::PartitionNotFound);
    }

    #[test]
    fn test_insert_batch_is_all_or_nothing() {
        let c = collection(false);
        let rows = [
            json!({"int64": 1, "varchar": "a"}),
            json!({"int64": 2, "varchar": 5}),
        ];
        let err = c.insert(None, &rows).unwrap_err();
        assert_eq!(err.code(), StorageErrorCode::RowRejected);
        assert_eq!(c.num_entities(), 0);
    }

    #[test]
    fn test_auto_id_monotonic() {
        let c = collection(true);
        let first = c
            .insert(None, &[json!({"varchar": "a"}), json!({"varchar": "b"})])
            .unwrap();
        let second = c.insert(None, &[json!({"varchar": "c"})]).unwrap();

        let all: Vec<_> = first
            .primary_keys
            .iter()
            .chain(second.primary_keys.iter())
            .cloned()
            .collect();
        let mut sorted = all.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(all, sorted);
    }

    #[test]
    fn test_auto_id_starts_above_small_keys() {
        let c = collection(true);
        let ack = c.insert(None, &[json!({"varchar": "a"})]).unwrap();
        match &ack.primary_keys[0] {
            PrimaryKey::Int(v) => assert!(*v >= 1 << AUTO_ID_SEQUENCE_BITS, "{}", v),
            other => panic!("unexpected key {:?}", other),
        }
    }

    #[test]
    fn test_load_and_release() {
        let c = collection(false);
        c.create_partition("p1").unwrap();
        assert!(!c.is_loaded(&[]));

        c.load_partitions(&["p1".to_string()]).unwrap();
        assert!(c.is_loaded(&[]));
        assert!(c.is_loaded(&["p1".to_string()]));
        assert!(!c.is_loaded(&["_default".to_string()]));

        c.release();
        assert!(!c.is_loaded(&[]));

        c.load();
        assert!(c.is_loaded(&["_default".to_string(), "p1".to_string()]));
    }

    #[test]
    fn test_load_partitions_checks_all_names_first() {
        let c = collection(false);
        let err = c
            .load_partitions(&["_default".to_string(), "missing".to_string()])
            .unwrap_err();
        assert_eq!(err.code(), StorageErrorCode::PartitionNotFound);
        assert!(!c.is_loaded(&[]));
    }

    #[test]
    fn test_flush_and_num_entities() {
        let c = collection(false);
        c.insert(None, &[json!({"int64": 0, "varchar": "a"})]).unwrap();
        c.insert(None, &[json!({"int64": 0, "varchar": "b"})]).unwrap();

        assert_eq!(c.flush(), 2);
        assert_eq!(c.num_entities(), 2);
        assert_eq!(c.flush(), 0);
    }
}
