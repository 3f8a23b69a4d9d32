//! In-memory catalog of collections
//!
//! Serves as both the schema registry and the partition store consumed by
//! the query engine.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use super::collection::{Collection, InsertAck};
use super::errors::{StorageError, StorageResult};
use crate::config::EngineConfig;
use crate::executor::PartitionStore;
use crate::observability::{Event, Logger, MetricsRegistry};
use crate::planner::SchemaRegistry;
use crate::schema::{CollectionSchema, Entity};

#[derive(Debug)]
pub struct Catalog {
    collections: RwLock<HashMap<String, Arc<Collection>>>,
    default_partition: String,
    metrics: Arc<MetricsRegistry>,
}

impl Catalog {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_metrics(config, Arc::new(MetricsRegistry::new()))
    }

    /// Creates a catalog that records inserts into a shared registry
    pub fn with_metrics(config: &EngineConfig, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            default_partition: config.default_partition.clone(),
            metrics,
        }
    }

    pub fn metrics(&self) -> Arc<MetricsRegistry> {
        Arc::clone(&self.metrics)
    }

    pub fn create_collection(
        &self,
        name: &str,
        schema: CollectionSchema,
    ) -> StorageResult<Arc<Collection>> {
        let mut collections = self.collections.write().unwrap_or_else(|e| e.into_inner());
        if collections.contains_key(name) {
            return Err(StorageError::collection_exists(name));
        }

        let collection = Arc::new(Collection::new(name, schema, self.default_partition.clone()));
        collections.insert(name.to_string(), Arc::clone(&collection));
        Ok(collection)
    }

    pub fn collection(&self, name: &str) -> StorageResult<Arc<Collection>> {
        self.collections
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::collection_not_found(name))
    }

    /// Collection names, sorted
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .collections
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn create_partition(&self, collection: &str, partition: &str) -> StorageResult<()> {
        self.collection(collection)?.create_partition(partition)
    }

    pub fn insert(
        &self,
        collection: &str,
        partition: Option<&str>,
        rows: &[Value],
    ) -> StorageResult<InsertAck> {
        let ack = self.collection(collection)?.insert(partition, rows)?;
        self.metrics.add_entities_inserted(ack.insert_count() as u64);

        let count = ack.insert_count().to_string();
        Logger::event(
            Event::EntitiesInserted,
            &[
                ("collection", collection),
                ("count", count.as_str()),
                ("partition", ack.partition.as_str()),
            ],
        );
        Ok(ack)
    }

    pub fn flush(&self, collection: &str) -> StorageResult<usize> {
        let sealed = self.collection(collection)?.flush();
        let count = sealed.to_string();
        Logger::event(
            Event::SegmentFlushed,
            &[("collection", collection), ("count", count.as_str())],
        );
        Ok(sealed)
    }

    /// Loads the whole collection, or only the named partitions
    pub fn load(&self, collection: &str, partitions: Option<&[String]>) -> StorageResult<()> {
        let target = self.collection(collection)?;
        match partitions {
            Some(names) => target.load_partitions(names)?,
            None => target.load(),
        }

        let loaded = partitions
            .map(|names| names.join(","))
            .unwrap_or_else(|| "*".to_string());
        Logger::event(
            Event::CollectionLoaded,
            &[("collection", collection), ("partitions", loaded.as_str())],
        );
        Ok(())
    }

    pub fn release(&self, collection: &str) -> StorageResult<()> {
        self.collection(collection)?.release();
        Logger::event(Event::CollectionReleased, &[("collection", collection)]);
        Ok(())
    }
}

impl SchemaRegistry for Catalog {
    fn get_schema(&self, collection: &str) -> Option<Arc<CollectionSchema>> {
        self.collection(collection).ok().map(|c| c.schema())
    }

    fn is_loaded(&self, collection: &str, partitions: &[String]) -> bool {
        self.collection(collection)
            .map(|c| c.is_loaded(partitions))
            .unwrap_or(false)
    }
}

impl PartitionStore for Catalog {
    fn list_partitions(&self, collection: &str) -> Vec<String> {
        self.collection(collection)
            .map(|c| c.partition_names())
            .unwrap_or_default()
    }

    fn entities_of(&self, collection: &str, partition: &str) -> Vec<Arc<Entity>> {
        self.collection(collection)
            .ok()
            .and_then(|c| c.partition(partition))
            .map(|p| p.entities())
            .unwrap_or_default()
    }
}
