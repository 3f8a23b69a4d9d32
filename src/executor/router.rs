//! Partition routing
//!
//! Resolves the partitions a query reads. The result is a
//! [`LoadedPartitions`] token: the only way to obtain one is through
//! [`PartitionRouter::resolve`], so holding one means every partition in it
//! existed and was loaded when the query was routed.

use std::collections::HashSet;
use std::sync::Arc;

use crate::planner::SchemaRegistry;
use crate::schema::Entity;

use super::errors::{ExecutorError, ExecutorResult};

/// Partition store consumed by the executor (read-only)
pub trait PartitionStore {
    /// Partition names of `collection`, in creation order
    fn list_partitions(&self, collection: &str) -> Vec<String>;

    /// Every acknowledged entity of one partition, flushed or growing,
    /// in scan order
    fn entities_of(&self, collection: &str, partition: &str) -> Vec<Arc<Entity>>;
}

/// Partitions a query may scan, in partition creation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPartitions {
    collection: String,
    names: Vec<String>,
}

impl LoadedPartitions {
    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

pub struct PartitionRouter<'a, S: SchemaRegistry + PartitionStore> {
    store: &'a S,
}

impl<'a, S: SchemaRegistry + PartitionStore> PartitionRouter<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Resolves requested partition names.
    ///
    /// `None` or an empty list selects every loaded partition. Any unknown
    /// name fails the whole request before load state is checked.
    pub fn resolve(
        &self,
        collection: &str,
        partition_names: Option<&[String]>,
    ) -> ExecutorResult<LoadedPartitions> {
        let existing = self.store.list_partitions(collection);

        let names = match partition_names {
            None | Some([]) => {
                let loaded: Vec<String> = existing
                    .into_iter()
                    .filter(|name| {
                        self.store
                            .is_loaded(collection, std::slice::from_ref(name))
                    })
                    .collect();
                if loaded.is_empty() {
                    return Err(ExecutorError::collection_not_loaded(collection));
                }
                loaded
            }
            Some(requested) => {
                if let Some(missing) = requested.iter().find(|name| !existing.contains(name)) {
                    return Err(ExecutorError::partition_not_found(missing));
                }
                if !self.store.is_loaded(collection, requested) {
                    return Err(ExecutorError::collection_not_loaded(collection));
                }
                let wanted: HashSet<&str> = requested.iter().map(String::as_str).collect();
                existing
                    .into_iter()
                    .filter(|name| wanted.contains(name.as_str()))
                    .collect()
            }
        };

        Ok(LoadedPartitions {
            collection: collection.to_string(),
            names,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecutorErrorCode;
    use crate::schema::CollectionSchema;

    struct MockStore {
        partitions: Vec<(&'static str, bool)>,
    }

    impl SchemaRegistry for MockStore {
        fn get_schema(&self, _collection: &str) -> Option<Arc<CollectionSchema>> {
            None
        }

        fn is_loaded(&self, _collection: &str, partitions: &[String]) -> bool {
            partitions.iter().all(|name| {
                self.partitions
                    .iter()
                    .any(|(n, loaded)| *n == name.as_str() && *loaded)
            })
        }
    }

    impl PartitionStore for MockStore {
        fn list_partitions(&self, _collection: &str) -> Vec<String> {
            self.partitions.iter().map(|(n, _)| n.to_string()).collect()
        }

        fn entities_of(&self, _collection: &str, _partition: &str) -> Vec<Arc<Entity>> {
            Vec::new()
        }
    }

    fn store() -> MockStore {
        MockStore {
            partitions: vec![("_default", true), ("p1", false), ("p2", true)],
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_omitted_selects_loaded() {
        let store = store();
        let routed = PartitionRouter::new(&store).resolve("c", None).unwrap();
        assert_eq!(routed.names(), &names(&["_default", "p2"])[..]);
        assert_eq!(routed.collection(), "c");
    }

    #[test]
    fn test_named_keeps_creation_order() {
        let store = store();
        let requested = names(&["p2", "_default", "p2"]);
        let routed = PartitionRouter::new(&store)
            .resolve("c", Some(requested.as_slice()))
            .unwrap();
        assert_eq!(routed.names(), &names(&["_default", "p2"])[..]);
    }

    #[test]
    fn test_unknown_partition_fails_whole_request() {
        let store = store();
        let requested = names(&["_default", "p9"]);
        let err = PartitionRouter::new(&store)
            .resolve("c", Some(requested.as_slice()))
            .unwrap_err();
        assert_eq!(err.code(), ExecutorErrorCode::PartitionNotFound);
        assert!(err.message().contains("p9"));
    }

    #[test]
    fn test_unloaded_partition() {
        let store = store();
        let requested = names(&["p1"]);
        let err = PartitionRouter::new(&store)
            .resolve("c", Some(requested.as_slice()))
            .unwrap_err();
        assert_eq!(err.code(), ExecutorErrorCode::CollectionNotLoaded);
    }

    #[test]
    fn test_nothing_loaded() {
        let store = MockStore {
            partitions: vec![("_default", false)],
        };
        let err = PartitionRouter::new(&store).resolve("c", None).unwrap_err();
        assert_eq!(err.code(), ExecutorErrorCode::CollectionNotLoaded);
    }
}
