//! Partition scan with primary-key de-duplication
//!
//! Scan order is the routed partition order, and within a partition the
//! store's order (sealed segments, then growing data). When several matching
//! entities share a primary key the first one scanned is kept. Which
//! physical duplicate that is depends on scan order and is not a stable
//! contract.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::planner::Filter;
use crate::schema::{Entity, PrimaryKey};

use super::filters::PredicateFilter;
use super::router::{LoadedPartitions, PartitionStore};

/// Matches keyed and ordered by primary key
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub matches: BTreeMap<PrimaryKey, Arc<Entity>>,
    pub scanned: usize,
}

pub struct ScanExecutor<'a, P: PartitionStore> {
    store: &'a P,
}

impl<'a, P: PartitionStore> ScanExecutor<'a, P> {
    pub fn new(store: &'a P) -> Self {
        Self { store }
    }

    pub fn scan(&self, partitions: &LoadedPartitions, filter: &Filter) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        for partition in partitions.names() {
            for entity in self.store.entities_of(partitions.collection(), partition) {
                outcome.scanned += 1;
                if outcome.matches.contains_key(entity.primary_key()) {
                    continue;
                }
                if PredicateFilter::matches(filter, &entity) {
                    outcome
                        .matches
                        .insert(entity.primary_key().clone(), entity);
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{bind, parse, SchemaRegistry};
    use crate::schema::{CollectionSchema, DataType, FieldDef, ScalarValue};
    use crate::executor::PartitionRouter;
    use std::collections::HashMap;

    struct MockStore {
        partitions: Vec<(String, Vec<Arc<Entity>>)>,
    }

    impl SchemaRegistry for MockStore {
        fn get_schema(&self, _collection: &str) -> Option<Arc<CollectionSchema>> {
            None
        }

        fn is_loaded(&self, _collection: &str, _partitions: &[String]) -> bool {
            true
        }
    }

    impl PartitionStore for MockStore {
        fn list_partitions(&self, _collection: &str) -> Vec<String> {
            self.partitions.iter().map(|(n, _)| n.clone()).collect()
        }

        fn entities_of(&self, _collection: &str, partition: &str) -> Vec<Arc<Entity>> {
            self.partitions
                .iter()
                .find(|(n, _)| n == partition)
                .map(|(_, e)| e.clone())
                .unwrap_or_default()
        }
    }

    fn entity(pk: i64, tag: &str) -> Arc<Entity> {
        let mut scalars = HashMap::new();
        scalars.insert("pk".to_string(), ScalarValue::Int(pk));
        scalars.insert("tag".to_string(), ScalarValue::String(tag.to_string()));
        Arc::new(Entity::new(PrimaryKey::Int(pk), scalars, HashMap::new()))
    }

    fn filter(expr: &str) -> Filter {
        let schema = CollectionSchema::new(
            vec![
                FieldDef::primary("pk", DataType::Int64),
                FieldDef::scalar("tag", DataType::VarChar),
            ],
            false,
        )
        .unwrap();
        Filter::Predicate(bind(&parse(expr).unwrap(), &schema).unwrap())
    }

    fn store() -> MockStore {
        MockStore {
            partitions: vec![
                (
                    "_default".to_string(),
                    vec![entity(3, "a"), entity(0, "first"), entity(0, "second")],
                ),
                ("p1".to_string(), vec![entity(0, "third"), entity(1, "b")]),
            ],
        }
    }

    fn scan(store: &MockStore, filter: &Filter) -> ScanOutcome {
        let routed = PartitionRouter::new(store).resolve("c", None).unwrap();
        ScanExecutor::new(store).scan(&routed, filter)
    }

    #[test]
    fn test_duplicates_collapse_first_wins() {
        let store = store();
        let outcome = scan(&store, &filter("pk in [0]"));
        assert_eq!(outcome.matches.len(), 1);
        let kept = &outcome.matches[&PrimaryKey::Int(0)];
        assert_eq!(kept.scalar("tag"), Some(&ScalarValue::String("first".into())));
        assert_eq!(outcome.scanned, 5);
    }

    #[test]
    fn test_later_duplicate_kept_when_earlier_fails_filter() {
        let store = store();
        let outcome = scan(&store, &filter("tag == \"third\""));
        assert_eq!(outcome.matches.len(), 1);
        assert!(outcome.matches.contains_key(&PrimaryKey::Int(0)));
    }

    #[test]
    fn test_ordered_by_primary_key() {
        let store = store();
        let outcome = scan(&store, &Filter::MatchAll);
        let keys: Vec<_> = outcome.matches.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![PrimaryKey::Int(0), PrimaryKey::Int(1), PrimaryKey::Int(3)]
        );
    }
}
