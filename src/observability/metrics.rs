//! Metrics registry for quarry
//!
//! - Counters only, monotonic
//! - Reset only when the registry is created
//! - Thread-safe without locks

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for one query engine.
///
/// Relaxed ordering is used throughout; counters are not used to
/// synchronize anything.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Queries that returned records
    queries_executed: AtomicU64,
    /// Queries that returned an error
    queries_rejected: AtomicU64,
    /// Entities visited by scans (before predicate evaluation)
    entities_scanned: AtomicU64,
    /// Records returned after pagination
    records_returned: AtomicU64,
    /// Entities acknowledged by insert
    entities_inserted: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_entities_scanned(&self, count: u64) {
        self.entities_scanned.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_records_returned(&self, count: u64) {
        self.records_returned.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_entities_inserted(&self, count: u64) {
        self.entities_inserted.fetch_add(count, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            entities_scanned: self.entities_scanned.load(Ordering::Relaxed),
            records_returned: self.records_returned.load(Ordering::Relaxed),
            entities_inserted: self.entities_inserted.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub queries_executed: u64,
    pub queries_rejected: u64,
    pub entities_scanned: u64,
    pub records_returned: u64,
    pub entities_inserted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        assert_eq!(MetricsRegistry::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_counters() {
        let registry = MetricsRegistry::new();
        registry.increment_queries_executed();
        registry.increment_queries_rejected();
        registry.increment_queries_rejected();
        registry.add_entities_scanned(10);
        registry.add_records_returned(4);
        registry.add_entities_inserted(3);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.queries_executed, 1);
        assert_eq!(snapshot.queries_rejected, 2);
        assert_eq!(snapshot.entities_scanned, 10);
        assert_eq!(snapshot.records_returned, 4);
        assert_eq!(snapshot.entities_inserted, 3);
    }

    #[test]
    fn test_snapshot_serializes() {
        let registry = MetricsRegistry::new();
        registry.add_records_returned(7);

        let json = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(json["records_returned"], 7);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..100 {
                        reg.increment_queries_executed();
                        reg.add_entities_scanned(2);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.queries_executed, 800);
        assert_eq!(snapshot.entities_scanned, 1600);
    }
}
