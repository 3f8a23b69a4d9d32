//! Partition: a named container of entities
//!
//! Entities land in the growing buffer on insert and are moved into an
//! immutable sealed segment on flush. Both are visible to scans; an
//! acknowledged insert never waits for a flush to become queryable.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::schema::Entity;

/// An immutable batch of flushed entities
#[derive(Debug)]
pub struct SealedSegment {
    id: u64,
    entities: Vec<Arc<Entity>>,
}

impl SealedSegment {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[derive(Debug, Default)]
struct Segments {
    sealed: Vec<SealedSegment>,
    growing: Vec<Arc<Entity>>,
    next_segment_id: u64,
}

#[derive(Debug)]
pub struct Partition {
    name: String,
    loaded: AtomicBool,
    segments: RwLock<Segments>,
}

impl Partition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            loaded: AtomicBool::new(false),
            segments: RwLock::new(Segments::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the partition is in the serving path
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    pub fn set_loaded(&self, loaded: bool) {
        self.loaded.store(loaded, Ordering::Release);
    }

    /// Appends a validated batch to the growing buffer.
    ///
    /// The whole batch becomes visible at once.
    pub fn append(&self, entities: Vec<Entity>) {
        let mut segments = self.write();
        segments.growing.extend(entities.into_iter().map(Arc::new));
    }

    /// Seals the growing buffer into a new segment.
    ///
    /// Returns the number of entities sealed; zero when nothing was growing.
    pub fn flush(&self) -> usize {
        let mut segments = self.write();
        if segments.growing.is_empty() {
            return 0;
        }

        let entities = std::mem::take(&mut segments.growing);
        let count = entities.len();
        let id = segments.next_segment_id;
        segments.next_segment_id += 1;
        segments.sealed.push(SealedSegment { id, entities });
        count
    }

    /// Snapshot of every entity in scan order: sealed segments first, in
    /// flush order, then growing data in insertion order.
    pub fn entities(&self) -> Vec<Arc<Entity>> {
        let segments = self.read();
        segments
            .sealed
            .iter()
            .flat_map(|s| s.entities.iter())
            .chain(segments.growing.iter())
            .cloned()
            .collect()
    }

    /// Physical entity count, duplicates included
    pub fn num_entities(&self) -> usize {
        let segments = self.read();
        segments.sealed.iter().map(SealedSegment::len).sum::<usize>() + segments.growing.len()
    }

    pub fn sealed_segment_count(&self) -> usize {
        self.read().sealed.len()
    }

    pub fn growing_count(&self) -> usize {
        self.read().growing.len()
    }

    // Entities are immutable once appended, so a poisoned lock still guards
    // consistent data.
    fn read(&self) -> RwLockReadGuard<'_, Segments> {
        self.segments.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Segments> {
        self.segments.write().unwrap_or_else(|e| e.into_inner())
    }
}
