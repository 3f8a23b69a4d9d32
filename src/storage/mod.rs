//! In-memory entity storage for quarry
//!
//! Holds collections, their partitions and the entities inserted into
//! them. The query engine consumes storage only through the
//! [`SchemaRegistry`](crate::planner::SchemaRegistry) and
//! [`PartitionStore`](crate::executor::PartitionStore) traits.
//!
//! # Design Principles
//!
//! - Entities are immutable once inserted and shared behind `Arc`
//! - Acknowledged inserts are immediately visible, flushed or not
//! - Scan order is partition creation order, sealed before growing
//! - Loaded state is explicit per partition

mod catalog;
mod collection;
mod errors;
mod partition;

pub use catalog::Catalog;
pub use collection::{Collection, InsertAck};
pub use errors::{StorageError, StorageErrorCode, StorageResult};
pub use partition::{Partition, SealedSegment};
