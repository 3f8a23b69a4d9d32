//! Query executor subsystem for quarry
//!
//! Consumes plans and produces deterministic, primary-key-ordered records.
//!
//! # Execution Flow (strict order)
//!
//! 1. Route requested partitions to a [`LoadedPartitions`] token
//! 2. Scan every routed entity, flushed or growing
//! 3. Evaluate the bound filter per entity
//! 4. De-duplicate by primary key, first scanned wins
//! 5. Window by offset/limit
//! 6. Project to records
//!
//! # Invariants
//!
//! - Evaluation never reads vector fields
//! - A record never holds a field outside the resolved projection
//! - Pagination never reorders matches

mod errors;
mod executor;
mod filters;
mod pager;
mod projector;
mod result;
mod router;
mod scanner;

pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult};
pub use executor::QueryExecutor;
pub use filters::PredicateFilter;
pub use pager::Pagination;
pub use projector::{OutputField, Projection};
pub use result::{ExecutionResult, Record};
pub use router::{LoadedPartitions, PartitionRouter, PartitionStore};
pub use scanner::{ScanExecutor, ScanOutcome};
