//! quarry - filtered entity retrieval over an in-memory collection store
//!
//! A query names a collection, a boolean filter expression over scalar
//! fields, optional partitions, output fields and an offset/limit window.
//! Expressions are parsed and type-checked against the collection schema,
//! then evaluated over loaded partitions; results come back de-duplicated
//! and ordered by primary key.

pub mod api;
pub mod cli;
pub mod config;
pub mod executor;
pub mod observability;
pub mod planner;
pub mod schema;
pub mod storage;
