//! Observability subsystem for quarry
//!
//! Provides structured JSON logging, typed events and metrics counters.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on query results
//! 3. No background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use quarry::observability::{Event, Logger, MetricsRegistry};
//!
//! Logger::info(Event::QueryComplete, &[("records", "42")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_queries_executed();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
