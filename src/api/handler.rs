//! Query engine for quarry
//!
//! Orchestrates planner and executor against a store.
//!
//! Request handling flow (strict order):
//! 1. Validate offset/limit ranges
//! 2. Parse and bind the filter expression
//! 3. Resolve the output-field projection
//! 4. Route partitions
//! 5. Scan, de-duplicate, page and project
//!
//! Any failure aborts the whole request; no partial records are returned.

use std::sync::Arc;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::executor::{
    ExecutionResult, Pagination, PartitionRouter, PartitionStore, Projection, QueryExecutor,
    Record,
};
use crate::observability::{Event, Logger, MetricsRegistry, MetricsSnapshot};
use crate::planner::{QueryPlanner, SchemaRegistry};

use super::errors::{ApiError, QueryError, QueryResult};
use super::request::QueryRequest;
use super::response::Response;

/// Query surface over a store.
///
/// Holds no mutable state besides metrics counters; one engine may serve
/// many threads at once.
pub struct QueryEngine<'a, S: SchemaRegistry + PartitionStore> {
    store: &'a S,
    config: EngineConfig,
    metrics: Arc<MetricsRegistry>,
}

impl<'a, S: SchemaRegistry + PartitionStore> QueryEngine<'a, S> {
    pub fn new(store: &'a S, config: EngineConfig) -> Self {
        Self::with_metrics(store, config, Arc::new(MetricsRegistry::new()))
    }

    /// Creates an engine that records into a shared registry
    pub fn with_metrics(store: &'a S, config: EngineConfig, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            store,
            config,
            metrics,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Runs a query and returns records ascending by primary key
    pub fn query(&self, request: &QueryRequest) -> QueryResult<Vec<Record>> {
        let expr = request.expr.as_deref().unwrap_or("");
        if self.config.log_queries {
            Logger::event(
                Event::QueryBegin,
                &[("collection", request.collection.as_str()), ("expr", expr)],
            );
        }

        let started = Instant::now();
        match self.execute(request) {
            Ok(result) => {
                self.metrics.increment_queries_executed();
                self.metrics.add_entities_scanned(result.scanned_count as u64);
                self.metrics.add_records_returned(result.records.len() as u64);

                if self.config.log_queries {
                    let scanned = result.scanned_count.to_string();
                    let returned = result.records.len().to_string();
                    let elapsed = started.elapsed().as_micros().to_string();
                    Logger::event(
                        Event::QueryComplete,
                        &[
                            ("collection", request.collection.as_str()),
                            ("elapsed_us", elapsed.as_str()),
                            ("returned", returned.as_str()),
                            ("scanned", scanned.as_str()),
                        ],
                    );
                }
                Ok(result.records)
            }
            Err(err) => {
                self.reject(&request.collection, &err);
                Err(err)
            }
        }
    }

    /// Handles one raw JSON request line
    pub fn handle_json(&self, json: &str) -> Response {
        let request = serde_json::from_str::<serde_json::Value>(json)
            .map_err(|e| ApiError::invalid_request(format!("invalid JSON: {}", e)))
            .and_then(|value| QueryRequest::parse_json(&value));

        let request = match request {
            Ok(r) => r,
            Err(e) => {
                let err = QueryError::from(e);
                self.reject("", &err);
                return Response::error(&err);
            }
        };

        match self.query(&request) {
            Ok(records) => Response::success(records),
            Err(e) => Response::error(&e),
        }
    }

    fn execute(&self, request: &QueryRequest) -> QueryResult<ExecutionResult> {
        let pagination = Pagination::new(request.offset, request.limit, &self.config)?;

        let plan = QueryPlanner::new(self.store).plan(&request.collection, request.expr.as_deref())?;

        let projection = Projection::resolve(&plan.schema, request.output_fields.as_deref())?;

        let partitions = PartitionRouter::new(self.store)
            .resolve(&request.collection, request.partition_names.as_deref())?;

        Ok(QueryExecutor::new(self.store).execute(&plan, &partitions, &projection, &pagination))
    }

    fn reject(&self, collection: &str, err: &QueryError) {
        self.metrics.increment_queries_rejected();
        if self.config.log_queries {
            Logger::event(
                Event::QueryRejected,
                &[
                    ("code", err.code()),
                    ("collection", collection),
                    ("message", err.message()),
                ],
            );
        }
    }
}
