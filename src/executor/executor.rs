//! Query executor for quarry
//!
//! Execution flow (strict order):
//! 1. Scan the routed partitions, applying the plan's filter
//! 2. De-duplicate matches by primary key (first scanned wins)
//! 3. Order matches ascending by primary key
//! 4. Apply offset/limit
//! 5. Project the surviving entities into records

use crate::planner::QueryPlan;

use super::pager::Pagination;
use super::projector::Projection;
use super::result::ExecutionResult;
use super::router::{LoadedPartitions, PartitionStore};
use super::scanner::ScanExecutor;

/// Query executor that runs plans against a partition store
pub struct QueryExecutor<'a, P: PartitionStore> {
    store: &'a P,
}

impl<'a, P: PartitionStore> QueryExecutor<'a, P> {
    pub fn new(store: &'a P) -> Self {
        Self { store }
    }

    /// Executes a plan over already-routed partitions.
    ///
    /// This method is deterministic: same plan and same data give the same
    /// records, up to which physical duplicate backs a repeated key.
    pub fn execute(
        &self,
        plan: &QueryPlan,
        partitions: &LoadedPartitions,
        projection: &Projection,
        pagination: &Pagination,
    ) -> ExecutionResult {
        let outcome = ScanExecutor::new(self.store).scan(partitions, &plan.filter);
        let matched_count = outcome.matches.len();

        let records = pagination
            .apply(outcome.matches.values())
            .map(|entity| projection.project(entity))
            .collect();

        ExecutionResult {
            records,
            scanned_count: outcome.scanned,
            matched_count,
        }
    }
}
