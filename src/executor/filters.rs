//! Predicate evaluation for query execution
//!
//! Pure functions over one entity's scalar values. Vector values are never
//! read. Logical nodes short-circuit left to right.

use crate::planner::{BoundExpr, CompareOp, Filter};
use crate::schema::Entity;

/// Evaluates bound filters against entities
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks if an entity passes the plan's filter
    pub fn matches(filter: &Filter, entity: &Entity) -> bool {
        match filter {
            Filter::MatchAll => true,
            Filter::Predicate(expr) => Self::evaluate(expr, entity),
        }
    }

    /// Evaluates one bound expression
    pub fn evaluate(expr: &BoundExpr, entity: &Entity) -> bool {
        match expr {
            BoundExpr::Compare { field, op, value } => entity
                .scalar(field)
                .map(|actual| op.matches(actual.compare(value)))
                .unwrap_or(false),
            BoundExpr::CompareFields { left, op, right } => {
                match (entity.scalar(left), entity.scalar(right)) {
                    (Some(a), Some(b)) => op.matches(a.compare(b)),
                    _ => false,
                }
            }
            BoundExpr::Range {
                field,
                lower,
                lower_inclusive,
                upper,
                upper_inclusive,
            } => {
                let Some(actual) = entity.scalar(field) else {
                    return false;
                };
                let lower_op = if *lower_inclusive {
                    CompareOp::Ge
                } else {
                    CompareOp::Gt
                };
                let upper_op = if *upper_inclusive {
                    CompareOp::Le
                } else {
                    CompareOp::Lt
                };
                lower_op.matches(actual.compare(lower)) && upper_op.matches(actual.compare(upper))
            }
            BoundExpr::Term {
                field,
                set,
                negated,
            } => entity
                .scalar(field)
                .map(|actual| set.contains(actual) != *negated)
                .unwrap_or(false),
            BoundExpr::Prefix { field, prefix } => entity
                .scalar(field)
                .and_then(|actual| actual.as_str())
                .map(|s| s.starts_with(prefix.as_str()))
                .unwrap_or(false),
            BoundExpr::And(left, right) => {
                Self::evaluate(left, entity) && Self::evaluate(right, entity)
            }
            BoundExpr::Or(left, right) => {
                Self::evaluate(left, entity) || Self::evaluate(right, entity)
            }
            BoundExpr::Not(inner) => !Self::evaluate(inner, entity),
        }
    }
}
