//! Query planner subsystem for quarry
//!
//! Parses a filter expression, binds it against the collection schema and
//! produces an immutable [`QueryPlan`].
//!
//! # Design Principles
//!
//! - Deterministic: same inputs produce the same plan
//! - Typed: every literal is cast to its field's type before execution
//! - Explicit: an absent expression is match-all, an empty one is an error
//! - Scalar only: vector fields never appear in a predicate
//!
//! # Pipeline
//!
//! 1. [`parse`]: text to [`Expr`], constant arithmetic folded
//! 2. [`bind`]: [`Expr`] to [`BoundExpr`] against a [`CollectionSchema`](crate::schema::CollectionSchema)
//! 3. [`TermSet::build`] for every `in` / `not in` list

mod ast;
mod binder;
mod errors;
mod lexer;
mod parser;
mod planner;
mod term_set;

pub use ast::{Bound, CompareOp, Expr, Literal, Operand, TermItem};
pub use binder::{bind, BoundExpr};
pub use errors::{PlannerError, PlannerErrorCode, PlannerResult};
pub use lexer::{Lexer, Spanned, Token};
pub use parser::parse;
pub use planner::{Filter, QueryPlan, QueryPlanner, SchemaRegistry};
pub use term_set::{OrderedFloat, TermSet};
