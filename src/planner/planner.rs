//! Query planner
//!
//! Turns a collection name and an optional filter string into an immutable
//! plan: the collection's schema plus a bound filter. Planning is
//! deterministic and touches no entity data.

use std::sync::Arc;

use crate::schema::CollectionSchema;

use super::binder::{bind, BoundExpr};
use super::errors::{PlannerError, PlannerResult};
use super::parser::parse;

/// Schema registry consumed by the planner (read-only)
pub trait SchemaRegistry {
    /// Schema of `collection`, if it exists
    fn get_schema(&self, collection: &str) -> Option<Arc<CollectionSchema>>;

    /// Whether the named partitions are loaded. An empty slice asks whether
    /// anything in the collection is loaded.
    fn is_loaded(&self, collection: &str, partitions: &[String]) -> bool;
}

/// Row filter of a plan
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// No expression was given
    MatchAll,
    Predicate(BoundExpr),
}

/// Immutable query plan (no runtime state)
#[derive(Debug, Clone)]
pub struct QueryPlan {
    /// Collection to query
    pub collection: String,
    /// Schema the filter was bound against
    pub schema: Arc<CollectionSchema>,
    pub filter: Filter,
}

/// Query planner that produces deterministic plans
pub struct QueryPlanner<'a, S: SchemaRegistry> {
    schema_registry: &'a S,
}

impl<'a, S: SchemaRegistry> QueryPlanner<'a, S> {
    pub fn new(schema_registry: &'a S) -> Self {
        Self { schema_registry }
    }

    /// Plans a query.
    ///
    /// `None` means match all. `Some("")` is a syntax error.
    pub fn plan(&self, collection: &str, expression: Option<&str>) -> PlannerResult<QueryPlan> {
        let schema = self
            .schema_registry
            .get_schema(collection)
            .ok_or_else(|| PlannerError::unknown_collection(collection))?;

        let filter = match expression {
            None => Filter::MatchAll,
            Some(text) => Filter::Predicate(bind(&parse(text)?, &schema)?),
        };

        Ok(QueryPlan {
            collection: collection.to_string(),
            schema,
            filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::PlannerErrorCode;
    use crate::schema::{DataType, FieldDef};
    use std::collections::HashMap;

    struct MockRegistry {
        schemas: HashMap<String, Arc<CollectionSchema>>,
    }

    impl MockRegistry {
        fn new() -> Self {
            let schema = CollectionSchema::new(
                vec![
                    FieldDef::primary("pk", DataType::Int64),
                    FieldDef::scalar("name", DataType::VarChar),
                ],
                false,
            )
            .unwrap();
            let mut schemas = HashMap::new();
            schemas.insert("users".to_string(), Arc::new(schema));
            Self { schemas }
        }
    }

    impl SchemaRegistry for MockRegistry {
        fn get_schema(&self, collection: &str) -> Option<Arc<CollectionSchema>> {
            self.schemas.get(collection).cloned()
        }

        fn is_loaded(&self, _collection: &str, _partitions: &[String]) -> bool {
            true
        }
    }

    #[test]
    fn test_match_all_plan() {
        let registry = MockRegistry::new();
        let plan = QueryPlanner::new(&registry).plan("users", None).unwrap();
        assert_eq!(plan.collection, "users");
        assert_eq!(plan.filter, Filter::MatchAll);
    }

    #[test]
    fn test_predicate_plan() {
        let registry = MockRegistry::new();
        let plan = QueryPlanner::new(&registry)
            .plan("users", Some("name like \"a%\""))
            .unwrap();
        assert!(matches!(plan.filter, Filter::Predicate(BoundExpr::Prefix { .. })));
    }

    #[test]
    fn test_unknown_collection() {
        let registry = MockRegistry::new();
        let err = QueryPlanner::new(&registry).plan("nope", None).unwrap_err();
        assert_eq!(err.code(), PlannerErrorCode::UnknownCollection);
    }

    #[test]
    fn test_empty_expression_is_syntax_error() {
        let registry = MockRegistry::new();
        let err = QueryPlanner::new(&registry)
            .plan("users", Some("   "))
            .unwrap_err();
        assert_eq!(err.code(), PlannerErrorCode::SyntaxError);
    }

    #[test]
    fn test_planning_is_deterministic() {
        let registry = MockRegistry::new();
        let planner = QueryPlanner::new(&registry);
        let a = planner.plan("users", Some("pk in [3, 1, 3]")).unwrap();
        let b = planner.plan("users", Some("pk in [3, 1, 3]")).unwrap();
        assert_eq!(a.filter, b.filter);
    }
}
