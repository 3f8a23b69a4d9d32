//! Term sets backing `in` / `not in`
//!
//! A term set is built once per predicate and is typed by the field it is
//! checked against. Repeated literals collapse to one member.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::schema::{DataType, FieldDef, ScalarValue};

use super::ast::{Literal, TermItem};
use super::errors::{PlannerError, PlannerResult};

/// `f64` with a total order, used as a set member. `-0.0` is stored as `0.0`
/// so both match an equal field value.
#[derive(Debug, Clone, Copy)]
pub struct OrderedFloat(f64);

impl OrderedFloat {
    pub fn new(value: f64) -> Self {
        if value == 0.0 {
            OrderedFloat(0.0)
        } else {
            OrderedFloat(value)
        }
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderedFloat {}

impl PartialOrd for OrderedFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// De-duplicated, type-homogeneous literal set
#[derive(Debug, Clone, PartialEq)]
pub enum TermSet {
    Bool(BTreeSet<bool>),
    Int(BTreeSet<i64>),
    Float(BTreeSet<OrderedFloat>),
    String(BTreeSet<String>),
}

impl TermSet {
    /// Builds the set for `field` from a parsed list.
    ///
    /// Checks, in order: every item is a constant, every literal is of the
    /// same kind, and every literal casts to the field type.
    pub fn build(field: &FieldDef, items: &[TermItem]) -> PlannerResult<TermSet> {
        let mut literals = Vec::with_capacity(items.len());
        for item in items {
            match item {
                TermItem::Literal(lit) => literals.push(lit),
                TermItem::NonConstant(text) => {
                    return Err(PlannerError::unsupported_leaf_node(&field.name, text))
                }
            }
        }

        if let Some(first) = literals.first() {
            if let Some(other) = literals.iter().find(|l| l.kind() != first.kind()) {
                return Err(PlannerError::mixed_term_list(
                    &field.name,
                    first.kind(),
                    other.kind(),
                ));
            }
        }

        let mismatch =
            |lit: &Literal| PlannerError::term_cannot_cast(&field.name, &lit.raw(), field.data_type.type_name());

        let set = match field.data_type {
            DataType::Bool => TermSet::Bool(
                literals
                    .iter()
                    .map(|lit| match lit {
                        Literal::Bool(v) => Ok(*v),
                        other => Err(mismatch(other)),
                    })
                    .collect::<PlannerResult<_>>()?,
            ),
            t if t.is_integer() => TermSet::Int(
                literals
                    .iter()
                    .map(|lit| match lit {
                        Literal::Int(v) => Ok(*v),
                        other => Err(mismatch(other)),
                    })
                    .collect::<PlannerResult<_>>()?,
            ),
            t if t.is_floating() => TermSet::Float(
                literals
                    .iter()
                    .map(|lit| match lit {
                        Literal::Int(v) => Ok(OrderedFloat::new(t.round_to_width(*v as f64))),
                        Literal::Float(v) => Ok(OrderedFloat::new(t.round_to_width(*v))),
                        other => Err(mismatch(other)),
                    })
                    .collect::<PlannerResult<_>>()?,
            ),
            DataType::VarChar => TermSet::String(
                literals
                    .iter()
                    .map(|lit| match lit {
                        Literal::String(v) => Ok(v.clone()),
                        other => Err(mismatch(other)),
                    })
                    .collect::<PlannerResult<_>>()?,
            ),
            _ => return Err(PlannerError::vector_field_in_predicate(&field.name)),
        };

        Ok(set)
    }

    /// Set membership of a stored value
    pub fn contains(&self, value: &ScalarValue) -> bool {
        match (self, value) {
            (TermSet::Bool(set), ScalarValue::Bool(v)) => set.contains(v),
            (TermSet::Int(set), ScalarValue::Int(v)) => set.contains(v),
            (TermSet::Float(set), ScalarValue::Float(v)) => set.contains(&OrderedFloat::new(*v)),
            (TermSet::Float(set), ScalarValue::Int(v)) => {
                set.contains(&OrderedFloat::new(*v as f64))
            }
            (TermSet::String(set), ScalarValue::String(v)) => set.contains(v.as_str()),
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TermSet::Bool(set) => set.len(),
            TermSet::Int(set) => set.len(),
            TermSet::Float(set) => set.len(),
            TermSet::String(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::PlannerErrorCode;

    fn ints(values: &[i64]) -> Vec<TermItem> {
        values
            .iter()
            .map(|v| TermItem::Literal(Literal::Int(*v)))
            .collect()
    }

    #[test]
    fn test_repeated_terms_collapse() {
        let field = FieldDef::primary("int64", DataType::Int64);
        let set = TermSet::build(&field, &ints(&[0, 0, 0, 0])).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&ScalarValue::Int(0)));
        assert!(!set.contains(&ScalarValue::Int(1)));
    }

    #[test]
    fn test_empty_list_is_valid() {
        let field = FieldDef::scalar("varchar", DataType::VarChar);
        let set = TermSet::build(&field, &[]).unwrap();
        assert!(set.is_empty());
        assert!(!set.contains(&ScalarValue::String(String::new())));
    }

    #[test]
    fn test_mixed_int_and_float_rejected() {
        let field = FieldDef::scalar("float", DataType::Float);
        let items = vec![
            TermItem::Literal(Literal::Int(1)),
            TermItem::Literal(Literal::Float(2.0)),
        ];
        let err = TermSet::build(&field, &items).unwrap_err();
        assert_eq!(err.code(), PlannerErrorCode::TypeMismatch);
    }

    #[test]
    fn test_non_constant_rejected_before_kinds() {
        let field = FieldDef::scalar("int8", DataType::Int8);
        let items = vec![
            TermItem::Literal(Literal::String("a".into())),
            TermItem::Literal(Literal::Int(1)),
            TermItem::NonConstant("[1]".into()),
        ];
        let err = TermSet::build(&field, &items).unwrap_err();
        assert_eq!(err.code(), PlannerErrorCode::UnsupportedLeafNode);
        assert!(err.message().contains("[1]"));
    }

    #[test]
    fn test_bool_field_rejects_integers() {
        let field = FieldDef::scalar("bool", DataType::Bool);
        let err = TermSet::build(&field, &ints(&[0, 1])).unwrap_err();
        assert_eq!(err.code(), PlannerErrorCode::TypeMismatch);
        assert!(err.message().contains("cannot be casted to Bool"));
    }

    #[test]
    fn test_float_set_matches_integers_and_signed_zero() {
        let field = FieldDef::scalar("double", DataType::Double);
        let set = TermSet::build(&field, &ints(&[0, 2])).unwrap();
        assert!(set.contains(&ScalarValue::Float(-0.0)));
        assert!(set.contains(&ScalarValue::Float(2.0)));
        assert!(!set.contains(&ScalarValue::Float(2.5)));
    }

    #[test]
    fn test_string_set_rejects_numbers() {
        let field = FieldDef::scalar("varchar", DataType::VarChar);
        let err = TermSet::build(&field, &ints(&[1])).unwrap_err();
        assert!(err.message().contains("value \"1\" in list cannot be casted to VarChar"));
    }
}
