//! Type binding
//!
//! Resolves every identifier in a parsed expression against the collection
//! schema and casts literals to the referenced field's type. For each leaf,
//! checks run in a fixed order: unknown field, vector field, then the
//! operation itself.

use crate::schema::{CollectionSchema, DataType, FieldDef, ScalarValue};

use super::ast::{Bound, CompareOp, Expr, Literal, Operand};
use super::errors::{PlannerError, PlannerResult};
use super::term_set::TermSet;

/// An expression whose fields exist, are scalar, and whose literals carry
/// the field's value representation
#[derive(Debug, Clone, PartialEq)]
pub enum BoundExpr {
    Compare {
        field: String,
        op: CompareOp,
        value: ScalarValue,
    },
    CompareFields {
        left: String,
        op: CompareOp,
        right: String,
    },
    Range {
        field: String,
        lower: ScalarValue,
        lower_inclusive: bool,
        upper: ScalarValue,
        upper_inclusive: bool,
    },
    Term {
        field: String,
        set: TermSet,
        negated: bool,
    },
    Prefix {
        field: String,
        prefix: String,
    },
    And(Box<BoundExpr>, Box<BoundExpr>),
    Or(Box<BoundExpr>, Box<BoundExpr>),
    Not(Box<BoundExpr>),
}

/// Binds `expr` against `schema`
pub fn bind(expr: &Expr, schema: &CollectionSchema) -> PlannerResult<BoundExpr> {
    match expr {
        Expr::Compare {
            field,
            op,
            operand: Operand::Literal(lit),
        } => {
            let def = resolve(schema, field)?;
            if def.data_type == DataType::Bool && op.is_ordering() {
                return Err(ordering_on_bool(&def.name, *op));
            }
            Ok(BoundExpr::Compare {
                field: def.name.clone(),
                op: *op,
                value: cast_literal(def, lit)?,
            })
        }
        Expr::Compare {
            field,
            op,
            operand: Operand::Field(other),
        } => {
            let left = resolve(schema, field)?;
            let right = resolve(schema, other)?;
            check_comparable(left, *op, right)?;
            Ok(BoundExpr::CompareFields {
                left: left.name.clone(),
                op: *op,
                right: right.name.clone(),
            })
        }
        Expr::Range {
            field,
            lower,
            upper,
        } => {
            let def = resolve(schema, field)?;
            if def.data_type == DataType::Bool {
                return Err(PlannerError::unsupported_operation(
                    &def.name,
                    format!("range comparison on Bool field {} is unsupported", def.name),
                ));
            }
            let Bound {
                value: lower,
                inclusive: lower_inclusive,
            } = lower;
            let Bound {
                value: upper,
                inclusive: upper_inclusive,
            } = upper;
            Ok(BoundExpr::Range {
                field: def.name.clone(),
                lower: cast_literal(def, lower)?,
                lower_inclusive: *lower_inclusive,
                upper: cast_literal(def, upper)?,
                upper_inclusive: *upper_inclusive,
            })
        }
        Expr::Term {
            field,
            items,
            negated,
        } => {
            let def = resolve(schema, field)?;
            Ok(BoundExpr::Term {
                field: def.name.clone(),
                set: TermSet::build(def, items)?,
                negated: *negated,
            })
        }
        Expr::Like { field, prefix } => {
            let def = resolve(schema, field)?;
            if !def.data_type.is_string() {
                return Err(PlannerError::unsupported_operation(
                    &def.name,
                    "like operation on non-string field is unsupported",
                ));
            }
            Ok(BoundExpr::Prefix {
                field: def.name.clone(),
                prefix: prefix.clone(),
            })
        }
        Expr::And(left, right) => Ok(BoundExpr::And(
            Box::new(bind(left, schema)?),
            Box::new(bind(right, schema)?),
        )),
        Expr::Or(left, right) => Ok(BoundExpr::Or(
            Box::new(bind(left, schema)?),
            Box::new(bind(right, schema)?),
        )),
        Expr::Not(inner) => Ok(BoundExpr::Not(Box::new(bind(inner, schema)?))),
    }
}

fn resolve<'s>(schema: &'s CollectionSchema, name: &str) -> PlannerResult<&'s FieldDef> {
    let def = schema
        .field(name)
        .ok_or_else(|| PlannerError::unknown_field(name))?;
    if def.is_vector() {
        return Err(PlannerError::vector_field_in_predicate(name));
    }
    Ok(def)
}

fn ordering_on_bool(field: &str, op: CompareOp) -> PlannerError {
    PlannerError::unsupported_operation(
        field,
        format!("operator {} on Bool field {} is unsupported", op, field),
    )
}

/// Casts a literal to the value representation of `field`.
///
/// Integer literals widen to float/double fields; nothing else converts.
fn cast_literal(field: &FieldDef, lit: &Literal) -> PlannerResult<ScalarValue> {
    let value = match (field.data_type, lit) {
        (DataType::Bool, Literal::Bool(v)) => Some(ScalarValue::Bool(*v)),
        (t, Literal::Int(v)) if t.is_integer() => Some(ScalarValue::Int(*v)),
        (t, Literal::Int(v)) if t.is_floating() => {
            Some(ScalarValue::Float(t.round_to_width(*v as f64)))
        }
        (t, Literal::Float(v)) if t.is_floating() => {
            Some(ScalarValue::Float(t.round_to_width(*v)))
        }
        (DataType::VarChar, Literal::String(v)) => Some(ScalarValue::String(v.clone())),
        _ => None,
    };
    value.ok_or_else(|| PlannerError::cannot_cast(&field.name, lit, field.data_type.type_name()))
}

fn check_comparable(left: &FieldDef, op: CompareOp, right: &FieldDef) -> PlannerResult<()> {
    let (l, r) = (left.data_type, right.data_type);

    if l == DataType::Bool && r == DataType::Bool {
        if op.is_ordering() {
            return Err(ordering_on_bool(&left.name, op));
        }
        return Ok(());
    }
    if (l.is_numeric() && r.is_numeric()) || (l.is_string() && r.is_string()) {
        return Ok(());
    }

    Err(PlannerError::incomparable_fields(
        &left.name,
        op.as_str(),
        &right.name,
        format!("comparison between {} and {} is not supported", l, r),
    ))
}
