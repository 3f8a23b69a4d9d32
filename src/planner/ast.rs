//! Filter expression AST
//!
//! Produced by the parser, consumed by the binder. Comparisons are
//! normalized so the field is always on the left; constant arithmetic is
//! already folded.

use std::cmp::Ordering;
use std::fmt;

/// A constant literal
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Literal {
    /// Category name used in type-mismatch messages
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Bool(_) => "Bool",
            Literal::Int(_) => "Int",
            Literal::Float(_) => "Float",
            Literal::String(_) => "String",
        }
    }

    /// The value without quoting
    pub fn raw(&self) -> String {
        match self {
            Literal::Bool(v) => v.to_string(),
            Literal::Int(v) => v.to_string(),
            Literal::Float(v) => v.to_string(),
            Literal::String(v) => v.clone(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(v) => write!(f, "{:?}", v),
            other => write!(f, "{}", other.raw()),
        }
    }
}

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Field(String),
    Literal(Literal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    /// The operator with its operands swapped: `a < b` is `b > a`
    pub fn flip(&self) -> CompareOp {
        match self {
            CompareOp::Eq => CompareOp::Eq,
            CompareOp::Ne => CompareOp::Ne,
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Le => CompareOp::Ge,
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Ge => CompareOp::Le,
        }
    }

    pub fn is_ordering(&self) -> bool {
        !matches!(self, CompareOp::Eq | CompareOp::Ne)
    }

    /// Applies the operator to an ordering; `None` (incomparable, NaN)
    /// satisfies only `!=`
    pub fn matches(&self, ordering: Option<Ordering>) -> bool {
        match ordering {
            None => *self == CompareOp::Ne,
            Some(ord) => match self {
                CompareOp::Eq => ord == Ordering::Equal,
                CompareOp::Ne => ord != Ordering::Equal,
                CompareOp::Lt => ord == Ordering::Less,
                CompareOp::Le => ord != Ordering::Greater,
                CompareOp::Gt => ord == Ordering::Greater,
                CompareOp::Ge => ord != Ordering::Less,
            },
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One element of a bracketed term list
#[derive(Debug, Clone, PartialEq)]
pub enum TermItem {
    Literal(Literal),
    /// A nested list, tuple, brace group or identifier, kept as source text
    NonConstant(String),
}

/// One end of a chained range
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub value: Literal,
    pub inclusive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `field op operand`
    Compare {
        field: String,
        op: CompareOp,
        operand: Operand,
    },
    /// `lower <(=) field <(=) upper`, normalized to ascending bounds
    Range {
        field: String,
        lower: Bound,
        upper: Bound,
    },
    /// `field in [...]` / `field not in [...]`
    Term {
        field: String,
        items: Vec<TermItem>,
        negated: bool,
    },
    /// `field like "prefix%"`
    Like { field: String, prefix: String },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    pub fn and(left: Expr, right: Expr) -> Expr {
        Expr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Expr {
        Expr::Or(Box::new(left), Box::new(right))
    }

    pub fn not(inner: Expr) -> Expr {
        Expr::Not(Box::new(inner))
    }
}
