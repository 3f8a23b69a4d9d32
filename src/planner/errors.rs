//! Planner error types
//!
//! Error codes:
//! - QUARRY_EXPR_SYNTAX
//! - QUARRY_UNKNOWN_FIELD
//! - QUARRY_VECTOR_FIELD_IN_PREDICATE
//! - QUARRY_TYPE_MISMATCH
//! - QUARRY_UNSUPPORTED_LEAF_NODE
//! - QUARRY_IN_EXPR_OPERAND
//! - QUARRY_UNSUPPORTED_OPERATION
//! - QUARRY_COLLECTION_NOT_FOUND

use std::fmt;

/// Planner-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerErrorCode {
    /// Malformed expression
    SyntaxError,
    /// Identifier does not name a schema field
    UnknownField,
    /// Vector field referenced by a predicate
    VectorFieldInPredicate,
    /// Literal or field types are incompatible
    TypeMismatch,
    /// Non-constant entry in a term list
    UnsupportedLeafNode,
    /// Right operand of `in`/`not in` is not a bracketed list
    InExprOperand,
    /// Operator not defined for the field type
    UnsupportedOperation,
    /// Collection unknown to the schema registry
    UnknownCollection,
}

impl PlannerErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            PlannerErrorCode::SyntaxError => "QUARRY_EXPR_SYNTAX",
            PlannerErrorCode::UnknownField => "QUARRY_UNKNOWN_FIELD",
            PlannerErrorCode::VectorFieldInPredicate => "QUARRY_VECTOR_FIELD_IN_PREDICATE",
            PlannerErrorCode::TypeMismatch => "QUARRY_TYPE_MISMATCH",
            PlannerErrorCode::UnsupportedLeafNode => "QUARRY_UNSUPPORTED_LEAF_NODE",
            PlannerErrorCode::InExprOperand => "QUARRY_IN_EXPR_OPERAND",
            PlannerErrorCode::UnsupportedOperation => "QUARRY_UNSUPPORTED_OPERATION",
            PlannerErrorCode::UnknownCollection => "QUARRY_COLLECTION_NOT_FOUND",
        }
    }
}

impl fmt::Display for PlannerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Planner error with context
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerError {
    code: PlannerErrorCode,
    message: String,
    /// Field name if applicable
    field: Option<String>,
}

impl PlannerError {
    fn new(code: PlannerErrorCode, message: String, field: Option<String>) -> Self {
        Self {
            code,
            message,
            field,
        }
    }

    /// Malformed expression; `detail` names the offending token and position
    pub fn syntax(expression: &str, detail: impl fmt::Display) -> Self {
        Self::new(
            PlannerErrorCode::SyntaxError,
            format!("cannot parse expression: {}, error: {}", expression, detail),
            None,
        )
    }

    pub fn unknown_field(field: &str) -> Self {
        Self::new(
            PlannerErrorCode::UnknownField,
            format!("fieldName({}) not found", field),
            Some(field.to_string()),
        )
    }

    pub fn vector_field_in_predicate(field: &str) -> Self {
        Self::new(
            PlannerErrorCode::VectorFieldInPredicate,
            format!(
                "vector field {} cannot be used in a filter expression",
                field
            ),
            Some(field.to_string()),
        )
    }

    /// A literal cannot be cast to the field's type
    pub fn cannot_cast(field: &str, value: impl fmt::Display, type_name: &str) -> Self {
        Self::new(
            PlannerErrorCode::TypeMismatch,
            format!(
                "type mismatch: value {} cannot be cast to {} (field {})",
                value, type_name, field
            ),
            Some(field.to_string()),
        )
    }

    /// A term-list element cannot be cast to the field's type
    pub fn term_cannot_cast(field: &str, raw_value: &str, type_name: &str) -> Self {
        Self::new(
            PlannerErrorCode::TypeMismatch,
            format!(
                "type mismatch: value \"{}\" in list cannot be casted to {}",
                raw_value, type_name
            ),
            Some(field.to_string()),
        )
    }

    /// Term-list literals of different categories
    pub fn mixed_term_list(field: &str, first: &str, other: &str) -> Self {
        Self::new(
            PlannerErrorCode::TypeMismatch,
            format!(
                "type mismatch: list for field {} mixes {} and {} literals",
                field, first, other
            ),
            Some(field.to_string()),
        )
    }

    /// Two fields of incomparable types
    pub fn incomparable_fields(left: &str, op: &str, right: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            PlannerErrorCode::TypeMismatch,
            format!(
                "type mismatch: cannot parse expression: {} {} {}, error: {}",
                left, op, right, reason
            ),
            Some(left.to_string()),
        )
    }

    pub fn unsupported_leaf_node(field: &str, element: &str) -> Self {
        Self::new(
            PlannerErrorCode::UnsupportedLeafNode,
            format!("unsupported leaf node: {} in list for field {}", element, field),
            Some(field.to_string()),
        )
    }

    pub fn in_expr_operand(found: impl fmt::Display) -> Self {
        Self::new(
            PlannerErrorCode::InExprOperand,
            format!("right operand of the InExpr must be array, got {}", found),
            None,
        )
    }

    pub fn unsupported_operation(field: &str, reason: impl Into<String>) -> Self {
        Self::new(
            PlannerErrorCode::UnsupportedOperation,
            reason.into(),
            Some(field.to_string()),
        )
    }

    pub fn unknown_collection(collection: &str) -> Self {
        Self::new(
            PlannerErrorCode::UnknownCollection,
            format!("collection {} not found", collection),
            None,
        )
    }

    pub fn code(&self) -> PlannerErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field name if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl std::error::Error for PlannerError {}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PlannerErrorCode::SyntaxError.code(), "QUARRY_EXPR_SYNTAX");
        assert_eq!(PlannerErrorCode::InExprOperand.code(), "QUARRY_IN_EXPR_OPERAND");
        assert_eq!(
            PlannerErrorCode::UnsupportedLeafNode.code(),
            "QUARRY_UNSUPPORTED_LEAF_NODE"
        );
    }

    #[test]
    fn test_messages_embed_values() {
        let err = PlannerError::unknown_field("int65");
        assert_eq!(err.message(), "fieldName(int65) not found");
        assert_eq!(err.field(), Some("int65"));

        let err = PlannerError::term_cannot_cast("bool", "0", "Bool");
        assert!(err.message().contains("value \"0\" in list cannot be casted to Bool"));

        let err = PlannerError::in_expr_operand("Int(1)");
        assert!(err.message().contains("right operand of the InExpr must be array"));
    }

    #[test]
    fn test_error_display() {
        let err = PlannerError::syntax("int64 inn [1]", "unexpected token Identifier(\"inn\") at 6");
        let display = format!("{}", err);
        assert!(display.starts_with("[QUARRY_EXPR_SYNTAX]"));
        assert!(display.contains("Identifier(\"inn\")"));
    }
}
