//! Recursive descent parser for filter expressions
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! or         := and (('||' | 'or') and)*
//! and        := unary (('&&' | 'and') unary)*
//! unary      := ('!' | 'not') unary | predicate
//! predicate  := '(' or ')' | comparison
//! comparison := additive ( cmp additive (cmp additive)?
//!                        | ['not'] 'in' '[' items ']'
//!                        | 'like' STRING )
//! additive   := multiplicative (('+' | '-') multiplicative)*
//! multiplicative := factor (('*' | '/' | '%') factor)*
//! factor     := ('-' | '+') factor | '(' additive ')' | IDENT | literal
//! ```
//!
//! Arithmetic is folded at parse time and is only defined on constants.

use super::ast::{Bound, CompareOp, Expr, Literal, Operand, TermItem};
use super::errors::{PlannerError, PlannerResult};
use super::lexer::{Lexer, Spanned, Token};

/// Parses a filter expression.
///
/// Empty or whitespace-only input is a syntax error; "match all" is
/// expressed by omitting the expression, not by an empty string.
pub fn parse(expression: &str) -> PlannerResult<Expr> {
    if expression.trim().is_empty() {
        return Err(PlannerError::syntax(expression, "expression is empty"));
    }

    let tokens = Lexer::new(expression).tokenize()?;
    let mut parser = Parser {
        source: expression,
        tokens,
        pos: 0,
    };

    let expr = parser.parse_or()?;
    if parser.current() != &Token::Eof {
        return Err(parser.unexpected());
    }
    Ok(expr)
}

/// An arithmetic operand before it is placed into a predicate
#[derive(Debug, Clone)]
enum Value {
    Field(String),
    Const(Literal),
}

#[derive(Debug, Clone, Copy)]
enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl ArithOp {
    fn symbol(&self) -> char {
        match self {
            ArithOp::Add => '+',
            ArithOp::Sub => '-',
            ArithOp::Mul => '*',
            ArithOp::Div => '/',
            ArithOp::Rem => '%',
        }
    }
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Spanned>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> &Token {
        // The token stream always ends with Eof and `advance` never moves past it
        self.tokens
            .get(self.pos)
            .map(|s| &s.token)
            .unwrap_or(&Token::Eof)
    }

    fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos + 1)
            .map(|s| &s.token)
            .unwrap_or(&Token::Eof)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|s| s.position)
            .unwrap_or(self.source.chars().count())
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn error(&self, detail: impl std::fmt::Display) -> PlannerError {
        PlannerError::syntax(self.source, detail)
    }

    fn unexpected(&self) -> PlannerError {
        self.error(format!(
            "unexpected token {} at position {}",
            self.current(),
            self.position()
        ))
    }

    fn expect(&mut self, expected: Token) -> PlannerResult<()> {
        if *self.current() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn compare_op(&self) -> Option<CompareOp> {
        match self.current() {
            Token::Eq => Some(CompareOp::Eq),
            Token::Ne => Some(CompareOp::Ne),
            Token::Lt => Some(CompareOp::Lt),
            Token::Le => Some(CompareOp::Le),
            Token::Gt => Some(CompareOp::Gt),
            Token::Ge => Some(CompareOp::Ge),
            _ => None,
        }
    }

    /// Whether the current token continues an operand rather than ending a predicate
    fn continues_operand(&self) -> bool {
        self.compare_op().is_some()
            || matches!(
                self.current(),
                Token::Plus
                    | Token::Minus
                    | Token::Star
                    | Token::Slash
                    | Token::Percent
                    | Token::In
                    | Token::Like
            )
            || (*self.current() == Token::Not && *self.peek() == Token::In)
    }

    fn parse_or(&mut self) -> PlannerResult<Expr> {
        let mut left = self.parse_and()?;
        while *self.current() == Token::Or {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> PlannerResult<Expr> {
        let mut left = self.parse_unary()?;
        while *self.current() == Token::And {
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::and(left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> PlannerResult<Expr> {
        if *self.current() == Token::Not {
            self.advance();
            return Ok(Expr::not(self.parse_unary()?));
        }
        self.parse_predicate()
    }

    fn parse_predicate(&mut self) -> PlannerResult<Expr> {
        if *self.current() != Token::LParen {
            return self.parse_comparison();
        }

        // A parenthesis opens either a sub-expression or an arithmetic operand
        // such as `(1 + 2) < a`. Try the sub-expression first.
        let start = self.pos;
        self.advance();
        let group_error = match self.parse_or() {
            Ok(inner) if *self.current() == Token::RParen => {
                self.advance();
                if !self.continues_operand() {
                    return Ok(inner);
                }
                None
            }
            Ok(_) => Some(self.unexpected()),
            Err(e) => Some(e),
        };

        self.pos = start;
        match self.parse_comparison() {
            Ok(expr) => Ok(expr),
            Err(e) => Err(group_error.unwrap_or(e)),
        }
    }

    fn parse_comparison(&mut self) -> PlannerResult<Expr> {
        let left = self.parse_additive()?;

        match self.current() {
            Token::In => {
                let field = self.require_field(left, "in")?;
                self.advance();
                let items = self.parse_term_list()?;
                Ok(Expr::Term {
                    field,
                    items,
                    negated: false,
                })
            }
            Token::Not if *self.peek() == Token::In => {
                let field = self.require_field(left, "not in")?;
                self.advance();
                self.advance();
                let items = self.parse_term_list()?;
                Ok(Expr::Term {
                    field,
                    items,
                    negated: true,
                })
            }
            Token::Like => {
                let field = self.require_field(left, "like")?;
                self.advance();
                let pattern = match self.current() {
                    Token::Str(s) => s.clone(),
                    _ => {
                        return Err(self.error(format!(
                            "like pattern must be a string literal, found {}",
                            self.current()
                        )))
                    }
                };
                self.advance();
                let prefix = self.like_prefix(&pattern)?;
                Ok(Expr::Like { field, prefix })
            }
            _ => {
                let op = self.compare_op().ok_or_else(|| self.unexpected())?;
                self.advance();
                let right = self.parse_additive()?;

                match self.compare_op() {
                    Some(second) => {
                        self.advance();
                        let third = self.parse_additive()?;
                        self.build_range(left, op, right, second, third)
                    }
                    None => self.build_compare(left, op, right),
                }
            }
        }
    }

    fn require_field(&self, value: Value, operator: &str) -> PlannerResult<String> {
        match value {
            Value::Field(name) => Ok(name),
            Value::Const(lit) => Err(self.error(format!(
                "left operand of '{}' must be a field, found {}",
                operator, lit
            ))),
        }
    }

    fn like_prefix(&self, pattern: &str) -> PlannerResult<String> {
        match pattern.strip_suffix('%') {
            Some(prefix) if !prefix.contains('%') => Ok(prefix.to_string()),
            _ => Err(self.error(format!(
                "like pattern {:?} is not supported, only a single trailing '%' is allowed",
                pattern
            ))),
        }
    }

    fn build_compare(&self, left: Value, op: CompareOp, right: Value) -> PlannerResult<Expr> {
        match (left, right) {
            (Value::Field(field), Value::Const(lit)) => Ok(Expr::Compare {
                field,
                op,
                operand: Operand::Literal(lit),
            }),
            (Value::Const(lit), Value::Field(field)) => Ok(Expr::Compare {
                field,
                op: op.flip(),
                operand: Operand::Literal(lit),
            }),
            (Value::Field(field), Value::Field(other)) => Ok(Expr::Compare {
                field,
                op,
                operand: Operand::Field(other),
            }),
            (Value::Const(a), Value::Const(b)) => Err(self.error(format!(
                "comparison between two constants {} {} {}",
                a, op, b
            ))),
        }
    }

    fn build_range(
        &self,
        lower: Value,
        first: CompareOp,
        middle: Value,
        second: CompareOp,
        upper: Value,
    ) -> PlannerResult<Expr> {
        let (field, a, b) = match (lower, middle, upper) {
            (Value::Const(a), Value::Field(field), Value::Const(b)) => (field, a, b),
            _ => {
                return Err(self.error(
                    "chained comparison must have the form: constant op field op constant",
                ))
            }
        };

        let ascending = |op: CompareOp| matches!(op, CompareOp::Lt | CompareOp::Le);
        let descending = |op: CompareOp| matches!(op, CompareOp::Gt | CompareOp::Ge);

        if ascending(first) && ascending(second) {
            Ok(Expr::Range {
                field,
                lower: Bound {
                    value: a,
                    inclusive: first == CompareOp::Le,
                },
                upper: Bound {
                    value: b,
                    inclusive: second == CompareOp::Le,
                },
            })
        } else if descending(first) && descending(second) {
            Ok(Expr::Range {
                field,
                lower: Bound {
                    value: b,
                    inclusive: second == CompareOp::Ge,
                },
                upper: Bound {
                    value: a,
                    inclusive: first == CompareOp::Ge,
                },
            })
        } else {
            Err(self.error(format!(
                "chained comparison operators {} and {} must point the same direction",
                first, second
            )))
        }
    }

    fn parse_term_list(&mut self) -> PlannerResult<Vec<TermItem>> {
        if *self.current() != Token::LBracket {
            return Err(PlannerError::in_expr_operand(self.current()));
        }
        self.advance();

        let mut items = Vec::new();
        loop {
            if *self.current() == Token::RBracket {
                self.advance();
                return Ok(items);
            }

            items.push(self.parse_term_item()?);

            match self.current() {
                Token::Comma => self.advance(),
                Token::RBracket => {}
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn parse_term_item(&mut self) -> PlannerResult<TermItem> {
        match self.current() {
            Token::LBracket | Token::LBrace => return self.skip_group().map(TermItem::NonConstant),
            Token::LParen => {
                let start = self.pos;
                if let Ok(value) = self.parse_additive() {
                    if matches!(self.current(), Token::Comma | Token::RBracket) {
                        return Ok(Self::term_item(value));
                    }
                }
                self.pos = start;
                return self.skip_group().map(TermItem::NonConstant);
            }
            _ => {}
        }

        self.parse_additive().map(Self::term_item)
    }

    fn term_item(value: Value) -> TermItem {
        match value {
            Value::Const(lit) => TermItem::Literal(lit),
            Value::Field(name) => TermItem::NonConstant(name),
        }
    }

    /// Consumes a balanced bracket group and returns its source text
    fn skip_group(&mut self) -> PlannerResult<String> {
        let start = self.position();
        let mut depth = 0usize;

        loop {
            match self.current() {
                Token::LBracket | Token::LParen | Token::LBrace => depth += 1,
                Token::RBracket | Token::RParen | Token::RBrace => depth = depth.saturating_sub(1),
                Token::Eof => return Err(self.unexpected()),
                _ => {}
            }
            let end = self.position();
            self.advance();
            if depth == 0 {
                return Ok(self.source.chars().skip(start).take(end + 1 - start).collect());
            }
        }
    }

    fn parse_additive(&mut self) -> PlannerResult<Value> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current() {
                Token::Plus => ArithOp::Add,
                Token::Minus => ArithOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.fold(left, op, right)?;
        }
    }

    fn parse_multiplicative(&mut self) -> PlannerResult<Value> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.current() {
                Token::Star => ArithOp::Mul,
                Token::Slash => ArithOp::Div,
                Token::Percent => ArithOp::Rem,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_factor()?;
            left = self.fold(left, op, right)?;
        }
    }

    fn parse_factor(&mut self) -> PlannerResult<Value> {
        let value = match self.current().clone() {
            Token::Minus => {
                self.advance();
                if *self.current() == Token::Int(1u64 << 63) {
                    self.advance();
                    return Ok(Value::Const(Literal::Int(i64::MIN)));
                }
                let inner = self.parse_factor()?;
                return self.negate(inner);
            }
            Token::Plus => {
                self.advance();
                let inner = self.parse_factor()?;
                return match inner {
                    Value::Const(Literal::Int(_)) | Value::Const(Literal::Float(_)) => Ok(inner),
                    Value::Const(lit) => Err(self.error(format!("unary '+' on {}", lit))),
                    Value::Field(name) => {
                        Err(self.error(format!("arithmetic on field {} is not supported", name)))
                    }
                };
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_additive()?;
                self.expect(Token::RParen)?;
                return Ok(inner);
            }
            Token::Identifier(name) => Value::Field(name),
            Token::Int(v) => {
                let v = i64::try_from(v).map_err(|_| {
                    self.error(format!("integer literal {} out of range", v))
                })?;
                Value::Const(Literal::Int(v))
            }
            Token::Float(v) => Value::Const(Literal::Float(v)),
            Token::Str(s) => Value::Const(Literal::String(s)),
            Token::Bool(b) => Value::Const(Literal::Bool(b)),
            _ => return Err(self.unexpected()),
        };
        self.advance();
        Ok(value)
    }

    fn negate(&self, value: Value) -> PlannerResult<Value> {
        match value {
            Value::Const(Literal::Int(v)) => v
                .checked_neg()
                .map(|n| Value::Const(Literal::Int(n)))
                .ok_or_else(|| self.error("integer overflow in constant expression")),
            Value::Const(Literal::Float(v)) => Ok(Value::Const(Literal::Float(-v))),
            Value::Const(lit) => Err(self.error(format!("unary '-' on {}", lit))),
            Value::Field(name) => {
                Err(self.error(format!("arithmetic on field {} is not supported", name)))
            }
        }
    }

    fn fold(&self, left: Value, op: ArithOp, right: Value) -> PlannerResult<Value> {
        let (a, b) = match (left, right) {
            (Value::Const(a), Value::Const(b)) => (a, b),
            (Value::Field(name), _) | (_, Value::Field(name)) => {
                return Err(self.error(format!(
                    "arithmetic on field {} is not supported",
                    name
                )))
            }
        };

        let overflow = || self.error("integer overflow in constant expression");
        let div_zero = || self.error("division by zero in constant expression");

        let folded = match (&a, &b) {
            (Literal::Int(x), Literal::Int(y)) => {
                let (x, y) = (*x, *y);
                let result = match op {
                    ArithOp::Add => x.checked_add(y).ok_or_else(overflow)?,
                    ArithOp::Sub => x.checked_sub(y).ok_or_else(overflow)?,
                    ArithOp::Mul => x.checked_mul(y).ok_or_else(overflow)?,
                    ArithOp::Div | ArithOp::Rem if y == 0 => return Err(div_zero()),
                    ArithOp::Div => x.checked_div(y).ok_or_else(overflow)?,
                    ArithOp::Rem => x.checked_rem(y).ok_or_else(overflow)?,
                };
                Literal::Int(result)
            }
            (Literal::Int(_) | Literal::Float(_), Literal::Int(_) | Literal::Float(_)) => {
                let x = as_f64(&a);
                let y = as_f64(&b);
                if matches!(op, ArithOp::Div | ArithOp::Rem) && y == 0.0 {
                    return Err(div_zero());
                }
                Literal::Float(match op {
                    ArithOp::Add => x + y,
                    ArithOp::Sub => x - y,
                    ArithOp::Mul => x * y,
                    ArithOp::Div => x / y,
                    ArithOp::Rem => x % y,
                })
            }
            _ => {
                return Err(self.error(format!(
                    "operator '{}' is not defined for {} and {}",
                    op.symbol(),
                    a,
                    b
                )))
            }
        };

        Ok(Value::Const(folded))
    }
}

fn as_f64(lit: &Literal) -> f64 {
    match lit {
        Literal::Int(v) => *v as f64,
        Literal::Float(v) => *v,
        _ => f64::NAN,
    }
}
