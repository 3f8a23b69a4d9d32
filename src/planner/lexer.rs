//! Tokenizer for filter expressions
//!
//! Keywords (`and`, `or`, `not`, `in`, `like`, `true`, `false`) are
//! case-insensitive. `&&`/`and`, `||`/`or` and `!`/`not` lex to the same
//! tokens. Integer literals are lexed unsigned; sign is applied by the
//! parser so that `-9223372036854775808` is representable.

use std::fmt;

use super::errors::{PlannerError, PlannerResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Identifier(String),
    Int(u64),
    Float(f64),
    Str(String),
    Bool(bool),

    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    And,
    Or,
    Not,
    In,
    Like,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,

    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(s) => write!(f, "Identifier({:?})", s),
            Token::Int(v) => write!(f, "Int({})", v),
            Token::Float(v) => write!(f, "Float({:?})", v),
            Token::Str(s) => write!(f, "String({:?})", s),
            Token::Bool(b) => write!(f, "Bool({})", b),
            Token::Eq => write!(f, "'=='"),
            Token::Ne => write!(f, "'!='"),
            Token::Lt => write!(f, "'<'"),
            Token::Le => write!(f, "'<='"),
            Token::Gt => write!(f, "'>'"),
            Token::Ge => write!(f, "'>='"),
            Token::And => write!(f, "'and'"),
            Token::Or => write!(f, "'or'"),
            Token::Not => write!(f, "'not'"),
            Token::In => write!(f, "'in'"),
            Token::Like => write!(f, "'like'"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::Percent => write!(f, "'%'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::Comma => write!(f, "','"),
            Token::Eof => write!(f, "end of expression"),
        }
    }
}

/// A token and the character offset where it starts
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

pub struct Lexer<'a> {
    source: &'a str,
    input: Vec<char>,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            input: source.chars().collect(),
            position: 0,
        }
    }

    /// Tokenizes the whole input; the last token is always `Eof`
    pub fn tokenize(mut self) -> PlannerResult<Vec<Spanned>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let position = self.position;
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(Spanned { token, position });
            if done {
                return Ok(tokens);
            }
        }
    }

    fn error(&self, position: usize, detail: impl fmt::Display) -> PlannerError {
        PlannerError::syntax(self.source, format!("{} at position {}", detail, position))
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        self.position += 1;
        ch
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.advance();
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> PlannerResult<String> {
        let start = self.position;
        self.advance();
        let mut result = String::new();

        loop {
            match self.advance() {
                Some(ch) if ch == quote => return Ok(result),
                Some('\\') => match self.advance() {
                    Some('n') => result.push('\n'),
                    Some('t') => result.push('\t'),
                    Some('r') => result.push('\r'),
                    Some(c) => result.push(c),
                    None => return Err(self.error(start, "unterminated string literal")),
                },
                Some(ch) => result.push(ch),
                None => return Err(self.error(start, "unterminated string literal")),
            }
        }
    }

    fn read_number(&mut self) -> PlannerResult<Token> {
        let start = self.position;
        let mut text = String::new();
        let mut is_float = false;
        let mut has_exponent = false;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else if ch == '.' && !is_float && !has_exponent {
                is_float = true;
                text.push(ch);
                self.advance();
            } else if (ch == 'e' || ch == 'E') && !has_exponent {
                let next = self.peek_next();
                let signed = matches!(next, Some('+') | Some('-'))
                    && matches!(self.input.get(self.position + 2), Some(c) if c.is_ascii_digit());
                if !(signed || matches!(next, Some(c) if c.is_ascii_digit())) {
                    break;
                }
                is_float = true;
                has_exponent = true;
                text.push(ch);
                self.advance();
                if signed {
                    if let Some(sign) = self.advance() {
                        text.push(sign);
                    }
                }
            } else {
                break;
            }
        }

        if matches!(self.peek(), Some(ch) if ch.is_ascii_alphabetic() || ch == '_') {
            let suffix = self.read_identifier();
            return Err(self.error(start, format!("invalid number literal '{}{}'", text, suffix)));
        }

        if is_float {
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| self.error(start, format!("invalid number literal '{}'", text)))
        } else {
            text.parse::<u64>()
                .map(Token::Int)
                .map_err(|_| self.error(start, format!("integer literal {} out of range", text)))
        }
    }

    fn next_token(&mut self) -> PlannerResult<Token> {
        let start = self.position;

        let Some(ch) = self.peek() else {
            return Ok(Token::Eof);
        };

        let single = match ch {
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            '{' => Some(Token::LBrace),
            '}' => Some(Token::RBrace),
            ',' => Some(Token::Comma),
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '%' => Some(Token::Percent),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        match ch {
            '=' | '!' | '<' | '>' => {
                self.advance();
                let followed_by_eq = self.peek() == Some('=');
                if followed_by_eq {
                    self.advance();
                }
                match (ch, followed_by_eq) {
                    ('=', true) => Ok(Token::Eq),
                    ('!', true) => Ok(Token::Ne),
                    ('!', false) => Ok(Token::Not),
                    ('<', true) => Ok(Token::Le),
                    ('<', false) => Ok(Token::Lt),
                    ('>', true) => Ok(Token::Ge),
                    ('>', false) => Ok(Token::Gt),
                    _ => Err(self.error(start, "unexpected character '=', use '=='")),
                }
            }
            '&' | '|' => {
                self.advance();
                if self.peek() == Some(ch) {
                    self.advance();
                    Ok(if ch == '&' { Token::And } else { Token::Or })
                } else {
                    Err(self.error(start, format!("unexpected character '{}'", ch)))
                }
            }
            '"' | '\'' => self.read_string(ch).map(Token::Str),
            '.' if matches!(self.peek_next(), Some(c) if c.is_ascii_digit()) => self.read_number(),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_ascii_alphabetic() || c == '_' => {
                let ident = self.read_identifier();
                let token = match ident.to_ascii_lowercase().as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    "in" => Token::In,
                    "like" => Token::Like,
                    "true" => Token::Bool(true),
                    "false" => Token::Bool(false),
                    _ => Token::Identifier(ident),
                };
                Ok(token)
            }
            other => Err(self.error(start, format!("unexpected character '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn test_comparison_tokens() {
        assert_eq!(
            tokens("int64 >= 10 && float != 1.5"),
            vec![
                Token::Identifier("int64".into()),
                Token::Ge,
                Token::Int(10),
                Token::And,
                Token::Identifier("float".into()),
                Token::Ne,
                Token::Float(1.5),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            tokens("a NOT IN [] or b Like 'x%' AND True"),
            vec![
                Token::Identifier("a".into()),
                Token::Not,
                Token::In,
                Token::LBracket,
                Token::RBracket,
                Token::Or,
                Token::Identifier("b".into()),
                Token::Like,
                Token::Str("x%".into()),
                Token::And,
                Token::Bool(true),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(tokens("1."), vec![Token::Float(1.0), Token::Eof]);
        assert_eq!(tokens("2e3"), vec![Token::Float(2000.0), Token::Eof]);
        assert_eq!(
            tokens("9223372036854775808"),
            vec![Token::Int(9223372036854775808), Token::Eof]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            tokens(r#""a\"b" 'c\'d'"#),
            vec![Token::Str("a\"b".into()), Token::Str("c'd".into()), Token::Eof]
        );
    }

    #[test]
    fn test_positions() {
        let spans = Lexer::new("int64 inn [1]").tokenize().unwrap();
        assert_eq!(spans[1].token, Token::Identifier("inn".into()));
        assert_eq!(spans[1].position, 6);
        assert_eq!(format!("{}", spans[1].token), "Identifier(\"inn\")");
    }

    #[test]
    fn test_lex_errors() {
        assert!(Lexer::new("\"open").tokenize().is_err());
        assert!(Lexer::new("a = 1").tokenize().is_err());
        assert!(Lexer::new("中文").tokenize().is_err());
        assert!(Lexer::new("12s").tokenize().is_err());
        assert!(Lexer::new("a & b").tokenize().is_err());
    }
}
