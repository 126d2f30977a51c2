// ABOUTME: Parser and evaluator for backend filter expressions (`status = "DRAFT" && user = "x"`)
// ABOUTME: Used by the in-memory store; also provides literal quoting for filter builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Filter Expressions
//!
//! Grammar (operator precedence: `&&` binds tighter than `||`):
//!
//! ```text
//! expr       := and_expr ( "||" and_expr )*
//! and_expr   := primary ( "&&" primary )*
//! primary    := "(" expr ")" | comparison
//! comparison := field op literal
//! op         := "=" | "!=" | "~" | "!~" | ">" | ">=" | "<" | "<="
//! literal    := "string" | 'string' | number | true | false | null
//! ```
//!
//! Missing fields and `null` compare equal to the empty string, matching the
//! hosted backend.

use serde_json::{Map, Value};
use std::cmp::Ordering;

use super::BackendError;

/// Quote a value for safe interpolation into a filter expression
#[must_use]
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `~` case-insensitive contains
    Like,
    /// `!~`
    NotLike,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
}

/// Parsed filter expression
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Both sides must match
    And(Box<Filter>, Box<Filter>),
    /// Either side must match
    Or(Box<Filter>, Box<Filter>),
    /// `field op literal`
    Compare {
        /// Record field name
        field: String,
        /// Operator
        op: Operator,
        /// Literal right-hand side
        value: Value,
    },
}

impl Filter {
    /// Parse a filter expression
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidFilter` when the expression is malformed.
    pub fn parse(input: &str) -> Result<Self, BackendError> {
        let tokens = tokenize(input)?;
        let mut parser = Parser { tokens, pos: 0 };
        let filter = parser.parse_or()?;
        if parser.pos != parser.tokens.len() {
            return Err(BackendError::InvalidFilter(format!(
                "unexpected trailing input in `{input}`"
            )));
        }
        Ok(filter)
    }

    /// Evaluate against a record's fields
    #[must_use]
    pub fn matches(&self, record: &Map<String, Value>) -> bool {
        match self {
            Self::And(left, right) => left.matches(record) && right.matches(record),
            Self::Or(left, right) => left.matches(record) || right.matches(record),
            Self::Compare { field, op, value } => {
                compare(record.get(field).unwrap_or(&Value::Null), *op, value)
            }
        }
    }
}

fn compare(actual: &Value, op: Operator, expected: &Value) -> bool {
    match op {
        Operator::Eq => loose_eq(actual, expected),
        Operator::NotEq => !loose_eq(actual, expected),
        Operator::Like => contains(actual, expected),
        Operator::NotLike => !contains(actual, expected),
        Operator::Gt => order(actual, expected) == Some(Ordering::Greater),
        Operator::Gte => matches!(
            order(actual, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::Lt => order(actual, expected) == Some(Ordering::Less),
        Operator::Lte => matches!(
            order(actual, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn loose_eq(actual: &Value, expected: &Value) -> bool {
    if is_blank(actual) || is_blank(expected) {
        return is_blank(actual) && is_blank(expected);
    }
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(items), other) => items.iter().any(|item| loose_eq(item, other)),
        (a, b) => text(a) == text(b),
    }
}

fn contains(actual: &Value, expected: &Value) -> bool {
    let needle = text(expected).to_lowercase();
    text(actual).to_lowercase().contains(&needle)
}

/// Ordering used by comparisons and sorting; `None` when incomparable
pub(crate) fn order(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) => Some(Ordering::Less),
        (_, Value::Null) => Some(Ordering::Greater),
        (x, y) => Some(text(x).cmp(&text(y))),
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Literal(Value),
    Op(Operator),
    And,
    Or,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, BackendError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '&' | '|' => {
                if chars.get(i + 1) != Some(&c) {
                    return Err(invalid(input, i));
                }
                tokens.push(if c == '&' { Token::And } else { Token::Or });
                i += 2;
            }
            '"' | '\'' => {
                let (literal, next) = read_string(&chars, i, input)?;
                tokens.push(Token::Literal(Value::String(literal)));
                i = next;
            }
            '=' => {
                tokens.push(Token::Op(Operator::Eq));
                i += 1;
            }
            '~' => {
                tokens.push(Token::Op(Operator::Like));
                i += 1;
            }
            '!' => {
                let op = match chars.get(i + 1) {
                    Some('=') => Operator::NotEq,
                    Some('~') => Operator::NotLike,
                    _ => return Err(invalid(input, i)),
                };
                tokens.push(Token::Op(op));
                i += 2;
            }
            '>' | '<' => {
                let inclusive = chars.get(i + 1) == Some(&'=');
                let op = match (c, inclusive) {
                    ('>', false) => Operator::Gt,
                    ('>', true) => Operator::Gte,
                    ('<', false) => Operator::Lt,
                    _ => Operator::Lte,
                };
                tokens.push(Token::Op(op));
                i += if inclusive { 2 } else { 1 };
            }
            c if c.is_ascii_digit() || c == '-' => {
                let start = i;
                i += 1;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let raw: String = chars[start..i].iter().collect();
                let number: serde_json::Number = raw
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .ok_or_else(|| invalid(input, start))?;
                tokens.push(Token::Literal(Value::Number(number)));
            }
            c if c.is_alphanumeric() || c == '_' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '.')
                {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                tokens.push(match word.as_str() {
                    "true" => Token::Literal(Value::Bool(true)),
                    "false" => Token::Literal(Value::Bool(false)),
                    "null" => Token::Literal(Value::Null),
                    _ => Token::Ident(word),
                });
            }
            _ => return Err(invalid(input, i)),
        }
    }

    Ok(tokens)
}

fn read_string(chars: &[char], start: usize, input: &str) -> Result<(String, usize), BackendError> {
    let quote_char = chars[start];
    let mut literal = String::new();
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                literal.push(chars[i + 1]);
                i += 2;
            }
            c if c == quote_char => return Ok((literal, i + 1)),
            c => {
                literal.push(c);
                i += 1;
            }
        }
    }
    Err(BackendError::InvalidFilter(format!(
        "unterminated string in `{input}`"
    )))
}

fn invalid(input: &str, at: usize) -> BackendError {
    BackendError::InvalidFilter(format!("unexpected character at {at} in `{input}`"))
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn parse_or(&mut self) -> Result<Filter, BackendError> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let right = self.parse_and()?;
            left = Filter::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Filter, BackendError> {
        let mut left = self.parse_primary()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let right = self.parse_primary()?;
            left = Filter::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Filter, BackendError> {
        match self.next() {
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(BackendError::InvalidFilter("missing `)`".to_owned())),
                }
            }
            Some(Token::Ident(field)) => {
                let Some(Token::Op(op)) = self.next() else {
                    return Err(BackendError::InvalidFilter(format!(
                        "expected operator after `{field}`"
                    )));
                };
                let Some(Token::Literal(value)) = self.next() else {
                    return Err(BackendError::InvalidFilter(format!(
                        "expected literal after `{field}`"
                    )));
                };
                Ok(Filter::Compare { field, op, value })
            }
            other => Err(BackendError::InvalidFilter(format!(
                "unexpected token {other:?}"
            ))),
        }
    }
}
