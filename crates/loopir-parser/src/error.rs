use crate::token::{describe, Token, TokenKind};
use thiserror::Error;

/// The current token could not start or continue the production being parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error at offset {offset}: expected {expected}, found {}", describe(.actual, .text))]
pub struct ParseError {
    pub expected: String,
    pub actual: TokenKind,
    pub text: String,
    pub offset: usize,
}

impl ParseError {
    pub fn unexpected(expected: impl Into<String>, found: &Token) -> Self {
        Self {
            expected: expected.into(),
            actual: found.kind,
            text: found.text.clone(),
            offset: found.offset,
        }
    }
}
