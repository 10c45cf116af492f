use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Loop,
    Do,
    End,
    Number,
    Plus,
    Minus,
    ParenOpen,
    ParenClose,
    Assign,
    Identifier,
    Separator,
    Eof,
    Invalid,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Loop => "`loop`",
            TokenKind::Do => "`do`",
            TokenKind::End => "`end`",
            TokenKind::Number => "number",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::ParenOpen => "`(`",
            TokenKind::ParenClose => "`)`",
            TokenKind::Assign => "`=`",
            TokenKind::Identifier => "identifier",
            TokenKind::Separator => "`;`",
            TokenKind::Eof => "end of input",
            TokenKind::Invalid => "invalid token",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Numeric payload; zero for everything but `Number`.
    pub int_value: u64,
    pub text: String,
    /// Byte offset of the first character in the source.
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            int_value: 0,
            text: text.into(),
            offset,
        }
    }

    pub fn number(value: u64, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind: TokenKind::Number,
            int_value: value,
            text: text.into(),
            offset,
        }
    }

    pub fn eof(offset: usize) -> Self {
        Self::new(TokenKind::Eof, "", offset)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe(&self.kind, &self.text))
    }
}

/// Token kinds that carry user text are shown with it: "identifier `foo`".
pub(crate) fn describe(kind: &TokenKind, text: &str) -> String {
    match kind {
        TokenKind::Number | TokenKind::Identifier | TokenKind::Invalid => {
            format!("{} `{}`", kind, text)
        }
        _ => kind.to_string(),
    }
}
