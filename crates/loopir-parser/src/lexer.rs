use crate::token::{Token, TokenKind};
use pest::iterators::Pairs;
use pest::Parser as _;
use pest_derive::Parser;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct TokenGrammar;

/// How `loop`, `do` and `end` are recognised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCase {
    /// `LOOP`, `Loop` and `loop` are all the keyword.
    #[default]
    Insensitive,
    /// Only the lowercase spelling is a keyword.
    Sensitive,
}

impl KeywordCase {
    pub fn keyword(&self, word: &str) -> Option<TokenKind> {
        const KEYWORDS: [(&str, TokenKind); 3] = [
            ("loop", TokenKind::Loop),
            ("do", TokenKind::Do),
            ("end", TokenKind::End),
        ];

        KEYWORDS
            .iter()
            .find(|(spelling, _)| match self {
                KeywordCase::Insensitive => spelling.eq_ignore_ascii_case(word),
                KeywordCase::Sensitive => *spelling == word,
            })
            .map(|(_, kind)| *kind)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexerConfig {
    #[serde(default)]
    pub keyword_case: KeywordCase,
}

impl LexerConfig {
    pub fn case_sensitive() -> Self {
        Self {
            keyword_case: KeywordCase::Sensitive,
        }
    }
}

/// Pulls tokens out of a source string one at a time. Once the input is exhausted every further
/// call returns an `Eof` token.
pub struct Lexer<'a> {
    source: &'a str,
    pairs: Option<Pairs<'a, Rule>>,
    pending: Option<Token>,
    config: LexerConfig,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_config(source, LexerConfig::default())
    }

    pub fn with_config(source: &'a str, config: LexerConfig) -> Self {
        let (pairs, pending) = match TokenGrammar::parse(Rule::tokens, source) {
            Ok(pairs) => (Some(pairs), None),
            Err(err) => {
                warn!(%err, "token grammar rejected input");
                (None, Some(Token::new(TokenKind::Invalid, source, 0)))
            }
        };

        Self {
            source,
            pairs,
            pending,
            config,
        }
    }

    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.pending.take() {
            return token;
        }

        let Some(pair) = self.pairs.as_mut().and_then(|pairs| pairs.next()) else {
            return Token::eof(self.source.len());
        };

        let offset = pair.as_span().start();
        let text = pair.as_str();
        let token = match pair.as_rule() {
            Rule::number => match text.parse::<u64>() {
                Ok(value) => Token::number(value, text, offset),
                Err(_) => Token::new(TokenKind::Invalid, text, offset),
            },
            Rule::word => self.classify_word(text, offset),
            Rule::plus => Token::new(TokenKind::Plus, text, offset),
            Rule::minus => Token::new(TokenKind::Minus, text, offset),
            Rule::paren_open => Token::new(TokenKind::ParenOpen, text, offset),
            Rule::paren_close => Token::new(TokenKind::ParenClose, text, offset),
            Rule::assign => Token::new(TokenKind::Assign, text, offset),
            Rule::separator => Token::new(TokenKind::Separator, text, offset),
            Rule::EOI => {
                self.pairs = None;
                Token::eof(offset)
            }
            _ => Token::new(TokenKind::Invalid, text, offset),
        };

        trace!(kind = ?token.kind, offset, "token");
        token
    }

    /// Drains the lexer, including the first `Eof`.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.is(TokenKind::Eof);
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    fn classify_word(&self, word: &str, offset: usize) -> Token {
        if let Some(kind) = self.config.keyword_case.keyword(word) {
            return Token::new(kind, word, offset);
        }

        if is_identifier(word) {
            Token::new(TokenKind::Identifier, word, offset)
        } else {
            Token::new(TokenKind::Invalid, word, offset)
        }
    }
}

/// `[a-z][a-z0-9]*`
fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {
            chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str, config: LexerConfig) -> Vec<TokenKind> {
        Lexer::with_config(source, config)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_program() {
        use TokenKind::*;
        assert_eq!(
            kinds("x = (y + 12) - 3;", LexerConfig::default()),
            vec![
                Identifier, Assign, ParenOpen, Identifier, Plus, Number, ParenClose, Minus,
                Number, Separator, Eof
            ]
        );
    }

    #[test]
    fn test_keyword_case() {
        use TokenKind::*;
        assert_eq!(
            kinds("LOOP n Do x = 1 End", LexerConfig::default()),
            vec![Loop, Identifier, Do, Identifier, Assign, Number, End, Eof]
        );
        assert_eq!(
            kinds("LOOP loop", LexerConfig::case_sensitive()),
            vec![Invalid, Loop, Eof]
        );
    }

    #[test]
    fn test_identifier_shape() {
        let tokens = Lexer::new("ab12 Ab x_").tokenize();
        let pairs: Vec<(TokenKind, &str)> =
            tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();

        assert_eq!(
            pairs,
            vec![
                (TokenKind::Identifier, "ab12"),
                (TokenKind::Invalid, "Ab"),
                (TokenKind::Identifier, "x"),
                (TokenKind::Invalid, "_"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_number_payload_and_offsets() {
        let tokens = Lexer::new("  42\n+ 7").tokenize();

        assert_eq!(tokens[0].int_value, 42);
        assert_eq!(tokens[0].offset, 2);
        assert_eq!(tokens[1].offset, 5);
        assert_eq!(tokens[2].int_value, 7);
        assert_eq!(tokens[3], Token::eof(8));
    }

    #[test]
    fn test_number_overflow_is_invalid() {
        let tokens = Lexer::new("99999999999999999999999").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(tokens[0].int_value, 0);
    }

    #[test]
    fn test_eof_repeats() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
        for _ in 0..3 {
            assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kinds("", LexerConfig::default()), vec![TokenKind::Eof]);
        assert_eq!(kinds(" \n\t ", LexerConfig::default()), vec![TokenKind::Eof]);
    }
}
