/*! Turn LOOP source text into an AST.
 *
 * The language has three statement forms (assignment, bounded `loop ... do ... end`, and `;`
 * sequencing) over natural-number expressions built from `+` and truncated `-`. Lexing is driven
 * by a small pest grammar and yields one token at a time; the parser is a hand-written recursive
 * descent over that stream with a single token of lookahead and no backtracking.
 */

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{BinaryOperator, Expr, TopLevel};
pub use error::ParseError;
pub use lexer::{KeywordCase, Lexer, LexerConfig};
pub use parser::Parser;
pub use token::{Token, TokenKind};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a whole program with the default lexer configuration.
pub fn parse_program(source: &str) -> ParseResult<TopLevel> {
    parse_program_with(source, LexerConfig::default())
}

pub fn parse_program_with(source: &str, config: LexerConfig) -> ParseResult<TopLevel> {
    Parser::new(Lexer::with_config(source, config)).parse_top_level()
}

/// True when `source` is a syntactically valid program.
pub fn check(source: &str) -> bool {
    parse_program(source).is_ok()
}
