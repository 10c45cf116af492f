use crate::ast::{BinaryOperator, Expr, TopLevel};
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use crate::ParseResult;
use tracing::{debug, trace};

/// Recursive-descent parser with one token of lookahead.
///
/// ```text
/// expression := (assignment | loop) (';' expression)?
/// assignment := identifier '=' value
/// loop       := 'loop' value 'do' expression 'end'
/// value      := term (('+' | '-') term)*
/// term       := number | identifier | '(' value ')'
/// ```
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let current = lexer.next_token();
        Self { lexer, current }
    }

    /// Parses a whole program. Anything left after the expression is an error.
    pub fn parse_top_level(&mut self) -> ParseResult<TopLevel> {
        let body = self.parse_expression()?;
        if !self.current.is(TokenKind::Eof) {
            return Err(self.error("end of input"));
        }

        debug!(program = %body, "parsed top-level unit");
        Ok(TopLevel::new(body))
    }

    /// Statements separated by `;` are collected in a loop and folded into a right-nested
    /// `Sequence` chain, so long programs do not grow the call stack.
    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        let mut statements = vec![self.parse_statement()?];
        let mut trailing_separator = false;

        while self.current.is(TokenKind::Separator) {
            self.eat();
            if self.current.is(TokenKind::Eof) {
                trace!("trailing separator");
                trailing_separator = true;
                break;
            }
            statements.push(self.parse_statement()?);
        }

        let mut folded: Option<Expr> = None;
        for statement in statements.into_iter().rev() {
            folded = Some(match folded {
                Some(rest) => Expr::sequence(statement, Some(rest)),
                None if trailing_separator => Expr::sequence(statement, None),
                None => statement,
            });
        }
        folded.ok_or_else(|| self.error("expression"))
    }

    fn parse_statement(&mut self) -> ParseResult<Expr> {
        match self.current.kind {
            TokenKind::Loop => self.parse_loop(),
            TokenKind::Identifier => self.parse_assignment(),
            _ => Err(self.error("expression")),
        }
    }

    fn parse_assignment(&mut self) -> ParseResult<Expr> {
        let target = self.expect(TokenKind::Identifier, "identifier")?;
        self.expect(TokenKind::Assign, "`=`")?;
        let value = self.parse_value()?;
        Ok(Expr::assign(target.text, value))
    }

    fn parse_loop(&mut self) -> ParseResult<Expr> {
        self.expect(TokenKind::Loop, "`loop`")?;
        let count = self.parse_value()?;
        self.expect(TokenKind::Do, "`do`")?;
        let body = self.parse_expression()?;
        self.expect(TokenKind::End, "`end`")?;
        Ok(Expr::looped(count, body))
    }

    /// Folds `term (op term)*` to the left so `a - b - c` is `(a - b) - c`.
    fn parse_value(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_term()?;

        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOperator::Plus,
                TokenKind::Minus => BinaryOperator::Minus,
                _ => return Ok(lhs),
            };
            self.eat();
            let rhs = self.parse_term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        match self.current.kind {
            TokenKind::Number => Ok(Expr::Number(self.eat().int_value)),
            TokenKind::Identifier => Ok(Expr::Identifier(self.eat().text)),
            TokenKind::ParenOpen => {
                self.eat();
                let inner = self.parse_value()?;
                self.expect(TokenKind::ParenClose, "`)`")?;
                Ok(inner)
            }
            _ => Err(self.error("term")),
        }
    }

    fn eat(&mut self) -> Token {
        let next = self.lexer.next_token();
        std::mem::replace(&mut self.current, next)
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<Token> {
        if self.current.is(kind) {
            Ok(self.eat())
        } else {
            Err(self.error(expected))
        }
    }

    fn error(&self, expected: &str) -> ParseError {
        debug!(expected, found = %self.current, offset = self.current.offset, "syntax error");
        ParseError::unexpected(expected, &self.current)
    }
}
