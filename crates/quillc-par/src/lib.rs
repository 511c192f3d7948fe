//! quillc-par - Parser (Syntactic Analyzer)
//!
//! Recursive descent over the token sequence produced by `quillc-lex`,
//! yielding the untyped AST. Expressions use a fixed left-associative
//! precedence cascade:
//!
//! ```text
//! logical (AND OR)
//!   > comparison (< <= > >= == !=)
//!   > additive (+ -)
//!   > multiplicative (* /)
//!   > secondary (.name, .name(args))
//!   > primary (literal, group, object, call, variable)
//! ```
//!
//! Because Quill keywords are lexed as identifier tokens, the parser's
//! lookahead patterns match either a [`TokenKind`] or a literal string -
//! `peek`/`eat` accept both through [`Pat`].
//!
//! # Example
//!
//! ```
//! use quillc_lex::lex;
//! use quillc_par::{ast, parse};
//!
//! let tokens = lex("LET x = 1 + 2;").unwrap();
//! let source = parse(&tokens).unwrap();
//! assert!(matches!(source.statements[0], ast::Stmt::Let(_)));
//! ```

pub mod ast;
pub mod error;

mod expr;
mod stmt;

pub use error::ParseError;

use quillc_lex::{Token, TokenKind};

/// Parses a whole token sequence into a [`ast::Source`].
///
/// This is the pipeline entry point for the parsing stage.
pub fn parse(tokens: &[Token]) -> Result<ast::Source, ParseError> {
    Parser::new(tokens).source()
}

/// A lookahead pattern: either a token kind or an exact literal.
///
/// A token matches a [`Pat::Kind`] when its kind is equal, and a
/// [`Pat::Lit`] when its literal text is equal - which is how keywords
/// (identifier tokens) and punctuation (operator tokens) are recognized.
#[derive(Clone, Copy, Debug)]
pub enum Pat {
    Kind(TokenKind),
    Lit(&'static str),
}

impl Pat {
    /// Does `token` match this pattern?
    fn matches(self, token: &Token) -> bool {
        match self {
            Pat::Kind(kind) => token.kind == kind,
            Pat::Lit(literal) => token.literal.as_str() == literal,
        }
    }

    /// Human-readable form for error messages.
    fn describe(self) -> String {
        match self {
            Pat::Kind(kind) => kind.to_string(),
            Pat::Lit(literal) => format!("'{literal}'"),
        }
    }
}

impl From<TokenKind> for Pat {
    fn from(kind: TokenKind) -> Self {
        Pat::Kind(kind)
    }
}

impl From<&'static str> for Pat {
    fn from(literal: &'static str) -> Self {
        Pat::Lit(literal)
    }
}

/// Cursor over the token sequence.
pub struct Parser<'a> {
    tokens: &'a [Token],
    index: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser at the start of `tokens`.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, index: 0 }
    }

    /// Is there a token at `offset` from the cursor? `has(-1)` asks for the
    /// just-consumed token.
    fn has(&self, offset: isize) -> bool {
        self.position(offset)
            .map(|pos| pos < self.tokens.len())
            .unwrap_or(false)
    }

    /// Reads the token at `offset` without consuming. `get(-1)` retrieves
    /// the just-consumed token.
    fn get(&self, offset: isize) -> Option<&Token> {
        self.position(offset).and_then(|pos| self.tokens.get(pos))
    }

    fn position(&self, offset: isize) -> Option<usize> {
        self.index.checked_add_signed(offset)
    }

    /// The just-consumed token. Only valid after at least one `eat`.
    fn previous(&self) -> &Token {
        self.get(-1).expect("previous() called before any token was consumed")
    }

    /// Do the next tokens match `patterns`, one pattern per position?
    fn peek(&self, patterns: &[Pat]) -> bool {
        patterns.iter().enumerate().all(|(offset, pat)| {
            self.get(offset as isize)
                .map(|token| pat.matches(token))
                .unwrap_or(false)
        })
    }

    /// Like [`peek`](Self::peek), but consumes the tokens on a match.
    fn eat(&mut self, patterns: &[Pat]) -> bool {
        if self.peek(patterns) {
            self.index += patterns.len();
            true
        } else {
            false
        }
    }

    /// Single-pattern convenience for [`peek`](Self::peek).
    fn at(&self, pattern: impl Into<Pat>) -> bool {
        self.peek(&[pattern.into()])
    }

    /// Single-pattern convenience for [`eat`](Self::eat).
    fn take(&mut self, pattern: impl Into<Pat>) -> bool {
        self.eat(&[pattern.into()])
    }

    /// Consumes a token matching `pattern` or fails with a parse error.
    fn expect(&mut self, pattern: impl Into<Pat>) -> Result<&Token, ParseError> {
        let pattern = pattern.into();
        if self.eat(&[pattern]) {
            Ok(self.previous())
        } else {
            Err(self.unexpected(&pattern.describe()))
        }
    }

    /// Tries each operator literal in order, returning the matched one.
    fn take_one_of(&mut self, literals: &[&'static str]) -> Option<quillc_util::Symbol> {
        for literal in literals {
            if self.take(*literal) {
                return Some(self.previous().literal);
            }
        }
        None
    }

    /// Builds the error for a token (or end of input) that fits nothing.
    fn unexpected(&self, expected: &str) -> ParseError {
        match self.get(0) {
            Some(token) => ParseError::Unexpected {
                expected: expected.to_owned(),
                found: token.literal.as_str().to_owned(),
                line: token.span.line,
                column: token.span.column,
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_owned(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quillc_lex::lex;

    fn tokens_for(source: &str) -> Vec<Token> {
        lex(source).unwrap()
    }

    #[test]
    fn test_peek_kind_and_literal() {
        let tokens = tokens_for("LET x = 1;");
        let parser = Parser::new(&tokens);
        assert!(parser.peek(&[Pat::Lit("LET")]));
        assert!(parser.peek(&[Pat::Kind(TokenKind::Identifier)]));
        assert!(parser.peek(&[Pat::Lit("LET"), Pat::Kind(TokenKind::Identifier), Pat::Lit("=")]));
        assert!(!parser.peek(&[Pat::Lit("DEF")]));
    }

    #[test]
    fn test_eat_advances_and_previous() {
        let tokens = tokens_for("LET x");
        let mut parser = Parser::new(&tokens);
        assert!(parser.eat(&[Pat::Lit("LET")]));
        assert_eq!(parser.previous().literal.as_str(), "LET");
        assert!(parser.at(TokenKind::Identifier));
    }

    #[test]
    fn test_peek_past_end() {
        let tokens = tokens_for("x");
        let parser = Parser::new(&tokens);
        assert!(!parser.peek(&[
            Pat::Kind(TokenKind::Identifier),
            Pat::Kind(TokenKind::Identifier)
        ]));
        assert!(parser.has(0));
        assert!(!parser.has(1));
    }

    #[test]
    fn test_expect_error_reports_position() {
        let tokens = tokens_for("LET 1");
        let mut parser = Parser::new(&tokens);
        parser.take("LET");
        let err = parser.expect(TokenKind::Identifier).unwrap_err();
        assert_eq!(
            err,
            ParseError::Unexpected {
                expected: "identifier".to_owned(),
                found: "1".to_owned(),
                line: 1,
                column: 5,
            }
        );
    }

    #[test]
    fn test_expect_at_end_of_input() {
        let tokens = tokens_for("LET");
        let mut parser = Parser::new(&tokens);
        parser.take("LET");
        let err = parser.expect(TokenKind::Identifier).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }
}
