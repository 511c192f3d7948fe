//! Token model for the Quill lexer.

use std::fmt;

use quillc_util::{Span, Symbol};

/// The lexical category of a token.
///
/// Quill keywords (`LET`, `DEF`, `IF`, ...) are lexed as ordinary
/// [`Identifier`](TokenKind::Identifier) tokens; the parser tells them
/// apart by literal. That keeps the lexer a pure character-class machine
/// with no keyword table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Name or keyword: `[A-Za-z_][A-Za-z0-9_-]*`.
    Identifier,

    /// Integer literal, possibly signed and with an exponent: `42`, `-7`, `1e3`.
    Integer,

    /// Decimal literal with a fraction: `3.14`, `-0.5e2`.
    Decimal,

    /// Character literal including its quotes: `'a'`, `'\n'`.
    Character,

    /// String literal including its quotes: `"hi"`.
    String,

    /// Operator or punctuation: `+`, `<=`, `;`, `(`, ...
    Operator,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Integer => "integer",
            TokenKind::Decimal => "decimal",
            TokenKind::Character => "character",
            TokenKind::String => "string",
            TokenKind::Operator => "operator",
        };
        f.write_str(name)
    }
}

/// A lexical unit: a kind plus the exact matched source substring.
///
/// The literal of a string or character token includes the surrounding
/// quotes and any unresolved escape sequences; concatenating the literals
/// of a token stream reproduces the source minus whitespace and comments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    /// Lexical category.
    pub kind: TokenKind,

    /// The exact matched substring, interned.
    pub literal: Symbol,

    /// Location of the literal in the source.
    pub span: Span,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, literal: Symbol, span: Span) -> Self {
        Self {
            kind,
            literal,
            span,
        }
    }

    /// Returns true if this token is an identifier with the given literal.
    ///
    /// This is how the parser recognizes keywords.
    pub fn is_keyword(&self, literal: Symbol) -> bool {
        self.kind == TokenKind::Identifier && self.literal == literal
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.literal)
    }
}
