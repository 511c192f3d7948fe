//! Parse errors.

use thiserror::Error;

/// Error raised by the parser. Fatal: the first error aborts the stage.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The current token does not fit the grammar.
    #[error("expected {expected}, found '{found}' at {line}:{column}")]
    Unexpected {
        expected: String,
        found: String,
        line: u32,
        column: u32,
    },

    /// Input ran out where the grammar required more.
    #[error("expected {expected} at end of input")]
    UnexpectedEof { expected: String },

    /// A comma directly before a closing parenthesis.
    #[error("trailing comma before ')' at {line}:{column}")]
    TrailingComma { line: u32, column: u32 },
}
