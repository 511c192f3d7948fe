//! Analysis errors.
//!
//! Every variant is a flat message; the first error aborts analysis. The
//! AST carries no source locations, so neither do these.

use thiserror::Error;

/// Error raised by the semantic analyzer.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("'{name}' is already declared in this scope")]
    AlreadyDeclared { name: String },

    #[error("unknown type '{name}'")]
    UnknownType { name: String },

    #[error("'{name}' is not defined")]
    Undefined { name: String },

    #[error("type {found} is not a subtype of {expected}")]
    NotSubtype { found: String, expected: String },

    #[error("RETURN outside function")]
    ReturnOutsideFunction,

    #[error("duplicate parameter '{name}'")]
    DuplicateParameter { name: String },

    #[error("assignment target must be a variable or a property")]
    InvalidAssignmentTarget,

    #[error("expected an object receiver, found {found}")]
    NotObject { found: String },

    #[error("object has no member '{name}'")]
    UndefinedMember { name: String },

    #[error("'{name}' is not a function")]
    NotFunction { name: String },

    #[error("'{name}' expects {expected} argument(s), found {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("operator '{op}' cannot be applied to {left} and {right}")]
    InvalidOperands {
        op: String,
        left: String,
        right: String,
    },

    #[error("object name '{name}' is already a type")]
    ObjectNameShadowsType { name: String },
}
