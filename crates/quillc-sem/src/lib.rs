//! quillc-sem - Semantic Analyzer & Type Checker
//!
//! The third phase of the Quill pipeline: untyped AST in, typed IR out.
//! Three things happen in one walk:
//!
//! 1. NAME RESOLUTION - every identifier is resolved against the lexical
//!    scope tree; duplicate declarations and undefined names are rejected.
//! 2. TYPE INFERENCE - every expression node gets a type; `LET` without an
//!    annotation takes its initializer's type, else `Any`.
//! 3. SUBTYPE CHECKING - every assignment, argument, return, and operand
//!    position checks the fixed subtype lattice (see [`types`]).
//!
//! Scopes form an arena-backed tree ([`ScopeTree`]); object types carry the
//! [`ScopeId`] of their member scope, which is how the cyclic `this` shape
//! is represented without reference cycles. The expected return type is
//! threaded through the chain as the reserved `$RETURNS` binding.
//!
//! # Example
//!
//! ```
//! use quillc_lex::lex;
//! use quillc_par::parse;
//! use quillc_sem::{analyze, ScopeTree};
//!
//! let ast = parse(&lex("LET x = 1 + 2;").unwrap()).unwrap();
//! let mut scopes = ScopeTree::new();
//! let ir = analyze(&ast, &mut scopes).unwrap();
//! assert_eq!(ir.statements.len(), 1);
//! ```

pub mod analysis;
pub mod error;
pub mod ir;
pub mod scope;
pub mod types;

pub use analysis::analyze;
pub use error::AnalyzeError;
pub use scope::{Scope, ScopeId, ScopeTree};
pub use types::Type;
