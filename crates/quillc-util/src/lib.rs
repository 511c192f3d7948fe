//! quillc-util - Core Utilities and Foundation Types
//!
//! This crate provides the fundamental types shared by every phase of the
//! Quill compiler:
//!
//! - [`Span`] - source location tracking for tokens and errors
//! - [`Symbol`] - interned string handles for identifiers and literals
//! - [`IndexVec`] / [`Idx`] - typed-index arenas (the scope tree is built
//!   on these)
//!
//! The utilities are deliberately small: each phase crate depends on this
//! one and nothing here depends on any phase.

pub mod index_vec;
pub mod span;
pub mod symbol;

pub use index_vec::{Idx, IndexVec};
pub use span::Span;
pub use symbol::{kw, Symbol};

pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
