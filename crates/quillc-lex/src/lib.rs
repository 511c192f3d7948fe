//! quillc-lex - Lexical Analyzer
//!
//! The first phase of the Quill pipeline: source text in, flat token
//! sequence out. The lexer is driven by single-character class checks
//! (whitespace, identifier, digit, sign, comment prefix, quote, operator)
//! and emits tokens whose literals are exact source substrings, so the
//! concatenation of all literals reproduces the source minus whitespace
//! and comments.
//!
//! Quill has no keyword tokens: `LET`, `DEF`, and the rest lex as
//! identifiers and the parser distinguishes them by literal.
//!
//! # Example
//!
//! ```
//! use quillc_lex::{lex, TokenKind};
//!
//! let tokens = lex("LET greeting = \"hi\";").unwrap();
//! let literals: Vec<_> = tokens.iter().map(|t| t.literal.as_str()).collect();
//! assert_eq!(literals, ["LET", "greeting", "=", "\"hi\"", ";"]);
//! assert_eq!(tokens[3].kind, TokenKind::String);
//! ```

pub mod cursor;
pub mod lexer;
pub mod token;

mod edge_cases;

pub use cursor::Cursor;
pub use lexer::{lex, LexError, Lexer};
pub use token::{Token, TokenKind};
