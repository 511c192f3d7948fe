//! Edge case tests for quillc-lex.
