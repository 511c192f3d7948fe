//! quillc-drv - Pipeline Driver
//!
//! Wires the four phases into one call:
//!
//! ```text
//! source string -> [lex] -> tokens -> [parse] -> AST
//!               -> [analyze] -> typed IR -> [generate] -> Java-style text
//! ```
//!
//! Each phase fully consumes its predecessor's output; the first error
//! aborts the pipeline and surfaces verbatim, wrapped in a stage-tagged
//! [`CompileError`]. The driver owns no I/O: reading sources, installing a
//! logger, and invoking the host compiler are the harness's business.
//!
//! # Example
//!
//! ```
//! use quillc_drv::compile;
//! use quillc_sem::ScopeTree;
//!
//! let mut scopes = ScopeTree::new();
//! let java = compile("LET x = 1 + 2;", &mut scopes).unwrap();
//! assert!(java.contains("static BigInteger x"));
//! ```

use log::debug;
use thiserror::Error;

use quillc_lex::LexError;
use quillc_par::ParseError;
use quillc_sem::{AnalyzeError, ScopeTree};

/// Any stage's error, tagged with the stage that raised it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("analyze error: {0}")]
    Analyze(#[from] AnalyzeError),
}

/// Runs the whole pipeline over `source`.
///
/// `scopes` supplies the root scope; the caller may pre-bind built-ins in
/// it (e.g. `log: Function([Any], Any)`) before calling. The analyzer adds
/// its own scopes to the tree but never rebinds what the caller defined.
pub fn compile(source: &str, scopes: &mut ScopeTree) -> Result<String, CompileError> {
    let tokens = quillc_lex::lex(source)?;
    debug!("lexed {} tokens", tokens.len());

    let ast = quillc_par::parse(&tokens)?;
    debug!("parsed {} statements", ast.statements.len());

    let ir = quillc_sem::analyze(&ast, scopes)?;
    debug!("analyzed {} statements", ir.statements.len());

    Ok(quillc_gen::generate(&ir))
}
