//! Error-check snippets for Go.
//!
//! Given Go source and a cursor byte offset, finds the innermost function
//! (declared or literal) around the cursor and renders
//!
//! ```text
//! if err != nil {
//! 	return <zero values>, err
//! }
//! ```
//!
//! for its result list.
//!
//! ```
//! use goiferr::{iferr, NoopSink, SnippetOptions};
//!
//! let src = "package p\n\nfunc f() (*T, error) {\n\treturn nil, nil\n}\n";
//! let out = iferr(src, 30, &SnippetOptions::default(), &NoopSink).unwrap();
//! assert_eq!(out, "if err != nil {\n\treturn nil, err\n}\n");
//! ```

pub mod error;
pub mod locate;
pub mod sink;
pub mod synth;
pub mod types;

pub use error::IferrError;
pub use goiferr_parser::{ParseFailure, Span};
pub use locate::{locate, locate_in, FunctionSpan, ANONYMOUS};
pub use sink::{DiagnosticSink, NoopSink, TracingSink};
pub use synth::{synthesize, zero_value, SnippetOptions};
pub use types::{ChanDir, StructField, TypeExpr};

/// Locates the function enclosing `offset` and renders its snippet.
pub fn iferr(
    source: &str,
    offset: usize,
    opts: &SnippetOptions,
    sink: &dyn DiagnosticSink,
) -> Result<String, IferrError> {
    let func = locate(source, offset, sink)?;
    sink.debug(format_args!(
        "{} returns {} value(s)",
        func,
        func.results.len()
    ));
    Ok(synthesize(&func.results, opts, sink))
}
