//! Go lexer and parser.
//!
//! - The lexer is built on Logos and implements Go's semicolon insertion.
//! - The parser is recursive descent over the token stream and produces an
//!   arena-allocated syntax tree ([`ast`]) with byte spans on every node.
//!
//! ```
//! let parsed = goiferr_parser::parse_source("package p\n\nfunc f() error { return nil }\n").unwrap();
//! assert_eq!(parsed.package(), "p");
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
mod parser_support;
pub mod walk;

pub use error::{LineCol, ParseFailure, Span};
pub use lexer::{Lexer, Tok};
pub use parser::{ParsedFile, MAX_NEST_LEV, MAX_TREE_DEPTH};
pub use walk::{Flow, Visitor};

/// Lexes and parses one Go source file.
///
/// Lexical errors are all reported together; otherwise the first syntax
/// error ends the parse.
pub fn parse_source(src: &str) -> Result<ParsedFile<'_>, ParseFailure> {
    let mut lexer = Lexer::new(src);
    let toks: Vec<_> = lexer.by_ref().collect();
    let lex_diags = lexer.take_diags();
    if !lex_diags.is_empty() {
        return Err(ParseFailure::new(src, lex_diags));
    }

    parser::Parser::new(src, toks)
        .parse_file()
        .map_err(|diag| ParseFailure::new(src, vec![diag]))
}
