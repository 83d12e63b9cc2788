use goiferr_parser::ParseFailure;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IferrError {
    /// The source did not lex or parse; the message is `line:col: message`.
    #[error(transparent)]
    Parse(#[from] ParseFailure),

    #[error("no enclosing function at offset {offset}")]
    NotFound { offset: usize },
}
