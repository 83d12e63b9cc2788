use std::fmt;

use thiserror::Error;

/// Compact byte-span used across the front end.
///
/// Offsets are `u32`; inputs larger than 4GiB are clamped rather than
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32, // exclusive
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        let s = if start > u32::MAX as usize {
            u32::MAX
        } else {
            start as u32
        };
        let e = if end > u32::MAX as usize {
            u32::MAX
        } else {
            end as u32
        };
        Self { start: s, end: e }
    }

    #[inline]
    pub const fn empty_at(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub const fn from_range(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub const fn to(self, other: Span) -> Span {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Span { start, end }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inclusive on both ends: the offset just past the last byte counts.
    #[inline]
    pub const fn contains_inclusive(&self, offset: usize) -> bool {
        offset >= self.start as usize && offset <= self.end as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    Lex,
    Parse,
}

/// 1-based line/column pair, columns counted in bytes like `go/scanner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    pub fn of(src: &str, offset: u32) -> Self {
        let offset = (offset as usize).min(src.len());
        let before = &src.as_bytes()[..offset];
        let line = memchr::memchr_iter(b'\n', before).count() as u32 + 1;
        let line_start = memchr::memrchr(b'\n', before).map_or(0, |i| i + 1);
        Self {
            line,
            col: (offset - line_start) as u32 + 1,
        }
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub kind: DiagKind,
    pub span: Span,
    pub message: String,
}

impl Diag {
    pub fn parse(span: Span, message: impl Into<String>) -> Self {
        Self {
            kind: DiagKind::Parse,
            span,
            message: message.into(),
        }
    }
}

/// A diagnostic anchored to its line/column in the source it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub at: LineCol,
    pub diag: Diag,
}

impl fmt::Display for Located {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.at, self.diag.message)
    }
}

/// Every diagnostic collected while parsing one unit. Never empty.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", render(.diags))]
pub struct ParseFailure {
    pub diags: Vec<Located>,
}

impl ParseFailure {
    pub fn new(src: &str, diags: Vec<Diag>) -> Self {
        debug_assert!(!diags.is_empty());
        let diags = diags
            .into_iter()
            .map(|diag| Located {
                at: LineCol::of(src, diag.span.start),
                diag,
            })
            .collect();
        Self { diags }
    }

    /// The diagnostic reported first (lexer diagnostics sort before the
    /// syntax error they usually cause).
    pub fn first(&self) -> Option<&Located> {
        self.diags.first()
    }
}

fn render(diags: &[Located]) -> String {
    match diags {
        [] => "parse failed".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more errors)", rest.len()),
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid numeric literal")]
    InvalidNumber,
    #[error("invalid escape")]
    InvalidEscape,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Default)]
#[error("{kind}: {span:?}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    #[inline]
    pub fn diag(&self) -> Diag {
        Diag {
            kind: DiagKind::Lex,
            span: self.span,
            message: self.kind.to_string(),
        }
    }
}
