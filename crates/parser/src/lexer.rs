use crate::error::{Diag, LexError, LexErrorKind, Span};
use logos::{Lexer as LogosLexer, Logos};
use std::fmt;
use std::ops::Range;

// =============================================================================
// 0. Shared helpers
// =============================================================================

#[inline(always)]
fn first_newline_offset(s: &str) -> Option<usize> {
    memchr::memchr2(b'\n', b'\r', s.as_bytes())
}

#[inline(always)]
const fn is_dec_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

#[inline(always)]
const fn digit_value(b: u8) -> u32 {
    match b {
        b'0'..=b'9' => (b - b'0') as u32,
        b'a'..=b'f' => (b - b'a') as u32 + 10,
        b'A'..=b'F' => (b - b'A') as u32 + 10,
        _ => u32::MAX,
    }
}

#[inline(always)]
const fn is_valid_unicode_scalar(x: u32) -> bool {
    x <= 0x10_FFFF && !(x >= 0xD800 && x <= 0xDFFF)
}

// =============================================================================
// 1. Block comment scanner
// =============================================================================

fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder().as_bytes();
    let mut from = 0;

    while let Some(star) = memchr::memchr(b'*', &rem[from..]) {
        let at = from + star;
        if rem.get(at + 1) == Some(&b'/') {
            lex.bump(at + 2);
            return Ok(());
        }
        from = at + 1;
    }

    lex.bump(rem.len());
    Err(LexErrorKind::UnterminatedComment)
}

// =============================================================================
// 2. Escapes, strings and runes
// =============================================================================

mod esc {
    use super::*;

    /// Validates one escape sequence starting at the backslash `body[i]`.
    /// Returns the index just past the escape.
    pub fn scan_escape(body: &[u8], i: usize, quote: u8) -> Result<usize, LexErrorKind> {
        let Some(&c) = body.get(i + 1) else {
            return Err(LexErrorKind::InvalidEscape);
        };

        let (digits, base, max) = match c {
            b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'\\' => return Ok(i + 2),
            _ if c == quote => return Ok(i + 2),
            b'0'..=b'7' => (3usize, 8u32, 255u32),
            b'x' => (2, 16, 255),
            b'u' => (4, 16, 0x10_FFFF),
            b'U' => (8, 16, 0x10_FFFF),
            _ => return Err(LexErrorKind::InvalidEscape),
        };

        let first = if base == 8 { i + 1 } else { i + 2 };
        let mut value = 0u32;
        for k in 0..digits {
            let d = body
                .get(first + k)
                .map_or(u32::MAX, |&b| digit_value(b));
            if d >= base {
                return Err(LexErrorKind::InvalidEscape);
            }
            value = value * base + d;
        }

        let unicode = matches!(c, b'u' | b'U');
        if value > max || (unicode && !is_valid_unicode_scalar(value)) {
            return Err(LexErrorKind::InvalidEscape);
        }
        Ok(first + digits)
    }

    pub fn validate_interpreted_string(
        lex: &mut LogosLexer<'_, super::RawTok>,
    ) -> Result<(), LexErrorKind> {
        let s = lex.slice().as_bytes();
        let body = &s[1..s.len() - 1];

        let mut i = 0;
        while let Some(off) = memchr::memchr(b'\\', &body[i..]) {
            i = scan_escape(body, i + off, b'"')?;
        }
        Ok(())
    }

    pub fn validate_rune(lex: &mut LogosLexer<'_, super::RawTok>) -> Result<(), LexErrorKind> {
        let s = lex.slice();
        let body = &s[1..s.len() - 1];

        if body.starts_with('\\') {
            return match scan_escape(body.as_bytes(), 0, b'\'')? {
                end if end == body.len() => Ok(()),
                _ => Err(LexErrorKind::InvalidToken),
            };
        }

        let mut chars = body.chars();
        match (chars.next(), chars.next()) {
            (Some(_), None) => Ok(()),
            _ => Err(LexErrorKind::InvalidToken),
        }
    }
}

// =============================================================================
// 3. Numbers: maximal munch in the callback, classification in the wrapper
// =============================================================================

pub mod num {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum NumKind {
        Int,
        Float,
        Imag,
    }

    /// Logos callback: extend the number token to its maximal munch.
    ///
    /// Digits of the wrong base (`0b2`, `09`) stay in one token and are
    /// rejected by [`classify_number`].
    pub fn lex_number(lex: &mut LogosLexer<'_, super::RawTok>) -> Result<(), LexErrorKind> {
        let src = lex.source().as_bytes();
        let start = lex.span().start;
        let n = src.len();

        let hex = src[start] == b'0' && matches!(src.get(start + 1), Some(b'x' | b'X'));
        let mut seen_dot = src[start] == b'.';
        let mut i = start + 1;

        while i < n {
            let b = src[i];
            match b {
                b'.' => {
                    // don't steal ".." / "..."
                    if seen_dot || src.get(i + 1) == Some(&b'.') {
                        break;
                    }
                    seen_dot = true;
                    i += 1;
                }
                b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                    let exponent = if hex {
                        matches!(b, b'p' | b'P')
                    } else {
                        matches!(b, b'e' | b'E')
                    };
                    i += 1;
                    if exponent && matches!(src.get(i), Some(b'+' | b'-')) {
                        i += 1;
                    }
                }
                _ => break,
            }
        }

        let already = lex.span().end;
        if i > already {
            lex.bump(i - already);
        }
        Ok(())
    }

    /// Classifies a complete numeric literal following the Go spec rules.
    pub fn classify_number(text: &str) -> Result<NumKind, LexErrorKind> {
        let (body, imag) = match text.strip_suffix('i') {
            Some(body) => (body, true),
            None => (text, false),
        };
        let bytes = body.as_bytes();

        let (base, digits_from) = match bytes {
            [b'0', b'x' | b'X', ..] => (16, 2),
            [b'0', b'b' | b'B', ..] => (2, 2),
            [b'0', b'o' | b'O', ..] => (8, 2),
            _ => (10, 0),
        };

        let exp_marker = |b: u8| {
            if base == 16 {
                matches!(b, b'p' | b'P')
            } else {
                base == 10 && matches!(b, b'e' | b'E')
            }
        };

        let rest = &bytes[digits_from..];
        let exp_at = rest.iter().position(|&b| exp_marker(b));
        let (mantissa, exponent) = match exp_at {
            Some(at) => (&rest[..at], Some(&rest[at + 1..])),
            None => (rest, None),
        };

        let has_dot = mantissa.contains(&b'.');
        let is_float = has_dot || exponent.is_some();
        if is_float && !matches!(base, 10 | 16) {
            return Err(LexErrorKind::InvalidNumber);
        }
        if base == 16 && has_dot && exponent.is_none() {
            return Err(LexErrorKind::InvalidNumber);
        }

        // Legacy octal `0755` checks its digits unless the literal is a float.
        let digit_base = if base == 10 && !is_float && bytes.len() > 1 && bytes[0] == b'0' {
            8
        } else {
            base
        };

        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Prev {
            Start,
            Prefix,
            Digit,
            Underscore,
            Dot,
        }

        // '_' only separates digits (or follows a base prefix).
        let mut prev = if digits_from > 0 { Prev::Prefix } else { Prev::Start };
        let mut any_digit = false;
        for &b in mantissa {
            prev = match (b, prev) {
                (b'_', Prev::Digit | Prev::Prefix) => Prev::Underscore,
                (b'_', _) => return Err(LexErrorKind::InvalidNumber),
                (b'.', Prev::Underscore) => return Err(LexErrorKind::InvalidNumber),
                (b'.', _) => Prev::Dot,
                _ if digit_value(b) < digit_base => {
                    any_digit = true;
                    Prev::Digit
                }
                _ => return Err(LexErrorKind::InvalidNumber),
            };
        }
        if !any_digit || prev == Prev::Underscore {
            return Err(LexErrorKind::InvalidNumber);
        }

        if let Some(exp) = exponent {
            let exp = exp.strip_prefix(b"+").or_else(|| exp.strip_prefix(b"-")).unwrap_or(exp);
            let ok = !exp.is_empty()
                && is_dec_digit(exp[0])
                && is_dec_digit(exp[exp.len() - 1])
                && exp.iter().all(|&b| is_dec_digit(b) || b == b'_')
                && !exp.windows(2).any(|w| w == b"__");
            if !ok {
                return Err(LexErrorKind::InvalidNumber);
            }
        }

        Ok(match (imag, is_float) {
            (true, _) => NumKind::Imag,
            (false, true) => NumKind::Float,
            (false, false) => NumKind::Int,
        })
    }
}

// =============================================================================
// 4. Raw token definition (Logos DFA)
// =============================================================================

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\f]+")]
#[rustfmt::skip]
enum RawTok {
    #[token("\u{FEFF}")] Bom,

    // Trivia
    #[regex(r"\r\n|\n|\r")] Newline,
    #[regex(r"//[^\n\r]*", logos::skip, allow_greedy = true)] _LineComment,
    #[token("/*", lex_block_comment)] BlockComment,

    // Keywords (before Ident)
    #[token("break")] KwBreak,
    #[token("case")] KwCase,
    #[token("chan")] KwChan,
    #[token("const")] KwConst,
    #[token("continue")] KwContinue,
    #[token("default")] KwDefault,
    #[token("defer")] KwDefer,
    #[token("else")] KwElse,
    #[token("fallthrough")] KwFallthrough,
    #[token("for")] KwFor,
    #[token("func")] KwFunc,
    #[token("go")] KwGo,
    #[token("goto")] KwGoto,
    #[token("if")] KwIf,
    #[token("import")] KwImport,
    #[token("interface")] KwInterface,
    #[token("map")] KwMap,
    #[token("package")] KwPackage,
    #[token("range")] KwRange,
    #[token("return")] KwReturn,
    #[token("select")] KwSelect,
    #[token("struct")] KwStruct,
    #[token("switch")] KwSwitch,
    #[token("type")] KwType,
    #[token("var")] KwVar,

    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")] Ident,

    #[regex(r"[0-9]|\.[0-9]", num::lex_number)] Number,

    #[regex(r"`[^`]*`")] RawString,
    #[regex(r#""([^"\\\n\r]|\\.)*""#, esc::validate_interpreted_string)] String,
    #[regex(r"'([^'\\\n\r]|\\.)+'", esc::validate_rune)] Rune,

    // Operators
    #[token("...")] Ellipsis,
    #[token("<<=")] ShlAssign,
    #[token(">>=")] ShrAssign,
    #[token("&^=")] AndNotAssign,
    #[token("+=")] AddAssign,
    #[token("-=")] SubAssign,
    #[token("*=")] MulAssign,
    #[token("/=")] DivAssign,
    #[token("%=")] ModAssign,
    #[token("&=")] AndAssign,
    #[token("|=")] OrAssign,
    #[token("^=")] XorAssign,
    #[token("<<")] Shl,
    #[token(">>")] Shr,
    #[token("&^")] AndNot,
    #[token("&&")] LAnd,
    #[token("||")] LOr,
    #[token("==")] EqEq,
    #[token("!=")] NotEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("++")] Inc,
    #[token("--")] Dec,
    #[token(":=")] Define,
    #[token("<-")] Arrow,
    #[token("=")] Assign,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("~")] Tilde,
    #[token("!")] Bang,
    #[token("<")] Lt,
    #[token(">")] Gt,

    // Delimiters
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("[")] LBrack,
    #[token("]")] RBrack,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token(",")] Comma,
    #[token(";")] Semi,
    #[token(":")] Colon,
    #[token(".")] Dot,

    // Catch-all (lowest priority)
    #[regex(r".", priority = 0)] Error,
}

impl RawTok {
    #[inline(always)]
    const fn can_insert_semicolon(self) -> bool {
        matches!(
            self,
            Self::Ident
                | Self::Number
                | Self::Rune
                | Self::String
                | Self::RawString
                | Self::KwBreak
                | Self::KwContinue
                | Self::KwFallthrough
                | Self::KwReturn
                | Self::Inc
                | Self::Dec
                | Self::RParen
                | Self::RBrack
                | Self::RBrace
        )
    }

    #[rustfmt::skip]
    fn to_token(self, slice: &str) -> Tok<'_> {
        macro_rules! same_name {
            ($($v:ident),* $(,)?) => {
                match self {
                    Self::Ident => Tok::Ident(slice),
                    Self::Rune => Tok::RuneLit(slice),
                    Self::String => Tok::StringLit(slice),
                    Self::RawString => Tok::RawStringLit(slice),
                    $(Self::$v => Tok::$v,)*
                    // Numbers and trivia are handled by the wrapper.
                    Self::Number | Self::Bom | Self::Newline | Self::_LineComment
                    | Self::BlockComment | Self::Error => Tok::Error,
                }
            };
        }

        same_name! {
            KwBreak, KwCase, KwChan, KwConst, KwContinue, KwDefault, KwDefer, KwElse,
            KwFallthrough, KwFor, KwFunc, KwGo, KwGoto, KwIf, KwImport, KwInterface,
            KwMap, KwPackage, KwRange, KwReturn, KwSelect, KwStruct, KwSwitch, KwType, KwVar,

            Ellipsis, ShlAssign, ShrAssign, AndNotAssign, AddAssign, SubAssign, MulAssign,
            DivAssign, ModAssign, AndAssign, OrAssign, XorAssign, Shl, Shr, AndNot, LAnd, LOr,
            EqEq, NotEq, Le, Ge, Inc, Dec, Define, Arrow, Assign, Plus, Minus, Star, Slash,
            Percent, Amp, Pipe, Caret, Tilde, Bang, Lt, Gt,

            LParen, RParen, LBrack, RBrack, LBrace, RBrace, Comma, Semi, Colon, Dot,
        }
    }
}

// =============================================================================
// 5. Public token definition (zero-copy)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tok<'input> {
    Ident(&'input str),
    IntLit(&'input str),
    FloatLit(&'input str),
    ImagLit(&'input str),
    RuneLit(&'input str),
    StringLit(&'input str),
    RawStringLit(&'input str),

    // Keywords
    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,

    // Operators / Delimiters
    Ellipsis,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    Shl,
    Shr,
    AndNot,
    LAnd,
    LOr,
    EqEq,
    NotEq,
    Le,
    Ge,
    Inc,
    Dec,
    Define,
    Arrow,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Lt,
    Gt,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Colon,
    Dot,

    Error,
}

impl Tok<'_> {
    /// Source spelling for fixed tokens, `None` for literals and identifiers.
    #[rustfmt::skip]
    pub const fn spelling(&self) -> Option<&'static str> {
        Some(match self {
            Tok::Ident(_) | Tok::IntLit(_) | Tok::FloatLit(_) | Tok::ImagLit(_)
            | Tok::RuneLit(_) | Tok::StringLit(_) | Tok::RawStringLit(_) | Tok::Error => return None,

            Tok::KwBreak => "break", Tok::KwCase => "case", Tok::KwChan => "chan",
            Tok::KwConst => "const", Tok::KwContinue => "continue", Tok::KwDefault => "default",
            Tok::KwDefer => "defer", Tok::KwElse => "else", Tok::KwFallthrough => "fallthrough",
            Tok::KwFor => "for", Tok::KwFunc => "func", Tok::KwGo => "go", Tok::KwGoto => "goto",
            Tok::KwIf => "if", Tok::KwImport => "import", Tok::KwInterface => "interface",
            Tok::KwMap => "map", Tok::KwPackage => "package", Tok::KwRange => "range",
            Tok::KwReturn => "return", Tok::KwSelect => "select", Tok::KwStruct => "struct",
            Tok::KwSwitch => "switch", Tok::KwType => "type", Tok::KwVar => "var",

            Tok::Ellipsis => "...", Tok::ShlAssign => "<<=", Tok::ShrAssign => ">>=",
            Tok::AndNotAssign => "&^=", Tok::AddAssign => "+=", Tok::SubAssign => "-=",
            Tok::MulAssign => "*=", Tok::DivAssign => "/=", Tok::ModAssign => "%=",
            Tok::AndAssign => "&=", Tok::OrAssign => "|=", Tok::XorAssign => "^=",
            Tok::Shl => "<<", Tok::Shr => ">>", Tok::AndNot => "&^", Tok::LAnd => "&&",
            Tok::LOr => "||", Tok::EqEq => "==", Tok::NotEq => "!=", Tok::Le => "<=",
            Tok::Ge => ">=", Tok::Inc => "++", Tok::Dec => "--", Tok::Define => ":=",
            Tok::Arrow => "<-", Tok::Assign => "=", Tok::Plus => "+", Tok::Minus => "-",
            Tok::Star => "*", Tok::Slash => "/", Tok::Percent => "%", Tok::Amp => "&",
            Tok::Pipe => "|", Tok::Caret => "^", Tok::Tilde => "~", Tok::Bang => "!",
            Tok::Lt => "<", Tok::Gt => ">",

            Tok::LParen => "(", Tok::RParen => ")", Tok::LBrack => "[", Tok::RBrack => "]",
            Tok::LBrace => "{", Tok::RBrace => "}", Tok::Comma => ",", Tok::Semi => ";",
            Tok::Colon => ":", Tok::Dot => ".",
        })
    }
}

impl fmt::Display for Tok<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tok::Ident(s) => write!(f, "name {s}"),
            Tok::IntLit(s)
            | Tok::FloatLit(s)
            | Tok::ImagLit(s)
            | Tok::RuneLit(s)
            | Tok::StringLit(s)
            | Tok::RawStringLit(s) => write!(f, "literal {s}"),
            Tok::Error => f.write_str("invalid token"),
            other => write!(f, "'{}'", other.spelling().unwrap_or("?")),
        }
    }
}

// =============================================================================
// 6. Lexer wrapper: semicolon insertion + diagnostics
// =============================================================================

pub struct Lexer<'src> {
    logos: LogosLexer<'src, RawTok>,
    pending: Option<(usize, Tok<'src>, usize)>,
    diags: Vec<Diag>,
    last_can_insert_semi: bool,
    src_len: usize,
    eof_done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            logos: RawTok::lexer(input),
            pending: None,
            diags: Vec::new(),
            last_can_insert_semi: false,
            src_len: input.len(),
            eof_done: false,
        }
    }

    pub fn take_diags(&mut self) -> Vec<Diag> {
        std::mem::take(&mut self.diags)
    }

    #[inline]
    fn push_lex_diag(&mut self, kind: LexErrorKind, span: Range<usize>) {
        let span = Span::from_range(span);
        self.diags.push(LexError { kind, span }.diag());
    }

    #[inline]
    fn emit_semi_at(&mut self, pos: usize) {
        self.pending = Some((pos, Tok::Semi, pos));
    }

    fn handle_eof(&mut self) {
        self.eof_done = true;
        if self.last_can_insert_semi {
            self.last_can_insert_semi = false;
            self.emit_semi_at(self.src_len);
        }
    }

    fn error_token(&mut self, kind: LexErrorKind, span: Range<usize>) -> (usize, Tok<'src>, usize) {
        self.push_lex_diag(kind, span.clone());
        self.last_can_insert_semi = false;
        (span.start, Tok::Error, span.end)
    }

    /// `None` means the raw token was trivia and produced nothing.
    fn handle_raw_token(&mut self, raw: RawTok) -> Option<(usize, Tok<'src>, usize)> {
        let span = self.logos.span();
        let slice = self.logos.slice();

        match raw {
            RawTok::Bom if span.start == 0 => None,
            RawTok::Bom | RawTok::Error => Some(self.error_token(LexErrorKind::InvalidToken, span)),
            RawTok::Newline => {
                if std::mem::take(&mut self.last_can_insert_semi) {
                    self.emit_semi_at(span.start);
                }
                None
            }
            RawTok::BlockComment => {
                if self.last_can_insert_semi {
                    if let Some(off) = first_newline_offset(slice) {
                        self.last_can_insert_semi = false;
                        self.emit_semi_at(span.start + off);
                    }
                }
                None
            }
            RawTok::Number => Some(self.handle_number_token(span, slice)),
            _ => {
                self.last_can_insert_semi = raw.can_insert_semicolon();
                Some((span.start, raw.to_token(slice), span.end))
            }
        }
    }

    fn handle_number_token(
        &mut self,
        span: Range<usize>,
        slice: &'src str,
    ) -> (usize, Tok<'src>, usize) {
        match num::classify_number(slice) {
            Ok(kind) => {
                self.last_can_insert_semi = true;
                let tok = match kind {
                    num::NumKind::Int => Tok::IntLit(slice),
                    num::NumKind::Float => Tok::FloatLit(slice),
                    num::NumKind::Imag => Tok::ImagLit(slice),
                };
                (span.start, tok, span.end)
            }
            Err(kind) => self.error_token(kind, span),
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = (usize, Tok<'src>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // Injected ';' first.
            if let Some(tok) = self.pending.take() {
                return Some(tok);
            }
            if self.eof_done {
                return None;
            }

            match self.logos.next() {
                // Don't return: a pending ';' may still be emitted.
                None => self.handle_eof(),
                Some(Err(kind)) => {
                    let span = self.logos.span();
                    return Some(self.error_token(kind, span));
                }
                Some(Ok(raw)) => {
                    if let Some(item) = self.handle_raw_token(raw) {
                        return Some(item);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::num::{classify_number, NumKind};

    #[test]
    fn classifies_go_numbers() {
        for (text, kind) in [
            ("0", NumKind::Int),
            ("42", NumKind::Int),
            ("1_000_000", NumKind::Int),
            ("0x_1F", NumKind::Int),
            ("0b1010", NumKind::Int),
            ("0o17", NumKind::Int),
            ("0755", NumKind::Int),
            ("1.5", NumKind::Float),
            (".5", NumKind::Float),
            ("1.", NumKind::Float),
            ("1e10", NumKind::Float),
            ("6.02e+23", NumKind::Float),
            ("0x1p-2", NumKind::Float),
            ("0x1.8p1", NumKind::Float),
            ("09.5", NumKind::Float),
            ("3i", NumKind::Imag),
            ("1.5i", NumKind::Imag),
        ] {
            assert_eq!(classify_number(text), Ok(kind), "{text}");
        }
    }

    #[test]
    fn rejects_malformed_numbers() {
        for text in ["09", "0b2", "0x", "1__0", "1_", "0x1.8", "1e", "0o8", "0b1.0"] {
            assert!(classify_number(text).is_err(), "{text}");
        }
    }
}
