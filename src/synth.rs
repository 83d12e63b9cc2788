//! Zero values and the `if err != nil` snippet.

use std::borrow::Cow;

use crate::sink::DiagnosticSink;
use crate::types::TypeExpr;

/// Predeclared numeric types (plus the legacy `float`), all zeroed as `0`.
const NUMERIC: &[&str] = &[
    "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32", "uint64",
    "uintptr", "float", "float32", "float64", "complex64", "complex128", "byte", "rune",
];

/// What the snippet checks and what it returns in the error slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetOptions {
    /// Variable tested in `if <ident> != nil`.
    pub error_ident: String,
    /// Returned in the error slot; `error_ident` when unset.
    pub error_expr: Option<String>,
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self {
            error_ident: "err".to_string(),
            error_expr: None,
        }
    }
}

impl SnippetOptions {
    /// Return `expr` (e.g. `fmt.Errorf("read: %w", err)`) in the error slot.
    pub fn with_error_expr(mut self, expr: impl Into<String>) -> Self {
        self.error_expr = Some(expr.into());
        self
    }

    pub fn with_error_ident(mut self, ident: impl Into<String>) -> Self {
        self.error_ident = ident.into();
        self
    }

    /// The text placed in the error slot.
    pub fn error_value(&self) -> &str {
        self.error_expr.as_deref().unwrap_or(&self.error_ident)
    }
}

/// Zero-value literal for one result slot. Rules apply in order; the first
/// match wins.
pub fn zero_value<'t>(typ: &'t TypeExpr, sink: &dyn DiagnosticSink) -> Cow<'t, str> {
    match typ {
        t if t.is_name("bool") => "false".into(),
        t if t.is_name("string") => r#""""#.into(),
        t if t.is_name("any") || t.is_name("error") => "nil".into(),
        TypeExpr::Interface { .. } => "nil".into(),
        TypeExpr::Named { name, args } if args.is_empty() && NUMERIC.contains(&name.as_str()) => {
            "0".into()
        }
        TypeExpr::Pointer(_) => "nil".into(),
        TypeExpr::Slice(_) | TypeExpr::Array { .. } => "nil".into(),
        TypeExpr::Map { .. } => "nil".into(),
        TypeExpr::Chan { .. } => "nil".into(),
        // Could be a value type, but nothing outside this file is resolved.
        TypeExpr::Qualified { .. } => "nil".into(),
        TypeExpr::Func { .. } => "nil".into(),
        TypeExpr::TypeParam(name) => format!("*new({name})").into(),
        TypeExpr::Named { .. } | TypeExpr::Struct { .. } => format!("{typ}{{}}").into(),
        TypeExpr::Unsupported(text) => {
            sink.debug(format_args!("zero_value: unsupported type: {text}"));
            Cow::Borrowed(text.as_str())
        }
    }
}

/// Renders the snippet for `results`.
///
/// The last `error` slot receives [`SnippetOptions::error_value`]; every
/// other slot, including earlier `error` ones, gets its zero value. An empty
/// list yields a bare `return`.
pub fn synthesize(results: &[TypeExpr], opts: &SnippetOptions, sink: &dyn DiagnosticSink) -> String {
    let error_slot = results.iter().rposition(TypeExpr::is_error);

    let mut out = format!("if {} != nil {{\n\treturn", opts.error_ident);
    for (i, typ) in results.iter().enumerate() {
        sink.debug(format_args!("  type#{i} {typ}"));
        out.push_str(if i == 0 { " " } else { ", " });
        if Some(i) == error_slot {
            out.push_str(opts.error_value());
        } else {
            out.push_str(&zero_value(typ, sink));
        }
    }
    out.push_str("\n}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::NoopSink;

    #[test]
    fn numeric_names_zero_to_literal_zero() {
        for name in NUMERIC {
            assert_eq!(zero_value(&TypeExpr::named(*name), &NoopSink), "0", "{name}");
        }
    }

    #[test]
    fn options_fall_back_to_the_ident() {
        let opts = SnippetOptions::default();
        assert_eq!(opts.error_value(), "err");
        let opts = opts.with_error_ident("e");
        assert_eq!(opts.error_value(), "e");
        let opts = opts.with_error_expr("wrap(e)");
        assert_eq!(opts.error_value(), "wrap(e)");
    }
}
