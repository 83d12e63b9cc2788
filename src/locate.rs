//! Finding the innermost function enclosing a byte offset.

use std::fmt;

use goiferr_parser::ast::{AstArena, Expr, ExprId, FieldId, FuncDeclId, ListRef, Type};
use goiferr_parser::{parse_source, Flow, ParsedFile, Span, Visitor};

use crate::error::IferrError;
use crate::sink::DiagnosticSink;
use crate::types::{Lowering, TypeExpr};

/// Display name of function literals.
pub const ANONYMOUS: &str = "(no name)";

/// The function (declaration or literal) chosen for an offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpan {
    /// From the `func` keyword to just past the closing brace.
    pub span: Span,
    /// `None` for function literals.
    pub name: Option<String>,
    /// Receiver type of a method.
    pub receiver: Option<TypeExpr>,
    /// Type parameters in scope: the function's own plus its receiver's.
    pub type_params: Vec<String>,
    /// One entry per result slot, in declaration order.
    pub results: Vec<TypeExpr>,
}

impl FunctionSpan {
    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }
}

impl fmt::Display for FunctionSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_deref().unwrap_or(ANONYMOUS))
    }
}

/// Parses `source` and locates the function enclosing `offset`.
pub fn locate(
    source: &str,
    offset: usize,
    sink: &dyn DiagnosticSink,
) -> Result<FunctionSpan, IferrError> {
    let parsed = parse_source(source)?;
    locate_in(&parsed, offset, sink)
}

/// Locates the innermost function whose span contains `offset`, boundaries
/// included. Functions not containing the offset are skipped along with
/// everything nested in them.
pub fn locate_in(
    parsed: &ParsedFile<'_>,
    offset: usize,
    sink: &dyn DiagnosticSink,
) -> Result<FunctionSpan, IferrError> {
    let mut locator = Locator {
        parsed,
        offset,
        sink,
        scope: Vec::new(),
        found: None,
    };
    parsed.walk(&mut locator);
    locator.found.ok_or(IferrError::NotFound { offset })
}

struct Locator<'p, 'src> {
    parsed: &'p ParsedFile<'src>,
    offset: usize,
    sink: &'p dyn DiagnosticSink,
    /// Type parameters of the declaration being descended into; function
    /// literals inside it see them too.
    scope: Vec<String>,
    found: Option<FunctionSpan>,
}

impl Locator<'_, '_> {
    fn field_names(&self, fields: ListRef<FieldId>) -> Vec<String> {
        let arena = &self.parsed.arena;
        arena
            .get(fields)
            .iter()
            .flat_map(|&f| arena.get(arena.fields[f].names))
            .map(|&n| self.parsed.name(n).to_string())
            .collect()
    }

    /// `T` and `U` of a receiver `(l *List[T, U])`.
    fn receiver_type_params(&self, recv: ListRef<FieldId>) -> Vec<String> {
        let arena = &self.parsed.arena;
        let Some(&field) = arena.get(recv).first() else {
            return Vec::new();
        };
        let mut typ = arena.fields[field].typ;
        loop {
            match arena.types[typ] {
                Type::Pointer(inner) | Type::Paren(inner) => typ = inner,
                Type::Named { args, .. } => {
                    return arena
                        .get(args)
                        .iter()
                        .filter_map(|&arg| match arena.types[arg] {
                            Type::Named {
                                pkg: None,
                                name,
                                args,
                            } if args.is_empty() => Some(self.parsed.name(name).to_string()),
                            _ => None,
                        })
                        .collect();
                }
                _ => return Vec::new(),
            }
        }
    }
}

impl<'ast> Visitor<'ast> for Locator<'_, '_> {
    fn enter_func_decl(&mut self, a: &'ast AstArena, id: FuncDeclId) -> Flow {
        let span = a.funcs.span(id);
        if !span.contains_inclusive(self.offset) {
            return Flow::Prune;
        }

        let decl = a.funcs[id];
        let name = self.parsed.name(decl.name).to_string();
        self.sink.debug(format_args!(
            "found a FuncDecl: name={name} pos={} end={}",
            span.start, span.end
        ));

        let mut scope = self.receiver_type_params(decl.recv);
        scope.extend(self.field_names(decl.type_params));

        let lower = Lowering::new(self.parsed, &scope);
        let receiver = a
            .get(decl.recv)
            .first()
            .map(|&f| lower.type_expr(a.fields[f].typ));
        let results = lower.field_types(a.signatures[decl.sig].results);

        self.found = Some(FunctionSpan {
            span,
            name: Some(name),
            receiver,
            type_params: scope.clone(),
            results,
        });
        self.scope = scope;
        Flow::Descend
    }

    fn enter_func_lit(&mut self, a: &'ast AstArena, id: ExprId) -> Flow {
        let span = a.exprs.span(id);
        if !span.contains_inclusive(self.offset) {
            return Flow::Prune;
        }
        let Expr::FuncLit { sig, .. } = a.exprs[id] else {
            return Flow::Descend;
        };

        self.sink.debug(format_args!(
            "found a FuncLit: pos={} end={}",
            span.start, span.end
        ));
        let results =
            Lowering::new(self.parsed, &self.scope).field_types(a.signatures[sig].results);
        self.found = Some(FunctionSpan {
            span,
            name: None,
            receiver: None,
            type_params: self.scope.clone(),
            results,
        });
        Flow::Descend
    }
}
