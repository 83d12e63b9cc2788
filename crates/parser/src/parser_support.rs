use crate::ast::{self, AstArena, ListAlloc, ListRef, Span};
use crate::error::Diag;

/// One comma-separated entry of a parameter, result or type parameter list
/// before grouping: `a`, `a int`, `int`, `...string`.
#[derive(Clone, Copy, Debug)]
pub struct ParamEntry {
    pub name: Option<ast::IdentName>,
    pub typ: Option<ast::TypeId>,
    pub variadic: bool,
    pub span: Span,
}

/// Groups entries into fields the way Go reads `(a, b int, c string)`:
/// once any entry carries both a name and a type, bare identifiers are names
/// waiting for the next type. Otherwise every entry is a type and bare
/// identifiers are type names.
pub fn resolve_param_list(
    arena: &mut AstArena,
    entries: Vec<ParamEntry>,
) -> Result<ListRef<ast::FieldId>, Diag> {
    let named = entries.iter().any(|e| e.name.is_some() && e.typ.is_some());
    let mut out = Vec::with_capacity(entries.len());

    if !named {
        for entry in entries {
            let typ = match (entry.name, entry.typ) {
                (_, Some(typ)) => typ,
                (Some(name), None) => named_type_from_ident(arena, name),
                (None, None) => return Err(Diag::parse(entry.span, "expected type")),
            };
            let field = ast::Field {
                names: ListRef::EMPTY,
                typ,
                variadic: entry.variadic,
                tag: None,
            };
            out.push(arena.fields.alloc(field, entry.span));
        }
        return Ok(arena.list(out));
    }

    let mut pending: Vec<ast::IdentName> = Vec::new();
    let mut pending_start: Option<u32> = None;

    for entry in entries {
        match (entry.name, entry.typ) {
            (Some(name), None) => {
                pending_start.get_or_insert(entry.span.start);
                pending.push(name);
            }
            (Some(name), Some(typ)) => {
                pending.push(name);
                let names = arena.list(pending.drain(..));
                let span = Span {
                    start: pending_start.take().unwrap_or(entry.span.start),
                    end: entry.span.end,
                };
                let field = ast::Field {
                    names,
                    typ,
                    variadic: entry.variadic,
                    tag: None,
                };
                out.push(arena.fields.alloc(field, span));
            }
            (None, _) => {
                return Err(Diag::parse(
                    entry.span,
                    "mixed named and unnamed parameters",
                ));
            }
        }
    }

    if let Some(last) = pending.last() {
        return Err(Diag::parse(last.pos, "mixed named and unnamed parameters"));
    }

    Ok(arena.list(out))
}

pub fn named_type_from_ident(arena: &mut AstArena, name: ast::IdentName) -> ast::TypeId {
    arena.types.alloc(
        ast::Type::Named {
            pkg: None,
            name,
            args: ListRef::EMPTY,
        },
        name.pos,
    )
}
