//! Result types as a closed set of shapes, lowered from the syntax tree.

use std::fmt;

use goiferr_parser::ast::{self, ArrayLen, FieldId, InterfaceElem, ListRef, Type, TypeId};
use goiferr_parser::ParsedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// One line of a struct type: `A, B int`, an embedded `T`, optional tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    /// Empty for embedded fields.
    pub names: Vec<String>,
    pub typ: TypeExpr,
    pub tag: Option<String>,
}

/// A Go type expression as written in a result list.
///
/// `Display` prints it back as Go type syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `T`, `error`, `List[int]`.
    Named { name: String, args: Vec<TypeExpr> },
    /// `pkg.T`, `pkg.T[int]`.
    Qualified {
        package: String,
        name: String,
        args: Vec<TypeExpr>,
    },
    /// A type parameter of the enclosing function or its receiver.
    TypeParam(String),
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    /// `len` is the length expression's source text.
    Array { len: String, elem: Box<TypeExpr> },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    /// Each element (method or embedded constraint) as written.
    Interface { methods: Vec<String> },
    Struct { fields: Vec<StructField> },
    /// Parameter names are dropped; `variadic` marks a trailing `...T`.
    Func {
        params: Vec<TypeExpr>,
        results: Vec<TypeExpr>,
        variadic: bool,
    },
    /// Anything without a zero-value rule (constraint unions, `[...]T`).
    Unsupported(String),
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn qualified(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Qualified {
            package: package.into(),
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn pointer(inner: TypeExpr) -> Self {
        Self::Pointer(Box::new(inner))
    }

    pub fn slice(elem: TypeExpr) -> Self {
        Self::Slice(Box::new(elem))
    }

    /// Whether this is a plain, unqualified, non-generic name `name`.
    pub fn is_name(&self, name: &str) -> bool {
        matches!(self, Self::Named { name: n, args } if args.is_empty() && n == name)
    }

    /// The predeclared `error` interface.
    pub fn is_error(&self) -> bool {
        self.is_name("error")
    }
}

struct Joined<'a, T>(&'a [T], &'static str);

impl<T: fmt::Display> fmt::Display for Joined<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(self.1)?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[TypeExpr]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    write!(f, "[{}]", Joined(args, ", "))
}

impl fmt::Display for StructField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.names.is_empty() {
            write!(f, "{} ", Joined(&self.names, ", "))?;
        }
        write!(f, "{}", self.typ)?;
        if let Some(tag) = &self.tag {
            write!(f, " {tag}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name, args } => {
                f.write_str(name)?;
                write_args(f, args)
            }
            Self::Qualified {
                package,
                name,
                args,
            } => {
                write!(f, "{package}.{name}")?;
                write_args(f, args)
            }
            Self::TypeParam(name) => f.write_str(name),
            Self::Pointer(inner) => write!(f, "*{inner}"),
            Self::Slice(elem) => write!(f, "[]{elem}"),
            Self::Array { len, elem } => write!(f, "[{len}]{elem}"),
            Self::Map { key, value } => write!(f, "map[{key}]{value}"),
            Self::Chan { dir, elem } => match dir {
                // `chan (<-chan T)` keeps the inner direction from binding left.
                ChanDir::Both if matches!(**elem, Self::Chan { dir: ChanDir::Recv, .. }) => {
                    write!(f, "chan ({elem})")
                }
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            Self::Interface { methods } if methods.is_empty() => f.write_str("interface{}"),
            Self::Interface { methods } => write!(f, "interface{{ {} }}", Joined(methods, "; ")),
            Self::Struct { fields } if fields.is_empty() => f.write_str("struct{}"),
            Self::Struct { fields } => write!(f, "struct{{ {} }}", Joined(fields, "; ")),
            Self::Func {
                params,
                results,
                variadic,
            } => {
                f.write_str("func(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if *variadic && i + 1 == params.len() {
                        f.write_str("...")?;
                    }
                    write!(f, "{p}")?;
                }
                f.write_str(")")?;
                match results.as_slice() {
                    [] => Ok(()),
                    [single] => write!(f, " {single}"),
                    many => write!(f, " ({})", Joined(many, ", ")),
                }
            }
            Self::Unsupported(text) => f.write_str(text),
        }
    }
}

/// Lowers syntax-tree types to [`TypeExpr`], resolving names against the
/// type parameters in scope.
pub(crate) struct Lowering<'a, 'src> {
    parsed: &'a ParsedFile<'src>,
    type_params: &'a [String],
}

impl<'a, 'src> Lowering<'a, 'src> {
    pub(crate) fn new(parsed: &'a ParsedFile<'src>, type_params: &'a [String]) -> Self {
        Self {
            parsed,
            type_params,
        }
    }

    fn text(&self, id: TypeId) -> String {
        self.parsed
            .text(self.parsed.arena.types.span(id))
            .to_string()
    }

    fn boxed(&self, id: TypeId) -> Box<TypeExpr> {
        Box::new(self.type_expr(id))
    }

    fn type_list(&self, ids: ListRef<TypeId>) -> Vec<TypeExpr> {
        self.parsed
            .arena
            .get(ids)
            .iter()
            .map(|&t| self.type_expr(t))
            .collect()
    }

    /// One entry per declared name; an unnamed field counts once.
    pub(crate) fn field_types(&self, fields: ListRef<FieldId>) -> Vec<TypeExpr> {
        let arena = &self.parsed.arena;
        let mut out = Vec::with_capacity(fields.len() as usize);
        for &id in arena.get(fields) {
            let field = arena.fields[id];
            let typ = self.type_expr(field.typ);
            let slots = (field.names.len() as usize).max(1);
            out.extend(std::iter::repeat(typ).take(slots));
        }
        out
    }

    pub(crate) fn type_expr(&self, id: TypeId) -> TypeExpr {
        let arena = &self.parsed.arena;
        match arena.types[id] {
            Type::Named {
                pkg: None,
                name,
                args,
            } => {
                let name = self.parsed.name(name);
                if args.is_empty() && self.type_params.iter().any(|p| p == name) {
                    return TypeExpr::TypeParam(name.to_string());
                }
                TypeExpr::Named {
                    name: name.to_string(),
                    args: self.type_list(args),
                }
            }
            Type::Named {
                pkg: Some(pkg),
                name,
                args,
            } => TypeExpr::Qualified {
                package: self.parsed.name(pkg).to_string(),
                name: self.parsed.name(name).to_string(),
                args: self.type_list(args),
            },
            Type::Pointer(inner) => TypeExpr::Pointer(self.boxed(inner)),
            Type::Slice(elem) => TypeExpr::Slice(self.boxed(elem)),
            Type::Array {
                len: ArrayLen::Expr(len),
                elem,
            } => TypeExpr::Array {
                len: self.parsed.text(arena.exprs.span(len)).to_string(),
                elem: self.boxed(elem),
            },
            Type::Array {
                len: ArrayLen::Ellipsis,
                ..
            } => TypeExpr::Unsupported(self.text(id)),
            Type::Map { key, value } => TypeExpr::Map {
                key: self.boxed(key),
                value: self.boxed(value),
            },
            Type::Chan { dir, elem } => TypeExpr::Chan {
                dir: match dir {
                    ast::ChanDir::Both => ChanDir::Both,
                    ast::ChanDir::Send => ChanDir::Send,
                    ast::ChanDir::Recv => ChanDir::Recv,
                },
                elem: self.boxed(elem),
            },
            Type::Func(sig) => {
                let sig = arena.signatures[sig];
                let variadic = arena
                    .get(sig.params)
                    .last()
                    .is_some_and(|&f| arena.fields[f].variadic);
                TypeExpr::Func {
                    params: self.field_types(sig.params),
                    results: self.field_types(sig.results),
                    variadic,
                }
            }
            Type::Struct { fields } => TypeExpr::Struct {
                fields: arena
                    .get(fields)
                    .iter()
                    .map(|&f| {
                        let field = arena.fields[f];
                        StructField {
                            names: arena
                                .get(field.names)
                                .iter()
                                .map(|&n| self.parsed.name(n).to_string())
                                .collect(),
                            typ: self.type_expr(field.typ),
                            tag: field.tag.map(|t| self.parsed.text(t).to_string()),
                        }
                    })
                    .collect(),
            },
            Type::Interface { elems } => TypeExpr::Interface {
                methods: arena
                    .get(elems)
                    .iter()
                    .map(|elem| match *elem {
                        InterfaceElem::Method { name, sig } => {
                            let span = name.pos.to(arena.signatures.span(sig));
                            self.parsed.text(span).to_string()
                        }
                        InterfaceElem::Embed(t) => self.text(t),
                    })
                    .collect(),
            },
            Type::Union { .. } => TypeExpr::Unsupported(self.text(id)),
            Type::Paren(inner) => self.type_expr(inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prints_go_syntax() {
        let cases = [
            (TypeExpr::named("error"), "error"),
            (TypeExpr::qualified("io", "Reader"), "io.Reader"),
            (TypeExpr::pointer(TypeExpr::named("Foo")), "*Foo"),
            (TypeExpr::slice(TypeExpr::named("byte")), "[]byte"),
            (
                TypeExpr::Map {
                    key: Box::new(TypeExpr::named("string")),
                    value: Box::new(TypeExpr::Struct { fields: vec![] }),
                },
                "map[string]struct{}",
            ),
            (
                TypeExpr::Chan {
                    dir: ChanDir::Both,
                    elem: Box::new(TypeExpr::Chan {
                        dir: ChanDir::Recv,
                        elem: Box::new(TypeExpr::named("int")),
                    }),
                },
                "chan (<-chan int)",
            ),
            (
                TypeExpr::Named {
                    name: "Pair".into(),
                    args: vec![TypeExpr::named("K"), TypeExpr::TypeParam("V".into())],
                },
                "Pair[K, V]",
            ),
            (
                TypeExpr::Func {
                    params: vec![TypeExpr::named("int"), TypeExpr::named("string")],
                    results: vec![TypeExpr::named("bool"), TypeExpr::named("error")],
                    variadic: true,
                },
                "func(int, ...string) (bool, error)",
            ),
            (
                TypeExpr::Struct {
                    fields: vec![
                        StructField {
                            names: vec!["A".into(), "B".into()],
                            typ: TypeExpr::named("int"),
                            tag: None,
                        },
                        StructField {
                            names: vec![],
                            typ: TypeExpr::qualified("sync", "Mutex"),
                            tag: Some("`json:\"-\"`".into()),
                        },
                    ],
                },
                "struct{ A, B int; sync.Mutex `json:\"-\"` }",
            ),
        ];
        for (typ, want) in cases {
            assert_eq!(typ.to_string(), want);
        }
    }

    #[test]
    fn error_is_only_the_bare_name() {
        assert!(TypeExpr::named("error").is_error());
        assert!(!TypeExpr::qualified("errors", "error").is_error());
        assert!(!TypeExpr::TypeParam("error".into()).is_error());
    }
}
