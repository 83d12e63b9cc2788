//! Recursive-descent parser for Go source files.
//!
//! Mirrors the structure of `go/parser`: one method per production, a single
//! token of lookahead (plus a little more for the few ambiguous spots), and an
//! expression level that tells `if`/`for`/`switch` headers apart from
//! composite literals. Parsing stops at the first syntax error.

use crate::ast::*;
use crate::error::{Diag, Span};
use crate::lexer::Tok;
use crate::parser_support::{named_type_from_ident, resolve_param_list, ParamEntry};
use crate::walk::Visitor;

type PResult<T> = Result<T, Diag>;

/// Deepest recursion into expressions, types, blocks and literal values.
/// Deeper input is rejected rather than overflowing the stack.
pub const MAX_NEST_LEV: u32 = 200;

/// Deepest syntax tree accepted, counting left-nested chains such as
/// `a + b + c` and `x.f().g[0]` one level per link.
pub const MAX_TREE_DEPTH: u32 = 500;

/// A successfully parsed compilation unit.
#[derive(Debug)]
pub struct ParsedFile<'src> {
    pub src: &'src str,
    pub arena: AstArena,
    pub interner: Interner,
    pub file: SourceFile,
}

impl<'src> ParsedFile<'src> {
    /// Source text covered by `span`.
    pub fn text(&self, span: Span) -> &'src str {
        self.src
            .get(span.start as usize..span.end as usize)
            .unwrap_or_default()
    }

    pub fn name(&self, ident: IdentName) -> &str {
        self.interner.resolve(ident.sym)
    }

    pub fn package(&self) -> &str {
        self.name(self.file.package)
    }

    /// Runs `v` over the whole file, depth first.
    pub fn walk<'ast, V: Visitor<'ast>>(&'ast self, v: &mut V) {
        v.visit_source_file(&self.arena, &self.file);
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SimpleMode {
    Basic,
    LabelOk,
    RangeOk,
}

enum Simple {
    Stmt(SimpleStmtId),
    Range {
        key: Option<ExprId>,
        value: Option<ExprId>,
        define: bool,
        x: ExprId,
    },
    Label(IdentName),
}

enum ForHeader {
    Loop {
        init: Option<SimpleStmtId>,
        cond: Option<ExprId>,
        post: Option<SimpleStmtId>,
    },
    Range {
        key: Option<ExprId>,
        value: Option<ExprId>,
        define: bool,
        x: ExprId,
    },
}

pub(crate) struct Parser<'src> {
    src: &'src str,
    toks: Vec<(usize, Tok<'src>, usize)>,
    pos: usize,
    prev_end: usize,
    /// < 0 inside control clause headers, >= 0 elsewhere.
    expr_lev: i32,
    nest_lev: u32,
    /// Tree depth of the node being built, and the deepest seen since the
    /// current chain started.
    depth: u32,
    peak: u32,
    arena: AstArena,
    interner: Interner,
}

fn binary_op(tok: Tok<'_>) -> Option<BinaryOp> {
    Some(match tok {
        Tok::LOr => BinaryOp::LOr,
        Tok::LAnd => BinaryOp::LAnd,
        Tok::EqEq => BinaryOp::Eq,
        Tok::NotEq => BinaryOp::Ne,
        Tok::Lt => BinaryOp::Lt,
        Tok::Le => BinaryOp::Le,
        Tok::Gt => BinaryOp::Gt,
        Tok::Ge => BinaryOp::Ge,
        Tok::Plus => BinaryOp::Add,
        Tok::Minus => BinaryOp::Sub,
        Tok::Pipe => BinaryOp::Or,
        Tok::Caret => BinaryOp::Xor,
        Tok::Star => BinaryOp::Mul,
        Tok::Slash => BinaryOp::Div,
        Tok::Percent => BinaryOp::Rem,
        Tok::Shl => BinaryOp::Shl,
        Tok::Shr => BinaryOp::Shr,
        Tok::Amp => BinaryOp::And,
        Tok::AndNot => BinaryOp::AndNot,
        _ => return None,
    })
}

fn assign_op(tok: Tok<'_>) -> Option<AssignOp> {
    Some(match tok {
        Tok::Assign => AssignOp::Assign,
        Tok::Define => AssignOp::Define,
        Tok::AddAssign => AssignOp::Add,
        Tok::SubAssign => AssignOp::Sub,
        Tok::MulAssign => AssignOp::Mul,
        Tok::DivAssign => AssignOp::Div,
        Tok::ModAssign => AssignOp::Rem,
        Tok::AndAssign => AssignOp::And,
        Tok::OrAssign => AssignOp::Or,
        Tok::XorAssign => AssignOp::Xor,
        Tok::ShlAssign => AssignOp::Shl,
        Tok::ShrAssign => AssignOp::Shr,
        Tok::AndNotAssign => AssignOp::AndNot,
        _ => return None,
    })
}

impl<'src> Parser<'src> {
    pub(crate) fn new(src: &'src str, toks: Vec<(usize, Tok<'src>, usize)>) -> Self {
        Self {
            src,
            toks,
            pos: 0,
            prev_end: 0,
            expr_lev: 0,
            nest_lev: 0,
            depth: 0,
            peak: 0,
            arena: AstArena::new(),
            interner: Interner::new(),
        }
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    #[inline]
    fn peek(&self) -> Option<Tok<'src>> {
        self.toks.get(self.pos).map(|t| t.1)
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<Tok<'src>> {
        self.toks.get(self.pos + n).map(|t| t.1)
    }

    #[inline]
    fn at(&self, tok: Tok<'src>) -> bool {
        self.peek() == Some(tok)
    }

    /// Start offset of the current token.
    #[inline]
    fn start(&self) -> usize {
        self.toks.get(self.pos).map_or(self.src.len(), |t| t.0)
    }

    fn cur_span(&self) -> Span {
        match self.toks.get(self.pos) {
            Some(&(s, _, e)) => Span::new(s, e),
            None => Span::empty_at(self.src.len()),
        }
    }

    /// Span from `start` to the end of the last consumed token.
    #[inline]
    fn since(&self, start: usize) -> Span {
        Span::new(start, self.prev_end.max(start))
    }

    fn bump(&mut self) -> Span {
        let span = self.cur_span();
        if self.pos < self.toks.len() {
            self.pos += 1;
            self.prev_end = span.end as usize;
        }
        span
    }

    fn eat(&mut self, tok: Tok<'src>) -> Option<Span> {
        self.at(tok).then(|| self.bump())
    }

    fn expect(&mut self, tok: Tok<'src>) -> PResult<Span> {
        match self.eat(tok) {
            Some(span) => Ok(span),
            None => Err(self.err_expected(&format!("'{}'", tok.spelling().unwrap_or("?")))),
        }
    }

    /// Statement terminator; may be omitted before a closing `)` or `}`.
    fn expect_semi(&mut self) -> PResult<()> {
        match self.peek() {
            Some(Tok::Semi) => {
                self.bump();
                Ok(())
            }
            Some(Tok::RParen | Tok::RBrace) | None => Ok(()),
            Some(_) => Err(self.err_expected("';'")),
        }
    }

    fn found(&self) -> String {
        match self.toks.get(self.pos) {
            None => "EOF".to_string(),
            Some(&(s, Tok::Semi, e)) if s == e && s >= self.src.len() => "EOF".to_string(),
            Some(&(s, Tok::Semi, e)) if s == e => "newline".to_string(),
            Some((_, tok, _)) => tok.to_string(),
        }
    }

    fn too_deep(&self) -> Diag {
        Diag::parse(self.cur_span(), "exceeded max nesting depth")
    }

    /// Runs `f` one nesting level deeper.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.nest_lev >= MAX_NEST_LEV || self.depth >= MAX_TREE_DEPTH {
            return Err(self.too_deep());
        }
        let (nest_lev, depth) = (self.nest_lev, self.depth);
        self.nest_lev += 1;
        self.depth += 1;
        self.peak = self.peak.max(self.depth);
        let out = f(self);
        self.nest_lev = nest_lev;
        self.depth = depth;
        out
    }

    /// Starts measuring a left-nested chain; hand the result to `end_chain`.
    fn begin_chain(&mut self) -> u32 {
        std::mem::replace(&mut self.peak, self.depth)
    }

    /// One more node on the chain's left spine, above everything parsed
    /// since `begin_chain`.
    fn chain_link(&mut self) -> PResult<()> {
        if self.peak >= MAX_TREE_DEPTH {
            return Err(self.too_deep());
        }
        self.depth = self.peak + 1;
        self.peak = self.depth;
        Ok(())
    }

    fn end_chain(&mut self, outer_peak: u32) {
        self.peak = self.peak.max(outer_peak);
    }

    fn err_expected(&self, what: &str) -> Diag {
        Diag::parse(
            self.cur_span(),
            format!("expected {what}, found {}", self.found()),
        )
    }

    fn ident(&mut self) -> PResult<IdentName> {
        match self.peek() {
            Some(Tok::Ident(s)) => {
                let pos = self.bump();
                Ok(IdentName {
                    sym: self.interner.intern(s),
                    pos,
                })
            }
            _ => Err(self.err_expected("name")),
        }
    }

    fn ident_list(&mut self) -> PResult<ListRef<IdentName>> {
        let mut names = vec![self.ident()?];
        while self.eat(Tok::Comma).is_some() {
            names.push(self.ident()?);
        }
        Ok(self.arena.list(names))
    }

    fn at_type_start(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Tok::Ident(_)
                    | Tok::Star
                    | Tok::LBrack
                    | Tok::LParen
                    | Tok::Arrow
                    | Tok::KwFunc
                    | Tok::KwMap
                    | Tok::KwChan
                    | Tok::KwStruct
                    | Tok::KwInterface
            )
        )
    }

    fn at_expr_start(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Tok::Ident(_)
                    | Tok::IntLit(_)
                    | Tok::FloatLit(_)
                    | Tok::ImagLit(_)
                    | Tok::RuneLit(_)
                    | Tok::StringLit(_)
                    | Tok::RawStringLit(_)
                    | Tok::LParen
                    | Tok::LBrack
                    | Tok::KwFunc
                    | Tok::KwMap
                    | Tok::KwChan
                    | Tok::KwStruct
                    | Tok::KwInterface
                    | Tok::Star
                    | Tok::Amp
                    | Tok::Plus
                    | Tok::Minus
                    | Tok::Bang
                    | Tok::Caret
                    | Tok::Arrow
            )
        )
    }

    // =========================================================================
    // Allocation helpers
    // =========================================================================

    fn expr(&mut self, e: Expr, start: usize) -> ExprId {
        let span = self.since(start);
        self.arena.exprs.alloc(e, span)
    }

    fn ty(&mut self, t: Type, start: usize) -> TypeId {
        let span = self.since(start);
        self.arena.types.alloc(t, span)
    }

    fn stmt(&mut self, s: Stmt, start: usize) -> StmtId {
        let span = self.since(start);
        self.arena.stmts.alloc(s, span)
    }

    fn simple(&mut self, s: SimpleStmt, start: usize) -> SimpleStmtId {
        let span = self.since(start);
        self.arena.simple_stmts.alloc(s, span)
    }

    // =========================================================================
    // Source file / declarations
    // =========================================================================

    pub(crate) fn parse_file(mut self) -> PResult<ParsedFile<'src>> {
        self.expect(Tok::KwPackage)?;
        let package = self.ident()?;
        self.expect_semi()?;

        let mut decls = Vec::new();
        while self.at(Tok::KwImport) {
            decls.push(self.parse_gen_decl()?);
            self.expect_semi()?;
        }

        while let Some(tok) = self.peek() {
            let decl = match tok {
                Tok::KwFunc => self.parse_func_decl()?,
                Tok::KwConst | Tok::KwVar | Tok::KwType => self.parse_gen_decl()?,
                Tok::KwImport => {
                    return Err(Diag::parse(
                        self.cur_span(),
                        "imports must appear before other declarations",
                    ));
                }
                _ => return Err(self.err_expected("declaration")),
            };
            decls.push(decl);
            self.expect_semi()?;
        }

        let decls = self.arena.list(decls);
        Ok(ParsedFile {
            src: self.src,
            arena: self.arena,
            interner: self.interner,
            file: SourceFile { package, decls },
        })
    }

    fn parse_gen_decl(&mut self) -> PResult<DeclId> {
        let start = self.start();
        let kind = match self.peek() {
            Some(Tok::KwImport) => GenDeclKind::Import,
            Some(Tok::KwConst) => GenDeclKind::Const,
            Some(Tok::KwVar) => GenDeclKind::Var,
            Some(Tok::KwType) => GenDeclKind::Type,
            _ => return Err(self.err_expected("declaration")),
        };
        self.bump();

        let mut specs = Vec::new();
        if self.eat(Tok::LParen).is_some() {
            while !self.at(Tok::RParen) && self.peek().is_some() {
                specs.push(self.parse_spec(kind)?);
                self.expect_semi()?;
            }
            self.expect(Tok::RParen)?;
        } else {
            specs.push(self.parse_spec(kind)?);
        }

        let specs = self.arena.list(specs);
        let span = self.since(start);
        Ok(self.arena.decls.alloc(Decl::Gen { kind, specs }, span))
    }

    fn parse_spec(&mut self, kind: GenDeclKind) -> PResult<Spec> {
        match kind {
            GenDeclKind::Import => {
                let name = match self.peek() {
                    Some(Tok::Ident(_)) => Some(self.ident()?),
                    Some(Tok::Dot) => {
                        let pos = self.bump();
                        Some(IdentName {
                            sym: self.interner.intern("."),
                            pos,
                        })
                    }
                    _ => None,
                };
                let path = match self.peek() {
                    Some(Tok::StringLit(_) | Tok::RawStringLit(_)) => self.bump(),
                    _ => return Err(self.err_expected("import path")),
                };
                Ok(Spec::Import { name, path })
            }
            GenDeclKind::Const | GenDeclKind::Var => {
                let names = self.ident_list()?;
                let typ = match self.peek() {
                    Some(Tok::Assign | Tok::Semi | Tok::RParen) | None => None,
                    Some(_) => Some(self.parse_type()?),
                };
                let values = match self.eat(Tok::Assign) {
                    Some(_) => self.expr_list()?,
                    None => ListRef::EMPTY,
                };
                if kind == GenDeclKind::Var && typ.is_none() && values.is_empty() {
                    return Err(self.err_expected("type"));
                }
                Ok(Spec::Value { names, typ, values })
            }
            GenDeclKind::Type => {
                let name = self.ident()?;
                let type_params = if self.at(Tok::LBrack) && self.looks_like_type_params() {
                    self.parse_type_params()?
                } else {
                    ListRef::EMPTY
                };
                let alias = self.eat(Tok::Assign).is_some();
                let typ = self.parse_type()?;
                Ok(Spec::Type {
                    name,
                    type_params,
                    alias,
                    typ,
                })
            }
        }
    }

    /// `type T[P C] ...` versus `type A [N]E`. A name followed by something
    /// that can only begin a constraint means type parameters; `[P *C]` stays
    /// an array length, as in the Go spec.
    fn looks_like_type_params(&self) -> bool {
        matches!(self.peek_nth(1), Some(Tok::Ident(_)))
            && matches!(
                self.peek_nth(2),
                Some(
                    Tok::Ident(_)
                        | Tok::Comma
                        | Tok::Tilde
                        | Tok::LBrack
                        | Tok::Arrow
                        | Tok::KwFunc
                        | Tok::KwMap
                        | Tok::KwChan
                        | Tok::KwStruct
                        | Tok::KwInterface
                )
            )
    }

    fn parse_func_decl(&mut self) -> PResult<DeclId> {
        let start = self.start();
        self.expect(Tok::KwFunc)?;

        let recv = if self.at(Tok::LParen) {
            self.parse_params()?
        } else {
            ListRef::EMPTY
        };
        let name = self.ident()?;
        let type_params = if self.at(Tok::LBrack) {
            self.parse_type_params()?
        } else {
            ListRef::EMPTY
        };
        let sig_start = self.start();
        let sig = self.parse_signature(sig_start)?;
        let body = if self.at(Tok::LBrace) {
            Some(self.parse_body()?)
        } else {
            None
        };

        let span = self.since(start);
        let func = self.arena.funcs.alloc(
            FuncDecl {
                recv,
                name,
                type_params,
                sig,
                body,
            },
            span,
        );
        Ok(self.arena.decls.alloc(Decl::Func(func), span))
    }

    // =========================================================================
    // Signatures and parameter lists
    // =========================================================================

    fn parse_signature(&mut self, start: usize) -> PResult<SignatureId> {
        let params = self.parse_params()?;
        let results = if self.at(Tok::LParen) {
            self.parse_params()?
        } else if self.at_type_start() {
            let rstart = self.start();
            let typ = self.parse_type()?;
            let span = self.since(rstart);
            let field = self.arena.fields.alloc(
                Field {
                    names: ListRef::EMPTY,
                    typ,
                    variadic: false,
                    tag: None,
                },
                span,
            );
            self.arena.list([field])
        } else {
            ListRef::EMPTY
        };

        let span = self.since(start);
        Ok(self
            .arena
            .signatures
            .alloc(Signature { params, results }, span))
    }

    fn parse_params(&mut self) -> PResult<ListRef<FieldId>> {
        self.expect(Tok::LParen)?;
        self.parse_param_group(Tok::RParen, false)
    }

    fn parse_type_params(&mut self) -> PResult<ListRef<FieldId>> {
        let open = self.expect(Tok::LBrack)?;
        let fields = self.parse_param_group(Tok::RBrack, true)?;
        let unnamed = self
            .arena
            .get(fields)
            .iter()
            .any(|&f| self.arena.fields[f].names.is_empty());
        if fields.is_empty() || unnamed {
            return Err(Diag::parse(open, "type parameters must be named"));
        }
        Ok(fields)
    }

    /// Entries up to and including `close`, grouped into fields.
    fn parse_param_group(
        &mut self,
        close: Tok<'src>,
        constraints: bool,
    ) -> PResult<ListRef<FieldId>> {
        let mut entries = Vec::new();
        while !self.at(close) {
            entries.push(self.parse_param_entry(close, constraints)?);
            if self.eat(Tok::Comma).is_none() {
                break;
            }
        }
        self.expect(close)?;
        resolve_param_list(&mut self.arena, entries)
    }

    fn parse_param_entry(&mut self, close: Tok<'src>, constraints: bool) -> PResult<ParamEntry> {
        let start = self.start();
        let mut entry = ParamEntry {
            name: None,
            typ: None,
            variadic: false,
            span: Span::empty_at(start),
        };

        match self.peek() {
            Some(Tok::Ident(_)) => {
                let first = self.ident()?;
                match self.peek() {
                    Some(Tok::Dot) => entry.typ = Some(self.finish_named_type(start, first)?),
                    Some(Tok::LBrack) => {
                        let (name, typ) = self.name_or_generic(start, first)?;
                        entry.name = name;
                        entry.typ = Some(typ);
                    }
                    Some(Tok::Ellipsis) => {
                        self.bump();
                        entry.name = Some(first);
                        entry.typ = Some(self.parse_type()?);
                        entry.variadic = true;
                    }
                    Some(Tok::Comma) => entry.name = Some(first),
                    Some(tok) if tok == close => entry.name = Some(first),
                    Some(Tok::Tilde) if constraints => {
                        entry.name = Some(first);
                        entry.typ = Some(self.parse_constraint()?);
                    }
                    _ if self.at_type_start() => {
                        entry.name = Some(first);
                        entry.typ = Some(if constraints {
                            self.parse_constraint()?
                        } else {
                            self.parse_type()?
                        });
                    }
                    _ => entry.name = Some(first),
                }
            }
            Some(Tok::Ellipsis) => {
                self.bump();
                entry.typ = Some(self.parse_type()?);
                entry.variadic = true;
            }
            _ => {
                entry.typ = Some(if constraints {
                    self.parse_constraint()?
                } else {
                    self.parse_type()?
                });
            }
        }

        entry.span = self.since(start);
        Ok(entry)
    }

    /// After a name `first` with `[` ahead: either `first` names a
    /// parameter or field of slice/array type (`buf []byte`, `a [4]int`), or
    /// `first[...]` instantiates a generic type (`List[T]`).
    fn name_or_generic(
        &mut self,
        start: usize,
        first: IdentName,
    ) -> PResult<(Option<IdentName>, TypeId)> {
        if matches!(self.peek_nth(1), Some(Tok::RBrack | Tok::Ellipsis)) {
            return Ok((Some(first), self.parse_type()?));
        }

        let lbrack = self.bump();
        self.expr_lev += 1;
        let inner = self.bracket_list();
        self.expr_lev -= 1;
        let inner = inner?;
        self.expect(Tok::RBrack)?;

        if inner.len() == 1 && self.at_type_start() {
            let elem = self.parse_type()?;
            let array = self.ty(
                Type::Array {
                    len: ArrayLen::Expr(inner[0]),
                    elem,
                },
                lbrack.start as usize,
            );
            return Ok((Some(first), array));
        }

        let args = inner
            .into_iter()
            .map(|e| self.expr_to_type(e))
            .collect::<PResult<Vec<_>>>()?;
        let args = self.arena.list(args);
        let typ = self.ty(
            Type::Named {
                pkg: None,
                name: first,
                args,
            },
            start,
        );
        Ok((None, typ))
    }

    fn bracket_list(&mut self) -> PResult<Vec<ExprId>> {
        let mut items = vec![self.parse_expr()?];
        while self.eat(Tok::Comma).is_some() && !self.at(Tok::RBrack) {
            items.push(self.parse_expr()?);
        }
        Ok(items)
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_type(&mut self) -> PResult<TypeId> {
        self.nested(Self::type_inner)
    }

    fn type_inner(&mut self) -> PResult<TypeId> {
        let start = self.start();
        match self.peek() {
            Some(Tok::Ident(_)) => {
                let first = self.ident()?;
                self.finish_named_type(start, first)
            }
            Some(Tok::Star) => {
                self.bump();
                let inner = self.parse_type()?;
                Ok(self.ty(Type::Pointer(inner), start))
            }
            Some(Tok::LBrack) => {
                self.bump();
                if self.eat(Tok::RBrack).is_some() {
                    let elem = self.parse_type()?;
                    return Ok(self.ty(Type::Slice(elem), start));
                }
                let len = if self.eat(Tok::Ellipsis).is_some() {
                    ArrayLen::Ellipsis
                } else {
                    self.expr_lev += 1;
                    let len = self.parse_expr();
                    self.expr_lev -= 1;
                    ArrayLen::Expr(len?)
                };
                self.expect(Tok::RBrack)?;
                let elem = self.parse_type()?;
                Ok(self.ty(Type::Array { len, elem }, start))
            }
            Some(Tok::KwMap) => {
                self.bump();
                self.expect(Tok::LBrack)?;
                let key = self.parse_type()?;
                self.expect(Tok::RBrack)?;
                let value = self.parse_type()?;
                Ok(self.ty(Type::Map { key, value }, start))
            }
            Some(Tok::KwChan) => {
                self.bump();
                let dir = match self.eat(Tok::Arrow) {
                    Some(_) => ChanDir::Send,
                    None => ChanDir::Both,
                };
                let elem = self.parse_type()?;
                Ok(self.ty(Type::Chan { dir, elem }, start))
            }
            Some(Tok::Arrow) => {
                self.bump();
                self.expect(Tok::KwChan)?;
                let elem = self.parse_type()?;
                Ok(self.ty(
                    Type::Chan {
                        dir: ChanDir::Recv,
                        elem,
                    },
                    start,
                ))
            }
            Some(Tok::KwFunc) => {
                self.bump();
                let sig_start = self.start();
                let sig = self.parse_signature(sig_start)?;
                Ok(self.ty(Type::Func(sig), start))
            }
            Some(Tok::KwStruct) => self.parse_struct_type(),
            Some(Tok::KwInterface) => self.parse_interface_type(),
            Some(Tok::LParen) => {
                self.bump();
                let inner = self.parse_type()?;
                self.expect(Tok::RParen)?;
                Ok(self.ty(Type::Paren(inner), start))
            }
            _ => Err(self.err_expected("type")),
        }
    }

    /// `first`, `first.Sel`, optionally followed by type arguments.
    fn finish_named_type(&mut self, start: usize, first: IdentName) -> PResult<TypeId> {
        let (pkg, name) = match self.eat(Tok::Dot) {
            Some(_) => (Some(first), self.ident()?),
            None => (None, first),
        };

        let args = if self.eat(Tok::LBrack).is_some() {
            let mut args = vec![self.parse_type()?];
            while self.eat(Tok::Comma).is_some() && !self.at(Tok::RBrack) {
                args.push(self.parse_type()?);
            }
            self.expect(Tok::RBrack)?;
            self.arena.list(args)
        } else {
            ListRef::EMPTY
        };

        Ok(self.ty(Type::Named { pkg, name, args }, start))
    }

    fn parse_struct_type(&mut self) -> PResult<TypeId> {
        let start = self.start();
        self.expect(Tok::KwStruct)?;
        self.expect(Tok::LBrace)?;
        let mut fields = Vec::new();
        while !self.at(Tok::RBrace) && self.peek().is_some() {
            fields.push(self.parse_field_decl()?);
        }
        self.expect(Tok::RBrace)?;
        let fields = self.arena.list(fields);
        Ok(self.ty(Type::Struct { fields }, start))
    }

    fn parse_field_decl(&mut self) -> PResult<FieldId> {
        let start = self.start();
        let (names, typ) = match self.peek() {
            Some(Tok::Star) => (ListRef::EMPTY, self.parse_type()?),
            Some(Tok::Ident(_)) => {
                let first = self.ident()?;
                match self.peek() {
                    Some(Tok::Dot) => (ListRef::EMPTY, self.finish_named_type(start, first)?),
                    Some(
                        Tok::Semi | Tok::RBrace | Tok::StringLit(_) | Tok::RawStringLit(_),
                    )
                    | None => (ListRef::EMPTY, named_type_from_ident(&mut self.arena, first)),
                    Some(Tok::LBrack) => match self.name_or_generic(start, first)? {
                        (Some(name), typ) => (self.arena.list([name]), typ),
                        (None, typ) => (ListRef::EMPTY, typ),
                    },
                    _ => {
                        let mut names = vec![first];
                        while self.eat(Tok::Comma).is_some() {
                            names.push(self.ident()?);
                        }
                        (self.arena.list(names), self.parse_type()?)
                    }
                }
            }
            _ => return Err(self.err_expected("field name or embedded type")),
        };

        let tag = match self.peek() {
            Some(Tok::StringLit(_) | Tok::RawStringLit(_)) => Some(self.bump()),
            _ => None,
        };
        let span = self.since(start);
        self.expect_semi()?;

        Ok(self.arena.fields.alloc(
            Field {
                names,
                typ,
                variadic: false,
                tag,
            },
            span,
        ))
    }

    fn parse_interface_type(&mut self) -> PResult<TypeId> {
        let start = self.start();
        self.expect(Tok::KwInterface)?;
        self.expect(Tok::LBrace)?;
        let mut elems = Vec::new();
        while !self.at(Tok::RBrace) && self.peek().is_some() {
            let is_method =
                matches!(self.peek(), Some(Tok::Ident(_))) && self.peek_nth(1) == Some(Tok::LParen);
            let elem = if is_method {
                let name = self.ident()?;
                let sig_start = self.start();
                let sig = self.parse_signature(sig_start)?;
                InterfaceElem::Method { name, sig }
            } else {
                InterfaceElem::Embed(self.parse_constraint()?)
            };
            elems.push(elem);
            self.expect_semi()?;
        }
        self.expect(Tok::RBrace)?;
        let elems = self.arena.list(elems);
        Ok(self.ty(Type::Interface { elems }, start))
    }

    /// `T`, `~T`, or a union `~int | string`.
    fn parse_constraint(&mut self) -> PResult<TypeId> {
        let start = self.start();
        let mut terms = vec![self.parse_type_term()?];
        while self.eat(Tok::Pipe).is_some() {
            terms.push(self.parse_type_term()?);
        }
        if let [TypeTerm { tilde: false, typ }] = terms[..] {
            return Ok(typ);
        }
        let terms = self.arena.list(terms);
        Ok(self.ty(Type::Union { terms }, start))
    }

    fn parse_type_term(&mut self) -> PResult<TypeTerm> {
        let tilde = self.eat(Tok::Tilde).is_some();
        let typ = self.parse_type()?;
        Ok(TypeTerm { tilde, typ })
    }

    /// Reinterprets an expression parsed before its role was known as a type.
    fn expr_to_type(&mut self, id: ExprId) -> PResult<TypeId> {
        let span = self.arena.exprs.span(id);
        let expr = self.arena.exprs[id];
        let typ = match expr {
            Expr::Type(t) => return Ok(t),
            Expr::Ident(sym) => Type::Named {
                pkg: None,
                name: IdentName { sym, pos: span },
                args: ListRef::EMPTY,
            },
            Expr::Selector { x, sel } => match self.arena.exprs[x] {
                Expr::Ident(pkg) => Type::Named {
                    pkg: Some(IdentName {
                        sym: pkg,
                        pos: self.arena.exprs.span(x),
                    }),
                    name: sel,
                    args: ListRef::EMPTY,
                },
                _ => return Err(Diag::parse(span, "expected type")),
            },
            Expr::Index { x, indices } => {
                let base = self.expr_to_type(x)?;
                let Type::Named { pkg, name, args } = self.arena.types[base] else {
                    return Err(Diag::parse(span, "expected type"));
                };
                if !args.is_empty() {
                    return Err(Diag::parse(span, "expected type"));
                }
                let indices = self.arena.get(indices).to_vec();
                let args = indices
                    .into_iter()
                    .map(|e| self.expr_to_type(e))
                    .collect::<PResult<Vec<_>>>()?;
                let args = self.arena.list(args);
                Type::Named { pkg, name, args }
            }
            Expr::Star(x) => Type::Pointer(self.expr_to_type(x)?),
            Expr::Paren(x) => Type::Paren(self.expr_to_type(x)?),
            _ => return Err(Diag::parse(span, "expected type")),
        };
        Ok(self.arena.types.alloc(typ, span))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_body(&mut self) -> PResult<Block> {
        let outer = std::mem::replace(&mut self.expr_lev, 0);
        let body = self.parse_block();
        self.expr_lev = outer;
        body
    }

    fn parse_block(&mut self) -> PResult<Block> {
        self.nested(Self::block_inner)
    }

    fn block_inner(&mut self) -> PResult<Block> {
        let start = self.start();
        self.expect(Tok::LBrace)?;
        let stmts = self.parse_stmt_list()?;
        self.expect(Tok::RBrace)?;
        Ok(Block {
            stmts,
            span: self.since(start),
        })
    }

    fn parse_stmt_list(&mut self) -> PResult<ListRef<StmtId>> {
        let mut stmts = Vec::new();
        while !matches!(
            self.peek(),
            Some(Tok::RBrace | Tok::KwCase | Tok::KwDefault) | None
        ) {
            stmts.push(self.parse_stmt()?);
        }
        Ok(self.arena.list(stmts))
    }

    /// One statement including its terminating semicolon.
    fn parse_stmt(&mut self) -> PResult<StmtId> {
        let start = self.start();
        let stmt = match self.peek() {
            Some(Tok::KwConst | Tok::KwVar | Tok::KwType) => Stmt::Decl(self.parse_gen_decl()?),
            Some(Tok::KwGo) => {
                self.bump();
                Stmt::Go(self.parse_expr()?)
            }
            Some(Tok::KwDefer) => {
                self.bump();
                Stmt::Defer(self.parse_expr()?)
            }
            Some(Tok::KwReturn) => {
                self.bump();
                let results = match self.peek() {
                    Some(Tok::Semi | Tok::RBrace) => ListRef::EMPTY,
                    _ => self.expr_list()?,
                };
                Stmt::Return(results)
            }
            Some(
                tok @ (Tok::KwBreak | Tok::KwContinue | Tok::KwGoto | Tok::KwFallthrough),
            ) => {
                self.bump();
                let kind = match tok {
                    Tok::KwBreak => BranchKind::Break,
                    Tok::KwContinue => BranchKind::Continue,
                    Tok::KwGoto => BranchKind::Goto,
                    _ => BranchKind::Fallthrough,
                };
                let label = match self.peek() {
                    Some(Tok::Ident(_)) if kind != BranchKind::Fallthrough => Some(self.ident()?),
                    _ => None,
                };
                Stmt::Branch { kind, label }
            }
            Some(Tok::LBrace) => Stmt::Block(self.parse_block()?),
            Some(Tok::KwIf) => self.parse_if()?,
            Some(Tok::KwSwitch) => self.parse_switch()?,
            Some(Tok::KwSelect) => self.parse_select()?,
            Some(Tok::KwFor) => self.parse_for()?,
            Some(Tok::Semi) => {
                self.bump();
                return Ok(self.arena.stmts.alloc(Stmt::Empty, Span::empty_at(start)));
            }
            _ if self.at_expr_start() => match self.parse_simple_stmt(SimpleMode::LabelOk)? {
                Simple::Stmt(id) => Stmt::Simple(id),
                Simple::Label(label) => {
                    let inner = match self.peek() {
                        Some(Tok::RBrace) => None,
                        _ => Some(self.nested(Self::parse_stmt)?),
                    };
                    return Ok(self.stmt(Stmt::Labeled { label, stmt: inner }, start));
                }
                Simple::Range { .. } => return Err(self.err_expected("statement")),
            },
            _ => return Err(self.err_expected("statement")),
        };

        let id = self.stmt(stmt, start);
        self.expect_semi()?;
        Ok(id)
    }

    fn parse_simple_stmt(&mut self, mode: SimpleMode) -> PResult<Simple> {
        let start = self.start();

        if mode == SimpleMode::RangeOk && self.eat(Tok::KwRange).is_some() {
            let x = self.parse_expr()?;
            return Ok(Simple::Range {
                key: None,
                value: None,
                define: false,
                x,
            });
        }

        let lhs = self.expr_list_vec()?;

        if let Some(op) = self.peek().and_then(assign_op) {
            let op_span = self.bump();
            let plain = matches!(op, AssignOp::Assign | AssignOp::Define);
            if mode == SimpleMode::RangeOk && plain && self.eat(Tok::KwRange).is_some() {
                if lhs.len() > 2 {
                    return Err(Diag::parse(op_span, "range clause permits at most two iteration variables"));
                }
                let x = self.parse_expr()?;
                return Ok(Simple::Range {
                    key: Some(lhs[0]),
                    value: lhs.get(1).copied(),
                    define: op == AssignOp::Define,
                    x,
                });
            }
            let rhs = self.expr_list()?;
            let lhs = self.arena.list(lhs);
            let id = self.simple(SimpleStmt::Assign { lhs, op, rhs }, start);
            return Ok(Simple::Stmt(id));
        }

        if lhs.len() > 1 {
            return Err(self.err_expected("':=' or '=' or ','"));
        }
        let x = lhs[0];

        let stmt = match self.peek() {
            Some(Tok::Colon) if mode == SimpleMode::LabelOk => {
                if let Expr::Ident(sym) = self.arena.exprs[x] {
                    self.bump();
                    return Ok(Simple::Label(IdentName {
                        sym,
                        pos: self.arena.exprs.span(x),
                    }));
                }
                SimpleStmt::Expr(x)
            }
            Some(Tok::Arrow) => {
                self.bump();
                let value = self.parse_expr()?;
                SimpleStmt::Send { ch: x, value }
            }
            Some(Tok::Inc) => {
                self.bump();
                SimpleStmt::IncDec { x, inc: true }
            }
            Some(Tok::Dec) => {
                self.bump();
                SimpleStmt::IncDec { x, inc: false }
            }
            _ => SimpleStmt::Expr(x),
        };
        Ok(Simple::Stmt(self.simple(stmt, start)))
    }

    fn parse_basic_simple(&mut self) -> PResult<SimpleStmtId> {
        match self.parse_simple_stmt(SimpleMode::Basic)? {
            Simple::Stmt(id) => Ok(id),
            Simple::Range { .. } | Simple::Label(_) => Err(self.err_expected("simple statement")),
        }
    }

    fn cond_expr(&self, id: SimpleStmtId) -> PResult<ExprId> {
        match self.arena.simple_stmts[id] {
            SimpleStmt::Expr(x) => Ok(x),
            _ => Err(Diag::parse(
                self.arena.simple_stmts.span(id),
                "expected condition expression",
            )),
        }
    }

    fn parse_if(&mut self) -> PResult<Stmt> {
        self.expect(Tok::KwIf)?;
        let outer = std::mem::replace(&mut self.expr_lev, -1);
        let header = self.if_header();
        self.expr_lev = outer;
        let (init, cond) = header?;

        let then = self.parse_block()?;
        let els = match self.eat(Tok::KwElse) {
            None => None,
            Some(_) => {
                let start = self.start();
                let stmt = match self.peek() {
                    Some(Tok::KwIf) => self.nested(Self::parse_if)?,
                    Some(Tok::LBrace) => Stmt::Block(self.parse_block()?),
                    _ => return Err(self.err_expected("if statement or block")),
                };
                Some(self.stmt(stmt, start))
            }
        };

        Ok(Stmt::If {
            init,
            cond,
            then,
            els,
        })
    }

    fn if_header(&mut self) -> PResult<(Option<SimpleStmtId>, ExprId)> {
        if self.at(Tok::LBrace) {
            return Err(Diag::parse(self.cur_span(), "missing condition in if statement"));
        }

        let mut init = None;
        let mut s = None;
        if !self.at(Tok::Semi) {
            s = Some(self.parse_basic_simple()?);
        }
        if self.eat(Tok::Semi).is_some() {
            init = s.take();
            if self.at(Tok::LBrace) {
                return Err(Diag::parse(self.cur_span(), "missing condition in if statement"));
            }
            s = Some(self.parse_basic_simple()?);
        }

        match s {
            Some(s) => Ok((init, self.cond_expr(s)?)),
            None => Err(Diag::parse(self.cur_span(), "missing condition in if statement")),
        }
    }

    fn parse_switch(&mut self) -> PResult<Stmt> {
        self.expect(Tok::KwSwitch)?;
        let outer = std::mem::replace(&mut self.expr_lev, -1);
        let header = self.switch_header();
        self.expr_lev = outer;
        let (init, tag) = header?;

        self.expect(Tok::LBrace)?;
        let mut clauses = Vec::new();
        while matches!(self.peek(), Some(Tok::KwCase | Tok::KwDefault)) {
            let start = self.start();
            let (default, exprs) = match self.eat(Tok::KwCase) {
                Some(_) => (false, self.expr_list()?),
                None => {
                    self.bump();
                    (true, ListRef::EMPTY)
                }
            };
            self.expect(Tok::Colon)?;
            let body = self.parse_stmt_list()?;
            let span = self.since(start);
            clauses.push(self.arena.case_clauses.alloc(
                CaseClause {
                    default,
                    exprs,
                    body,
                },
                span,
            ));
        }
        self.expect(Tok::RBrace)?;

        let clauses = self.arena.list(clauses);
        Ok(Stmt::Switch { init, tag, clauses })
    }

    fn switch_header(&mut self) -> PResult<(Option<SimpleStmtId>, Option<SimpleStmtId>)> {
        let mut init = None;
        let mut tag = None;
        if !self.at(Tok::LBrace) {
            if !self.at(Tok::Semi) {
                tag = Some(self.parse_basic_simple()?);
            }
            if self.eat(Tok::Semi).is_some() {
                init = tag.take();
                if !self.at(Tok::LBrace) {
                    tag = Some(self.parse_basic_simple()?);
                }
            }
        }
        Ok((init, tag))
    }

    fn parse_select(&mut self) -> PResult<Stmt> {
        self.expect(Tok::KwSelect)?;
        self.expect(Tok::LBrace)?;
        let mut clauses = Vec::new();
        while matches!(self.peek(), Some(Tok::KwCase | Tok::KwDefault)) {
            let start = self.start();
            let comm = match self.eat(Tok::KwCase) {
                Some(_) => Some(self.parse_basic_simple()?),
                None => {
                    self.bump();
                    None
                }
            };
            self.expect(Tok::Colon)?;
            let body = self.parse_stmt_list()?;
            let span = self.since(start);
            clauses.push(
                self.arena
                    .comm_clauses
                    .alloc(CommClause { comm, body }, span),
            );
        }
        self.expect(Tok::RBrace)?;
        let clauses = self.arena.list(clauses);
        Ok(Stmt::Select { clauses })
    }

    fn parse_for(&mut self) -> PResult<Stmt> {
        self.expect(Tok::KwFor)?;
        let outer = std::mem::replace(&mut self.expr_lev, -1);
        let header = self.for_header();
        self.expr_lev = outer;
        let header = header?;
        let body = self.parse_block()?;

        Ok(match header {
            ForHeader::Loop { init, cond, post } => Stmt::For {
                init,
                cond,
                post,
                body,
            },
            ForHeader::Range {
                key,
                value,
                define,
                x,
            } => Stmt::Range {
                key,
                value,
                define,
                x,
                body,
            },
        })
    }

    fn for_header(&mut self) -> PResult<ForHeader> {
        let mut first = None;
        if !self.at(Tok::LBrace) && !self.at(Tok::Semi) {
            match self.parse_simple_stmt(SimpleMode::RangeOk)? {
                Simple::Range {
                    key,
                    value,
                    define,
                    x,
                } => {
                    return Ok(ForHeader::Range {
                        key,
                        value,
                        define,
                        x,
                    });
                }
                Simple::Stmt(id) => first = Some(id),
                Simple::Label(_) => return Err(self.err_expected("for clause")),
            }
        }

        if self.eat(Tok::Semi).is_none() {
            let cond = first.map(|s| self.cond_expr(s)).transpose()?;
            return Ok(ForHeader::Loop {
                init: None,
                cond,
                post: None,
            });
        }

        let init = first;
        let cond = match self.at(Tok::Semi) {
            true => None,
            false => {
                let s = self.parse_basic_simple()?;
                Some(self.cond_expr(s)?)
            }
        };
        self.expect(Tok::Semi)?;
        let post = match self.at(Tok::LBrace) {
            true => None,
            false => Some(self.parse_basic_simple()?),
        };
        Ok(ForHeader::Loop { init, cond, post })
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expr_list_vec(&mut self) -> PResult<Vec<ExprId>> {
        let mut list = vec![self.parse_expr()?];
        while self.eat(Tok::Comma).is_some() {
            list.push(self.parse_expr()?);
        }
        Ok(list)
    }

    fn expr_list(&mut self) -> PResult<ListRef<ExprId>> {
        let list = self.expr_list_vec()?;
        Ok(self.arena.list(list))
    }

    /// Expressions; types are accepted wherever an operand may appear.
    fn parse_expr(&mut self) -> PResult<ExprId> {
        self.nested(|p| p.parse_binary(1))
    }

    fn parse_binary(&mut self, min_prec: u8) -> PResult<ExprId> {
        let start = self.start();
        let outer_peak = self.begin_chain();
        let mut x = self.parse_unary()?;
        while let Some(op) = self.peek().and_then(binary_op) {
            if op.precedence() < min_prec {
                break;
            }
            self.chain_link()?;
            self.bump();
            let y = self.parse_binary(op.precedence() + 1)?;
            x = self.expr(Expr::Binary { op, x, y }, start);
        }
        self.end_chain(outer_peak);
        Ok(x)
    }

    fn parse_unary(&mut self) -> PResult<ExprId> {
        let start = self.start();
        let op = match self.peek() {
            Some(Tok::Plus) => UnaryOp::Plus,
            Some(Tok::Minus) => UnaryOp::Neg,
            Some(Tok::Bang) => UnaryOp::Not,
            Some(Tok::Caret) => UnaryOp::BitNot,
            Some(Tok::Amp) => UnaryOp::Addr,
            // `<-chan T` in operand position is a channel type.
            Some(Tok::Arrow) if self.peek_nth(1) == Some(Tok::KwChan) => {
                let typ = self.parse_type()?;
                return Ok(self.expr(Expr::Type(typ), start));
            }
            Some(Tok::Arrow) => UnaryOp::Recv,
            Some(Tok::Star) => {
                self.bump();
                let x = self.nested(Self::parse_unary)?;
                return Ok(self.expr(Expr::Star(x), start));
            }
            _ => return self.parse_primary(),
        };
        self.bump();
        let x = self.nested(Self::parse_unary)?;
        Ok(self.expr(Expr::Unary { op, x }, start))
    }

    fn parse_operand(&mut self) -> PResult<ExprId> {
        let start = self.start();
        let expr = match self.peek() {
            Some(Tok::Ident(name)) => {
                self.bump();
                Expr::Ident(self.interner.intern(name))
            }
            Some(Tok::IntLit(_)) => {
                self.bump();
                Expr::BasicLit(BasicLitKind::Int)
            }
            Some(Tok::FloatLit(_)) => {
                self.bump();
                Expr::BasicLit(BasicLitKind::Float)
            }
            Some(Tok::ImagLit(_)) => {
                self.bump();
                Expr::BasicLit(BasicLitKind::Imag)
            }
            Some(Tok::RuneLit(_)) => {
                self.bump();
                Expr::BasicLit(BasicLitKind::Rune)
            }
            Some(Tok::StringLit(_) | Tok::RawStringLit(_)) => {
                self.bump();
                Expr::BasicLit(BasicLitKind::String)
            }
            Some(Tok::LParen) => {
                self.bump();
                self.expr_lev += 1;
                let inner = self.parse_expr();
                self.expr_lev -= 1;
                let inner = inner?;
                self.expect(Tok::RParen)?;
                Expr::Paren(inner)
            }
            Some(Tok::KwFunc) => return self.parse_func_type_or_lit(),
            Some(Tok::LBrack | Tok::KwMap | Tok::KwChan | Tok::KwStruct | Tok::KwInterface) => {
                Expr::Type(self.parse_type()?)
            }
            _ => return Err(self.err_expected("expression")),
        };
        Ok(self.expr(expr, start))
    }

    fn parse_func_type_or_lit(&mut self) -> PResult<ExprId> {
        let start = self.start();
        self.expect(Tok::KwFunc)?;
        let sig_start = self.start();
        let sig = self.parse_signature(sig_start)?;

        if !self.at(Tok::LBrace) {
            let typ = self.ty(Type::Func(sig), start);
            return Ok(self.expr(Expr::Type(typ), start));
        }

        let body = self.parse_body()?;
        Ok(self.expr(Expr::FuncLit { sig, body }, start))
    }

    fn parse_primary(&mut self) -> PResult<ExprId> {
        let start = self.start();
        let outer_peak = self.begin_chain();
        let mut x = self.parse_operand()?;
        loop {
            if matches!(self.peek(), Some(Tok::Dot | Tok::LBrack | Tok::LParen)) {
                self.chain_link()?;
            }
            x = match self.peek() {
                Some(Tok::Dot) => {
                    self.bump();
                    match self.peek() {
                        Some(Tok::Ident(_)) => {
                            let sel = self.ident()?;
                            self.expr(Expr::Selector { x, sel }, start)
                        }
                        Some(Tok::LParen) => {
                            self.bump();
                            let typ = match self.eat(Tok::KwType) {
                                Some(_) => None,
                                None => Some(self.parse_type()?),
                            };
                            self.expect(Tok::RParen)?;
                            self.expr(Expr::TypeAssert { x, typ }, start)
                        }
                        _ => return Err(self.err_expected("selector or type assertion")),
                    }
                }
                Some(Tok::LBrack) => self.parse_index_or_slice(x, start)?,
                Some(Tok::LParen) => self.parse_call(x, start)?,
                Some(Tok::LBrace) if self.composite_allowed(x) => {
                    self.chain_link()?;
                    self.parse_composite_lit(Some(x), start)?
                }
                _ => {
                    self.end_chain(outer_peak);
                    return Ok(x);
                }
            };
        }
    }

    fn is_type_name(&self, x: ExprId) -> bool {
        match self.arena.exprs[x] {
            Expr::Ident(_) => true,
            Expr::Selector { x, .. } => matches!(self.arena.exprs[x], Expr::Ident(_)),
            _ => false,
        }
    }

    /// Whether `{` after `x` opens a composite literal. Bare type names are
    /// not literal types inside control clause headers (`if x == T {`).
    fn composite_allowed(&self, x: ExprId) -> bool {
        match self.arena.exprs[x] {
            Expr::Ident(_) | Expr::Selector { .. } => self.expr_lev >= 0 && self.is_type_name(x),
            Expr::Index { x: base, .. } => self.expr_lev >= 0 && self.is_type_name(base),
            Expr::Type(t) => matches!(
                self.arena.types[t],
                Type::Array { .. } | Type::Slice(_) | Type::Map { .. } | Type::Struct { .. }
            ),
            _ => false,
        }
    }

    fn parse_index_or_slice(&mut self, x: ExprId, start: usize) -> PResult<ExprId> {
        self.expect(Tok::LBrack)?;
        self.expr_lev += 1;
        let expr = self.index_or_slice_inner(x);
        self.expr_lev -= 1;
        let expr = expr?;
        self.expect(Tok::RBrack)?;
        Ok(self.expr(expr, start))
    }

    fn index_or_slice_inner(&mut self, x: ExprId) -> PResult<Expr> {
        let mut parts: [Option<ExprId>; 3] = [None; 3];
        if !self.at(Tok::Colon) {
            parts[0] = Some(self.parse_expr()?);
        }

        if let (Some(first), false) = (parts[0], self.at(Tok::Colon)) {
            let mut indices = vec![first];
            while self.eat(Tok::Comma).is_some() && !self.at(Tok::RBrack) {
                indices.push(self.parse_expr()?);
            }
            let indices = self.arena.list(indices);
            return Ok(Expr::Index { x, indices });
        }

        let mut colons = 0;
        while colons < 2 {
            let Some(colon) = self.eat(Tok::Colon) else {
                break;
            };
            colons += 1;
            if !matches!(self.peek(), Some(Tok::Colon | Tok::RBrack)) {
                parts[colons] = Some(self.parse_expr()?);
            } else if colons == 2 || (colons == 1 && self.at(Tok::Colon)) {
                // 3-index slices require both the middle and final index.
                if colons == 2 || parts[1].is_none() {
                    return Err(Diag::parse(colon, "middle and final index required in 3-index slice"));
                }
            }
        }

        Ok(Expr::Slice {
            x,
            lo: parts[0],
            hi: parts[1],
            max: parts[2],
        })
    }

    fn parse_call(&mut self, fun: ExprId, start: usize) -> PResult<ExprId> {
        self.expect(Tok::LParen)?;
        self.expr_lev += 1;
        let args = self.call_args();
        self.expr_lev -= 1;
        let (args, ellipsis) = args?;
        self.expect(Tok::RParen)?;
        let args = self.arena.list(args);
        Ok(self.expr(
            Expr::Call {
                fun,
                args,
                ellipsis,
            },
            start,
        ))
    }

    fn call_args(&mut self) -> PResult<(Vec<ExprId>, bool)> {
        let mut args = Vec::new();
        let mut ellipsis = false;
        while !self.at(Tok::RParen) {
            args.push(self.parse_expr()?);
            if self.eat(Tok::Ellipsis).is_some() {
                ellipsis = true;
            }
            if self.eat(Tok::Comma).is_none() {
                break;
            }
        }
        Ok((args, ellipsis))
    }

    fn parse_composite_lit(&mut self, typ: Option<ExprId>, start: usize) -> PResult<ExprId> {
        self.expect(Tok::LBrace)?;
        self.expr_lev += 1;
        let elems = self.literal_elems();
        self.expr_lev -= 1;
        let elems = elems?;
        self.expect(Tok::RBrace)?;
        Ok(self.expr(Expr::CompositeLit { typ, elems }, start))
    }

    fn literal_elems(&mut self) -> PResult<ListRef<KeyedElement>> {
        let mut elems = Vec::new();
        while !self.at(Tok::RBrace) {
            let mut value = self.parse_element()?;
            let mut key = None;
            if self.eat(Tok::Colon).is_some() {
                key = Some(value);
                value = self.parse_element()?;
            }
            elems.push(KeyedElement { key, value });
            if self.eat(Tok::Comma).is_none() {
                break;
            }
        }
        Ok(self.arena.list(elems))
    }

    fn parse_element(&mut self) -> PResult<ExprId> {
        if self.at(Tok::LBrace) {
            let start = self.start();
            return self.nested(|p| p.parse_composite_lit(None, start));
        }
        self.parse_expr()
    }
}
