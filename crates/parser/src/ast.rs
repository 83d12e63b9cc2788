//! # Go syntax tree
//!
//! Arena-allocated AST for one Go compilation unit.
//!
//! - **Nodes** live in typed arenas (`SpannedArena<T>`) and are referenced by
//!   `Id<T>`; spans sit in a parallel side table.
//! - **Lists** are slices of centralized buffers referenced by `ListRef<T>`.
//! - **Identifiers** are interned `Symbol`s.
//!
//! The tree is syntax only. Types appearing in expression position (the
//! `[]byte` in `[]byte(s)`, a composite literal's `map[K]V`) are wrapped in
//! `Expr::Type`. Traversal lives in [`crate::walk`]; `#[derive(WalkAst)]`
//! generates the structural `Walk` impls.

use ast_derive::WalkAst;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::hash::{BuildHasher, BuildHasherDefault, Hasher, RandomState};

pub use crate::error::Span;

// =============================================================================
// Core Foundation Types
// =============================================================================

/// Type-safe handle for arena-allocated nodes.
#[derive(Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Id<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for Id<T> {}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Id<T> {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn to_usize(self) -> usize {
        self.raw as usize
    }
}

/// Typed reference into one of the `ExtraData` buffers.
#[derive(Debug, PartialEq, Eq)]
pub struct ListRef<T> {
    start: u32,
    len: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for ListRef<T> {}

impl<T> Clone for ListRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Default for ListRef<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> ListRef<T> {
    pub const EMPTY: Self = Self::new(0, 0);

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        Self {
            start,
            len,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    const fn range(&self) -> core::ops::Range<usize> {
        self.start as usize..(self.start + self.len) as usize
    }
}

// =============================================================================
// Symbol Interning
// =============================================================================

/// Interned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Symbol(u32);

/// Identifier occurrence (interned symbol + source position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct IdentName {
    pub sym: Symbol,
    #[walk(skip)]
    pub pos: Span,
}

/// Identity hasher for pre-hashed `u64` keys.
#[derive(Default)]
struct U64IdentityHasher(u64);

impl Hasher for U64IdentityHasher {
    fn write(&mut self, _b: &[u8]) {
        unreachable!("U64IdentityHasher only supports write_u64")
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

type U64IdentityBuild = BuildHasherDefault<U64IdentityHasher>;

/// String interner: strings are stored once and found through hash buckets.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    buckets: HashMap<u64, SmallVec<[Symbol; 1]>, U64IdentityBuild>,
    state: RandomState,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `s`, returning the existing symbol when already present.
    pub fn intern(&mut self, s: &str) -> Symbol {
        let h = self.state.hash_one(s);
        let bucket = self.buckets.entry(h).or_default();

        if let Some(&sym) = bucket
            .iter()
            .find(|sym| self.strings[sym.0 as usize].as_ref() == s)
        {
            return sym;
        }

        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.into());
        bucket.push(sym);
        sym
    }

    /// # Panics
    /// Panics on a symbol from another interner.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }
}

// =============================================================================
// Arena Allocation
// =============================================================================

/// Nodes plus their spans, stored in parallel vectors.
#[derive(Debug)]
pub struct SpannedArena<T> {
    data: Vec<T>,
    spans: Vec<Span>,
}

impl<T> Default for SpannedArena<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            spans: Vec::new(),
        }
    }
}

impl<T> SpannedArena<T> {
    #[inline]
    pub fn alloc(&mut self, node: T, span: Span) -> Id<T> {
        let id = Id::from_raw(self.data.len() as u32);
        self.data.push(node);
        self.spans.push(span);
        id
    }

    #[inline]
    pub fn span(&self, id: Id<T>) -> Span {
        self.spans[id.to_usize()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Index<Id<T>> for SpannedArena<T> {
    type Output = T;
    fn index(&self, id: Id<T>) -> &T {
        &self.data[id.to_usize()]
    }
}

impl<T> IndexMut<Id<T>> for SpannedArena<T> {
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        &mut self.data[id.to_usize()]
    }
}

pub type DeclId = Id<Decl>;
pub type FuncDeclId = Id<FuncDecl>;
pub type StmtId = Id<Stmt>;
pub type SimpleStmtId = Id<SimpleStmt>;
pub type ExprId = Id<Expr>;
pub type TypeId = Id<Type>;
pub type FieldId = Id<Field>;
pub type SignatureId = Id<Signature>;
pub type CaseClauseId = Id<CaseClause>;
pub type CommClauseId = Id<CommClause>;

// =============================================================================
// Centralized List Storage
// =============================================================================

/// Buffers that every `ListRef<T>` points into.
#[derive(Debug, Default)]
pub struct ExtraData {
    pub ident_names: Vec<IdentName>,
    pub decls: Vec<DeclId>,
    pub specs: Vec<Spec>,
    pub stmts: Vec<StmtId>,
    pub exprs: Vec<ExprId>,
    pub types: Vec<TypeId>,
    pub fields: Vec<FieldId>,
    pub keyed_elems: Vec<KeyedElement>,
    pub case_clauses: Vec<CaseClauseId>,
    pub comm_clauses: Vec<CommClauseId>,
    pub interface_elems: Vec<InterfaceElem>,
    pub type_terms: Vec<TypeTerm>,
}

/// Central arena holding all nodes and list buffers of one file.
#[derive(Debug, Default)]
pub struct AstArena {
    pub decls: SpannedArena<Decl>,
    pub funcs: SpannedArena<FuncDecl>,
    pub stmts: SpannedArena<Stmt>,
    pub simple_stmts: SpannedArena<SimpleStmt>,
    pub exprs: SpannedArena<Expr>,
    pub types: SpannedArena<Type>,
    pub signatures: SpannedArena<Signature>,
    pub fields: SpannedArena<Field>,
    pub case_clauses: SpannedArena<CaseClause>,
    pub comm_clauses: SpannedArena<CommClause>,
    pub extras: ExtraData,
}

/// Typed access to the list buffers, used by the generic `ListRef` walk.
pub trait ListSlice<T> {
    fn slice(&self, r: ListRef<T>) -> &[T];
}

/// Typed construction of lists, used by the parser.
pub trait ListAlloc<T> {
    fn list(&mut self, items: impl IntoIterator<Item = T>) -> ListRef<T>;
}

macro_rules! impl_lists {
    ($($t:ty => $buf:ident),* $(,)?) => {
        $(
            impl ListSlice<$t> for AstArena {
                #[inline]
                fn slice(&self, r: ListRef<$t>) -> &[$t] {
                    &self.extras.$buf[r.range()]
                }
            }

            impl ListAlloc<$t> for AstArena {
                fn list(&mut self, items: impl IntoIterator<Item = $t>) -> ListRef<$t> {
                    let buf = &mut self.extras.$buf;
                    let start = buf.len();
                    buf.extend(items);
                    ListRef::new(start as u32, (buf.len() - start) as u32)
                }
            }
        )*
    };
}

impl_lists! {
    IdentName => ident_names,
    DeclId => decls,
    Spec => specs,
    StmtId => stmts,
    ExprId => exprs,
    TypeId => types,
    FieldId => fields,
    KeyedElement => keyed_elems,
    CaseClauseId => case_clauses,
    CommClauseId => comm_clauses,
    InterfaceElem => interface_elems,
    TypeTerm => type_terms,
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `ListSlice::slice`.
    #[inline]
    pub fn get<T>(&self, r: ListRef<T>) -> &[T]
    where
        Self: ListSlice<T>,
    {
        self.slice(r)
    }
}

// =============================================================================
// Source File / Declarations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct SourceFile {
    pub package: IdentName,
    pub decls: ListRef<DeclId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenDeclKind {
    Import,
    Const,
    Var,
    Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Decl {
    Gen {
        kind: GenDeclKind,
        specs: ListRef<Spec>,
    },
    Func(FuncDeclId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Spec {
    Import {
        name: Option<IdentName>,
        #[walk(skip)]
        path: Span,
    },
    Value {
        names: ListRef<IdentName>,
        typ: Option<TypeId>,
        values: ListRef<ExprId>,
    },
    Type {
        name: IdentName,
        type_params: ListRef<FieldId>,
        alias: bool,
        typ: TypeId,
    },
}

/// Function or method declaration. Its span runs from `func` to the closing
/// brace of the body, or to the end of the signature when there is no body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct FuncDecl {
    /// Empty for plain functions.
    pub recv: ListRef<FieldId>,
    pub name: IdentName,
    pub type_params: ListRef<FieldId>,
    pub sig: SignatureId,
    pub body: Option<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Signature {
    pub params: ListRef<FieldId>,
    pub results: ListRef<FieldId>,
}

/// Parameter, result, struct field or type parameter.
///
/// An unnamed entry (`int` in `func() (int, error)`, an embedded struct
/// field) has an empty `names` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Field {
    pub names: ListRef<IdentName>,
    pub typ: TypeId,
    pub variadic: bool,
    #[walk(skip)]
    pub tag: Option<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Block {
    pub stmts: ListRef<StmtId>,
    #[walk(skip)]
    pub span: Span,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum ArrayLen {
    Expr(ExprId),
    /// `[...]T`, only meaningful in composite literals.
    Ellipsis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Type {
    /// `T`, `pkg.T`, `T[int]`, `pkg.T[K, V]`.
    Named {
        pkg: Option<IdentName>,
        name: IdentName,
        args: ListRef<TypeId>,
    },
    Pointer(TypeId),
    Slice(TypeId),
    Array {
        len: ArrayLen,
        elem: TypeId,
    },
    Map {
        key: TypeId,
        value: TypeId,
    },
    Chan {
        dir: ChanDir,
        elem: TypeId,
    },
    Func(SignatureId),
    Struct {
        fields: ListRef<FieldId>,
    },
    Interface {
        elems: ListRef<InterfaceElem>,
    },
    /// Constraint union `~int | string`; only valid as a constraint.
    Union {
        terms: ListRef<TypeTerm>,
    },
    Paren(TypeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum InterfaceElem {
    Method { name: IdentName, sig: SignatureId },
    Embed(TypeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct TypeTerm {
    pub tilde: bool,
    pub typ: TypeId,
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicLitKind {
    Int,
    Float,
    Imag,
    Rune,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
    BitNot,
    Addr,
    Recv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    LOr,
    LAnd,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Or,
    Xor,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    And,
    AndNot,
}

impl BinaryOp {
    pub const fn precedence(self) -> u8 {
        match self {
            Self::LOr => 1,
            Self::LAnd => 2,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => 3,
            Self::Add | Self::Sub | Self::Or | Self::Xor => 4,
            Self::Mul
            | Self::Div
            | Self::Rem
            | Self::Shl
            | Self::Shr
            | Self::And
            | Self::AndNot => 5,
        }
    }
}

/// `key: value` or a bare `value` inside a composite literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct KeyedElement {
    pub key: Option<ExprId>,
    pub value: ExprId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Expr {
    Ident(Symbol),
    BasicLit(BasicLitKind),
    /// `typ` is `None` for elided inner literals (`{1, 2}` in `[][]int{{1, 2}}`).
    CompositeLit {
        typ: Option<ExprId>,
        elems: ListRef<KeyedElement>,
    },
    /// Function literal; its span runs from `func` to the closing brace.
    FuncLit {
        sig: SignatureId,
        body: Block,
    },
    Paren(ExprId),
    Selector {
        x: ExprId,
        sel: IdentName,
    },
    /// `x[i]`, or generic instantiation `f[int, string]`.
    Index {
        x: ExprId,
        indices: ListRef<ExprId>,
    },
    Slice {
        x: ExprId,
        lo: Option<ExprId>,
        hi: Option<ExprId>,
        max: Option<ExprId>,
    },
    /// `x.(T)`; `typ` is `None` for `x.(type)` in a type switch.
    TypeAssert {
        x: ExprId,
        typ: Option<TypeId>,
    },
    Call {
        fun: ExprId,
        args: ListRef<ExprId>,
        ellipsis: bool,
    },
    Star(ExprId),
    Unary {
        op: UnaryOp,
        x: ExprId,
    },
    Binary {
        op: BinaryOp,
        x: ExprId,
        y: ExprId,
    },
    Type(TypeId),
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Define,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum SimpleStmt {
    Expr(ExprId),
    Send {
        ch: ExprId,
        value: ExprId,
    },
    IncDec {
        x: ExprId,
        inc: bool,
    },
    Assign {
        lhs: ListRef<ExprId>,
        op: AssignOp,
        rhs: ListRef<ExprId>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Stmt {
    Decl(DeclId),
    Labeled {
        label: IdentName,
        stmt: Option<StmtId>,
    },
    Simple(SimpleStmtId),
    Go(ExprId),
    Defer(ExprId),
    Return(ListRef<ExprId>),
    Branch {
        kind: BranchKind,
        label: Option<IdentName>,
    },
    Block(Block),
    If {
        init: Option<SimpleStmtId>,
        cond: ExprId,
        then: Block,
        els: Option<StmtId>,
    },
    /// Expression and type switches; a type switch has an `x.(type)` tag.
    Switch {
        init: Option<SimpleStmtId>,
        tag: Option<SimpleStmtId>,
        clauses: ListRef<CaseClauseId>,
    },
    Select {
        clauses: ListRef<CommClauseId>,
    },
    For {
        init: Option<SimpleStmtId>,
        cond: Option<ExprId>,
        post: Option<SimpleStmtId>,
        body: Block,
    },
    Range {
        key: Option<ExprId>,
        value: Option<ExprId>,
        define: bool,
        x: ExprId,
        body: Block,
    },
    Empty,
}

/// `case a, b:` or `default:` (empty `exprs` and `default` set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct CaseClause {
    pub default: bool,
    pub exprs: ListRef<ExprId>,
    pub body: ListRef<StmtId>,
}

/// `case <comm>:` in a select; `comm` is `None` for `default:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct CommClause {
    pub comm: Option<SimpleStmtId>,
    pub body: ListRef<StmtId>,
}
