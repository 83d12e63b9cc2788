use crate::ast::*;

/// What a visitor wants after entering a function-like node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Walk the node's signature and body.
    Descend,
    /// Skip the whole subtree.
    Prune,
}

// Core traits
pub trait Walk<'ast> {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V);
}

/// Depth-first visitor. Every hook defaults to walking the node's children;
/// function declarations and literals first consult their `enter_*` hook.
pub trait Visitor<'ast> {
    fn visit_source_file(&mut self, a: &'ast AstArena, f: &'ast SourceFile) {
        f.walk(a, self);
    }

    fn visit_decl(&mut self, a: &'ast AstArena, id: DeclId) {
        a.decls[id].walk(a, self);
    }

    fn visit_func_decl(&mut self, a: &'ast AstArena, id: FuncDeclId) {
        if self.enter_func_decl(a, id) == Flow::Descend {
            a.funcs[id].walk(a, self);
        }
    }

    fn enter_func_decl(&mut self, _a: &'ast AstArena, _id: FuncDeclId) -> Flow {
        Flow::Descend
    }

    fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
        let expr = &a.exprs[id];
        if matches!(expr, Expr::FuncLit { .. }) && self.enter_func_lit(a, id) == Flow::Prune {
            return;
        }
        expr.walk(a, self);
    }

    /// Called with the id of an `Expr::FuncLit`.
    fn enter_func_lit(&mut self, _a: &'ast AstArena, _id: ExprId) -> Flow {
        Flow::Descend
    }

    fn visit_stmt(&mut self, a: &'ast AstArena, id: StmtId) {
        a.stmts[id].walk(a, self);
    }

    fn visit_simple_stmt(&mut self, a: &'ast AstArena, id: SimpleStmtId) {
        a.simple_stmts[id].walk(a, self);
    }

    fn visit_type(&mut self, a: &'ast AstArena, id: TypeId) {
        a.types[id].walk(a, self);
    }

    fn visit_field(&mut self, a: &'ast AstArena, id: FieldId) {
        a.fields[id].walk(a, self);
    }

    fn visit_signature(&mut self, a: &'ast AstArena, id: SignatureId) {
        a.signatures[id].walk(a, self);
    }

    fn visit_case_clause(&mut self, a: &'ast AstArena, id: CaseClauseId) {
        a.case_clauses[id].walk(a, self);
    }

    fn visit_comm_clause(&mut self, a: &'ast AstArena, id: CommClauseId) {
        a.comm_clauses[id].walk(a, self);
    }
}

macro_rules! impl_walk_for_ids {
    ($($id:ty => $visit:ident),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $id {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
                    v.$visit(a, *self);
                }
            }
        )*
    };
}

impl_walk_for_ids! {
    DeclId => visit_decl,
    FuncDeclId => visit_func_decl,
    StmtId => visit_stmt,
    SimpleStmtId => visit_simple_stmt,
    ExprId => visit_expr,
    TypeId => visit_type,
    FieldId => visit_field,
    SignatureId => visit_signature,
    CaseClauseId => visit_case_clause,
    CommClauseId => visit_comm_clause,
}

impl<'ast, T> Walk<'ast> for ListRef<T>
where
    AstArena: ListSlice<T>,
    T: Walk<'ast>,
{
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        for item in a.slice(*self) {
            item.walk(a, v);
        }
    }
}

impl<'ast, T: Walk<'ast>> Walk<'ast> for Option<T> {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        if let Some(x) = self {
            x.walk(a, v);
        }
    }
}

// Leaves
macro_rules! impl_walk_noop {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $ty {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, _: &'ast AstArena, _: &mut V) {}
            }
        )*
    };
}

impl_walk_noop! {
    Symbol,
    bool,
    GenDeclKind,
    BasicLitKind,
    ChanDir,
    UnaryOp,
    BinaryOp,
    AssignOp,
    BranchKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_source;

    #[derive(Default)]
    struct Counter {
        funcs: usize,
        lits: usize,
        prune_lits: bool,
    }

    impl<'ast> Visitor<'ast> for Counter {
        fn enter_func_decl(&mut self, _a: &'ast AstArena, _id: FuncDeclId) -> Flow {
            self.funcs += 1;
            Flow::Descend
        }

        fn enter_func_lit(&mut self, _a: &'ast AstArena, _id: ExprId) -> Flow {
            self.lits += 1;
            if self.prune_lits {
                Flow::Prune
            } else {
                Flow::Descend
            }
        }
    }

    const SRC: &str = "package p\n\nfunc a() {\n\tf := func() {\n\t\tg := func() {}\n\t\tg()\n\t}\n\tf()\n}\n\nfunc b() {}\n";

    #[test]
    fn visits_every_function_like_node() {
        let parsed = parse_source(SRC).unwrap();
        let mut c = Counter::default();
        parsed.walk(&mut c);
        assert_eq!((c.funcs, c.lits), (2, 2));
    }

    #[test]
    fn prune_skips_nested_literals() {
        let parsed = parse_source(SRC).unwrap();
        let mut c = Counter {
            prune_lits: true,
            ..Counter::default()
        };
        parsed.walk(&mut c);
        assert_eq!((c.funcs, c.lits), (2, 1));
    }
}
