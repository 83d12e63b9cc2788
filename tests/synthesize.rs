use std::cell::RefCell;
use std::fmt;

use goiferr::{
    synthesize, zero_value, ChanDir, DiagnosticSink, NoopSink, SnippetOptions, TypeExpr,
};

#[derive(Default)]
struct Recorder(RefCell<Vec<String>>);

impl DiagnosticSink for Recorder {
    fn debug(&self, args: fmt::Arguments<'_>) {
        self.0.borrow_mut().push(args.to_string());
    }
}

fn named(name: &str) -> TypeExpr {
    TypeExpr::named(name)
}

fn values(results: &[TypeExpr]) -> String {
    values_with(results, &SnippetOptions::default())
}

fn values_with(results: &[TypeExpr], opts: &SnippetOptions) -> String {
    let out = synthesize(results, opts, &NoopSink);
    let body = out
        .strip_prefix(&format!("if {} != nil {{\n\treturn ", opts.error_ident))
        .and_then(|rest| rest.strip_suffix("\n}\n"))
        .unwrap_or_else(|| panic!("unexpected template: {out:?}"));
    body.to_string()
}

#[test]
fn empty_results_give_bare_return() {
    assert_eq!(
        synthesize(&[], &SnippetOptions::default(), &NoopSink),
        "if err != nil {\n\treturn\n}\n"
    );
}

#[test]
fn precedence_table() {
    let cases: Vec<(TypeExpr, &str)> = vec![
        (named("bool"), "false"),
        (named("string"), r#""""#),
        (named("any"), "nil"),
        (TypeExpr::Interface { methods: vec![] }, "nil"),
        (
            TypeExpr::Interface {
                methods: vec!["String() string".into()],
            },
            "nil",
        ),
        (named("int"), "0"),
        (named("float64"), "0"),
        (named("byte"), "0"),
        (named("rune"), "0"),
        (named("complex128"), "0"),
        (TypeExpr::pointer(named("Foo")), "nil"),
        (TypeExpr::slice(named("int")), "nil"),
        (
            TypeExpr::Array {
                len: "4".into(),
                elem: Box::new(named("byte")),
            },
            "nil",
        ),
        (
            TypeExpr::Map {
                key: Box::new(named("string")),
                value: Box::new(named("int")),
            },
            "nil",
        ),
        (
            TypeExpr::Chan {
                dir: ChanDir::Both,
                elem: Box::new(named("bool")),
            },
            "nil",
        ),
        (TypeExpr::qualified("time", "Time"), "nil"),
        (
            TypeExpr::Func {
                params: vec![],
                results: vec![],
                variadic: false,
            },
            "nil",
        ),
        (TypeExpr::TypeParam("T".into()), "*new(T)"),
        (named("Foo"), "Foo{}"),
        (
            TypeExpr::Named {
                name: "Pair".into(),
                args: vec![named("int"), named("string")],
            },
            "Pair[int, string]{}",
        ),
        (TypeExpr::Struct { fields: vec![] }, "struct{}{}"),
    ];
    for (typ, want) in cases {
        assert_eq!(zero_value(&typ, &NoopSink), want, "{typ}");
    }
}

#[test]
fn error_slot_gets_error_expression() {
    assert_eq!(values(&[named("int"), named("error")]), "0, err");
    assert_eq!(values(&[named("error")]), "err");
}

#[test]
fn only_last_error_slot_gets_error_expression() {
    assert_eq!(
        values(&[named("error"), named("string"), named("error")]),
        r#"nil, "", err"#
    );
}

#[test]
fn no_error_slot_only_zero_values() {
    assert_eq!(values(&[named("int"), named("bool")]), "0, false");
}

#[test]
fn custom_error_expression() {
    let opts = SnippetOptions::default().with_error_expr(r#"fmt.Errorf("load: %w", err)"#);
    assert_eq!(
        values_with(&[TypeExpr::pointer(named("Config")), named("error")], &opts),
        r#"nil, fmt.Errorf("load: %w", err)"#
    );
}

#[test]
fn custom_error_ident() {
    let opts = SnippetOptions::default().with_error_ident("e");
    let out = synthesize(&[named("error")], &opts, &NoopSink);
    assert_eq!(out, "if e != nil {\n\treturn e\n}\n");

    let out = synthesize(&[], &opts, &NoopSink);
    assert_eq!(out, "if e != nil {\n\treturn\n}\n");
}

#[test]
fn unsupported_type_is_passed_through_with_diagnostic() {
    let sink = Recorder::default();
    let results = [TypeExpr::Unsupported("~int | ~string".into()), named("error")];
    let out = synthesize(&results, &SnippetOptions::default(), &sink);
    assert_eq!(out, "if err != nil {\n\treturn ~int | ~string, err\n}\n");
    let lines = sink.0.into_inner();
    assert!(
        lines.iter().any(|l| l.contains("unsupported type: ~int | ~string")),
        "{lines:?}"
    );
}

#[test]
fn deterministic() {
    let results = [
        TypeExpr::qualified("io", "Reader"),
        named("Foo"),
        TypeExpr::TypeParam("T".into()),
        named("error"),
    ];
    let opts = SnippetOptions::default();
    let first = synthesize(&results, &opts, &NoopSink);
    for _ in 0..10 {
        assert_eq!(synthesize(&results, &opts, &NoopSink), first);
    }
    assert_eq!(first, "if err != nil {\n\treturn nil, Foo{}, *new(T), err\n}\n");
}
