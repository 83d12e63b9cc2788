//! End-to-end: source text and offset in, snippet out.

use goiferr::{iferr, IferrError, NoopSink, SnippetOptions};

const FN_PRE: &str = "package main\nfunc foo() ";
const FN_POST: &str = " {}";

/// Runs `iferr` with the cursor just inside `func foo() <results> {}` and
/// returns the value list of the snippet.
fn values_for(results: &str, opts: &SnippetOptions) -> Result<String, IferrError> {
    let src = format!("{FN_PRE}{results}{FN_POST}");
    let out = iferr(&src, FN_PRE.len() + 1, opts, &NoopSink)?;
    let body = out
        .strip_prefix("if err != nil {\n\treturn ")
        .and_then(|rest| rest.strip_suffix("\n}\n"))
        .unwrap_or_else(|| panic!("unexpected prefix or suffix: {out:?}"));
    Ok(body.to_string())
}

fn assert_values(results: &str, want: &str) {
    let got = values_for(results, &SnippetOptions::default())
        .unwrap_or_else(|e| panic!("iferr failed for {results:?}: {e}"));
    assert_eq!(got, want, "results {results:?}");
}

#[test]
fn interface_and_error() {
    assert_values("(interface{}, error)", "nil, err");
}

#[test]
fn map_and_error() {
    assert_values("(map[string]struct{}, error)", "nil, err");
}

#[test]
fn chan_and_error() {
    assert_values("(chan bool, error)", "nil, err");
}

#[test]
fn bool_and_error() {
    assert_values("(bool, error)", "false, err");
}

#[test]
fn named_struct_and_error() {
    assert_values("(foo, error)", "foo{}, err");
}

#[test]
fn pointer_and_error() {
    assert_values("(*foo, error)", "nil, err");
}

#[test]
fn custom_error_expression() {
    let opts = SnippetOptions::default().with_error_expr("customWrap(err)");
    assert_eq!(
        values_for("(*foo, error)", &opts).unwrap(),
        "nil, customWrap(err)"
    );
}

#[test]
fn more_shapes() {
    assert_values("(string, int64, error)", r#""", 0, err"#);
    assert_values("(any, error)", "nil, err");
    assert_values("([]byte, error)", "nil, err");
    assert_values("(io.Reader, error)", "nil, err");
    assert_values("(func() int, error)", "nil, err");
    assert_values("(n int, err error)", "0, err");
    assert_values("(a, b int, err error)", "0, 0, err");
    assert_values("(error, error)", "nil, err");
    assert_values("error", "err");
    assert_values("(Box[int], error)", "Box[int]{}, err");
}

#[test]
fn no_results_bare_return() {
    let src = format!("{FN_PRE}{FN_POST}");
    let out = iferr(&src, FN_PRE.len() + 1, &SnippetOptions::default(), &NoopSink).unwrap();
    assert_eq!(out, "if err != nil {\n\treturn\n}\n");
}

#[test]
fn generic_function_returns_new_of_type_param() {
    let src = "package main\n\nfunc first[T any](xs []T) (T, error) {\n\treturn xs[0], nil\n}\n";
    let out = iferr(src, 40, &SnippetOptions::default(), &NoopSink).unwrap();
    assert_eq!(out, "if err != nil {\n\treturn *new(T), err\n}\n");
}

#[test]
fn cursor_in_nested_literal() {
    let src = "package main

func load() (*Config, error) {
	parse := func(b []byte) (int, error) {
		return 0, nil
	}
	_ = parse
	return nil, nil
}
";
    let inner = src.find("return 0").unwrap();
    let out = iferr(src, inner, &SnippetOptions::default(), &NoopSink).unwrap();
    assert_eq!(out, "if err != nil {\n\treturn 0, err\n}\n");

    let outer = src.find("_ = parse").unwrap();
    let out = iferr(src, outer, &SnippetOptions::default(), &NoopSink).unwrap();
    assert_eq!(out, "if err != nil {\n\treturn nil, err\n}\n");
}

#[test]
fn failures_produce_no_output() {
    let opts = SnippetOptions::default();
    assert!(matches!(
        iferr("package main\nfunc foo() {", 20, &opts, &NoopSink),
        Err(IferrError::Parse(_))
    ));
    assert!(matches!(
        iferr("package main\n\nvar x = 1\n", 16, &opts, &NoopSink),
        Err(IferrError::NotFound { offset: 16 })
    ));
}

#[test]
fn deeply_nested_source_is_a_parse_error() {
    let n = 10_000;
    let src = format!(
        "package p\nfunc f() (int, error) {{ x := {}1{}; return x, nil }}",
        "(".repeat(n),
        ")".repeat(n)
    );
    match iferr(&src, 12, &SnippetOptions::default(), &NoopSink) {
        Err(IferrError::Parse(f)) => {
            assert!(f.to_string().contains("exceeded max nesting depth"), "{f}")
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}
