use std::cell::RefCell;
use std::fmt;

use goiferr::{locate, DiagnosticSink, IferrError, NoopSink, TypeExpr};

#[derive(Default)]
struct Recorder(RefCell<Vec<String>>);

impl DiagnosticSink for Recorder {
    fn debug(&self, args: fmt::Arguments<'_>) {
        self.0.borrow_mut().push(args.to_string());
    }
}

fn at(src: &str, needle: &str) -> usize {
    src.find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not in source"))
}

fn result_strings(src: &str, offset: usize) -> Vec<String> {
    locate(src, offset, &NoopSink)
        .unwrap()
        .results
        .iter()
        .map(ToString::to_string)
        .collect()
}

const NESTED: &str = "package p

func outer() (int, error) {
	f := func() (string, error) {
		g := func() bool {
			return true // in g
		}
		_ = g
		return \"\", nil // in f
	}
	_ = f
	return 0, nil // in outer
}
";

#[test]
fn innermost_function_wins() {
    let g = locate(NESTED, at(NESTED, "// in g"), &NoopSink).unwrap();
    assert!(g.is_anonymous());
    assert_eq!(g.results, vec![TypeExpr::named("bool")]);

    let f = locate(NESTED, at(NESTED, "// in f"), &NoopSink).unwrap();
    assert!(f.is_anonymous());
    assert_eq!(
        f.results,
        vec![TypeExpr::named("string"), TypeExpr::named("error")]
    );

    let outer = locate(NESTED, at(NESTED, "// in outer"), &NoopSink).unwrap();
    assert_eq!(outer.name.as_deref(), Some("outer"));
    assert_eq!(outer.to_string(), "outer");
    assert_eq!(
        outer.results,
        vec![TypeExpr::named("int"), TypeExpr::named("error")]
    );
}

#[test]
fn literal_displays_as_no_name() {
    let g = locate(NESTED, at(NESTED, "// in g"), &NoopSink).unwrap();
    assert_eq!(g.to_string(), "(no name)");
}

#[test]
fn span_boundaries_are_inside() {
    let src = "package p\n\nfunc f() error {\n\treturn nil\n}\n";
    let start = at(src, "func");
    let end = at(src, "}\n") + 1;

    let found = locate(src, start, &NoopSink).unwrap();
    assert_eq!((found.span.start as usize, found.span.end as usize), (start, end));
    assert!(locate(src, end, &NoopSink).is_ok());

    assert_eq!(
        locate(src, end + 1, &NoopSink),
        Err(IferrError::NotFound { offset: end + 1 })
    );
    assert_eq!(
        locate(src, start - 1, &NoopSink),
        Err(IferrError::NotFound { offset: start - 1 })
    );
}

#[test]
fn literal_boundaries_are_inside() {
    let src = "package p\n\nfunc f() {\n\tg := func() int { return 1 }\n\t_ = g\n}\n";
    let lit_start = at(src, "func() int");
    let lit_end = at(src, "1 }") + 3;

    assert!(locate(src, lit_start, &NoopSink).unwrap().is_anonymous());
    assert!(locate(src, lit_end, &NoopSink).unwrap().is_anonymous());
    let outside = locate(src, lit_start - 1, &NoopSink).unwrap();
    assert_eq!(outside.name.as_deref(), Some("f"));
}

#[test]
fn adjacent_functions() {
    let src = "package p\nfunc a() {}\nfunc b() int { return 0 }\n";
    let a_end = at(src, "{}") + 2;
    assert_eq!(
        locate(src, a_end, &NoopSink).unwrap().name.as_deref(),
        Some("a")
    );
    assert_eq!(
        locate(src, a_end + 1, &NoopSink).unwrap().name.as_deref(),
        Some("b")
    );
}

#[test]
fn offset_outside_every_function() {
    let err = locate(NESTED, 3, &NoopSink).unwrap_err();
    assert_eq!(err, IferrError::NotFound { offset: 3 });
    assert_eq!(err.to_string(), "no enclosing function at offset 3");

    let far = NESTED.len() + 100;
    assert!(matches!(
        locate(NESTED, far, &NoopSink),
        Err(IferrError::NotFound { .. })
    ));
}

#[test]
fn function_without_results() {
    let src = "package p\n\nfunc main() {\n\tprintln(1)\n}\n";
    let found = locate(src, at(src, "println"), &NoopSink).unwrap();
    assert!(found.results.is_empty());
}

#[test]
fn grouped_result_names_expand_to_slots() {
    let src = "package p\n\nfunc f() (a, b int, err error) {\n\treturn\n}\n";
    assert_eq!(result_strings(src, at(src, "return")), ["int", "int", "error"]);
}

#[test]
fn generic_receiver_and_function_type_params() {
    let src = "package p

type List[T any] struct{ items []T }

func (l *List[T]) Pop() (T, bool) {
	var zero T
	return zero, false
}

func Collect[K comparable, V any](m map[K]V) ([]V, V, error) {
	each := func() (K, error) {
		var k K
		return k, nil
	}
	_ = each
	return nil, *new(V), nil
}
";
    let pop = locate(src, at(src, "var zero"), &NoopSink).unwrap();
    assert_eq!(pop.name.as_deref(), Some("Pop"));
    assert_eq!(pop.type_params, ["T"]);
    assert_eq!(pop.receiver.as_ref().map(ToString::to_string).as_deref(), Some("*List[T]"));
    assert_eq!(
        pop.results,
        vec![TypeExpr::TypeParam("T".into()), TypeExpr::named("bool")]
    );

    let collect = locate(src, at(src, "return nil, *new"), &NoopSink).unwrap();
    assert_eq!(collect.type_params, ["K", "V"]);
    assert_eq!(
        collect.results,
        vec![
            TypeExpr::slice(TypeExpr::TypeParam("V".into())),
            TypeExpr::TypeParam("V".into()),
            TypeExpr::named("error"),
        ]
    );

    let each = locate(src, at(src, "var k K"), &NoopSink).unwrap();
    assert!(each.is_anonymous());
    assert_eq!(
        each.results,
        vec![TypeExpr::TypeParam("K".into()), TypeExpr::named("error")]
    );
}

#[test]
fn result_shapes_are_lowered() {
    let src = "package p

import \"io\"

func f() (io.Reader, map[string][]int, chan<- bool, <-chan int, func(int, ...string) error, struct{ X, Y int }, [4]byte, interface{ Close() error }, Pair[int, string], error) {
	panic(0)
}
";
    assert_eq!(
        result_strings(src, at(src, "panic")),
        [
            "io.Reader",
            "map[string][]int",
            "chan<- bool",
            "<-chan int",
            "func(int, ...string) error",
            "struct{ X, Y int }",
            "[4]byte",
            "interface{ Close() error }",
            "Pair[int, string]",
            "error",
        ]
    );
}

#[test]
fn parse_errors_carry_position() {
    let src = "package p\nfunc f() {\n\treturn 1 +\n}\n";
    let err = locate(src, 12, &NoopSink).unwrap_err();
    assert!(matches!(err, IferrError::Parse(_)));
    assert_eq!(err.to_string(), "4:1: expected expression, found '}'");
}

#[test]
fn each_match_is_reported() {
    let sink = Recorder::default();
    locate(NESTED, at(NESTED, "// in g"), &sink).unwrap();
    let lines = sink.0.into_inner();
    assert_eq!(lines.len(), 3, "{lines:?}");
    assert!(lines[0].starts_with("found a FuncDecl: name=outer pos=11 end="));
    assert!(lines[1].starts_with("found a FuncLit: pos="));
    assert!(lines[2].starts_with("found a FuncLit: pos="));
}
