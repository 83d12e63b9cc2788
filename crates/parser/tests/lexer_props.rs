use goiferr_parser::lexer::{Lexer, Tok};
use goiferr_parser::parse_source;
use proptest::prelude::*;

/// Go-ish fragments so generated inputs reach the parser's deeper paths.
fn go_fragment() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "package p\n", "func", " f", "(", ")", "{", "}", "[", "]", "x", " int", " error",
            ", ", ":=", "=", "return", " nil", "\n", "if", " err != nil ", "go ", "<-", "chan",
            "map[string]", "struct{}", "interface{}", "*", "...", "`r`", "\"s\"", "'c'", "1.5",
            "/*", "*/", "//", ";", "T", "[T any]", ".",
        ]),
        0..64,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn lexer_spans_are_ordered_and_bounded(s in ".*") {
        let mut last_real_end = 0usize;
        let mut frontier = 0usize;
        let max_steps = s.len().saturating_mul(4) + 64;

        for (steps, (start, tok, end)) in Lexer::new(&s).enumerate() {
            prop_assert!(start <= end && end <= s.len(), "({start},{end}) tok={tok:?} input={s:?}");

            if matches!(tok, Tok::Semi) && start == end {
                prop_assert!(start >= frontier, "injected ';' at {start} behind {frontier}, input={s:?}");
            } else {
                prop_assert!(start >= last_real_end, "token at {start} overlaps previous end {last_real_end}, input={s:?}");
                last_real_end = end;
            }
            frontier = frontier.max(end);
            prop_assert!(steps <= max_steps, "no progress after {steps} tokens, input={s:?}");
        }
    }

    #[test]
    fn parser_never_panics(s in go_fragment()) {
        let _ = parse_source(&s);
    }

    #[test]
    fn parse_failures_point_inside_the_input(s in go_fragment()) {
        if let Err(failure) = parse_source(&s) {
            let first = failure.first().unwrap();
            prop_assert!(first.diag.span.start as usize <= s.len());
            prop_assert!(first.at.line >= 1 && first.at.col >= 1);
        }
    }
}
