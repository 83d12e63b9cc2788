use goiferr_parser::lexer::{Lexer, Tok};

fn injected_semis(input: &str) -> Vec<usize> {
    Lexer::new(input)
        .filter_map(|(s, t, e)| (matches!(t, Tok::Semi) && s == e).then_some(s))
        .collect()
}

#[test]
fn semicolon_after_line_ending_tokens() {
    assert_eq!(injected_semis("x\ny\n"), vec![1, 3]);
    assert_eq!(injected_semis("return\n"), vec![6]);
    assert_eq!(injected_semis("i++\n"), vec![3]);
    assert_eq!(injected_semis("f()\n"), vec![3]);
    assert_eq!(injected_semis("a[0]\n"), vec![4]);
    assert_eq!(injected_semis("\"s\"\n"), vec![3]);
}

#[test]
fn no_semicolon_after_operators_or_openers() {
    assert!(injected_semis("f(\n").is_empty());
    assert!(injected_semis("a +\n").is_empty());
    assert!(injected_semis("x :=\n").is_empty());
    assert!(injected_semis("func\n").is_empty());
}

#[test]
fn semicolon_at_eof() {
    assert_eq!(injected_semis("}"), vec![1]);
    assert_eq!(injected_semis("x"), vec![1]);
    assert!(injected_semis("{").is_empty());
}
