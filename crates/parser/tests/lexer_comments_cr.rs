use goiferr_parser::lexer::{Lexer, Tok};

fn injected_semis(input: &str) -> Vec<usize> {
    Lexer::new(input)
        .filter_map(|(s, t, e)| (matches!(t, Tok::Semi) && s == e).then_some(s))
        .collect()
}

#[test]
fn comments_and_semicolons() {
    assert_eq!(injected_semis("x // c\ny"), vec![6, 8]);
    assert_eq!(injected_semis("x /* c */\n"), vec![9]);
    // A block comment spanning lines acts like a newline.
    assert_eq!(injected_semis("x /* a\n b */ y"), vec![6, 14]);
}

#[test]
fn crlf_is_a_newline() {
    assert_eq!(injected_semis("x\r\ny"), vec![1, 4]);
}
