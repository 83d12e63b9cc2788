use goiferr_parser::error::Diag;
use goiferr_parser::lexer::{Lexer, Tok};

fn lex_all(input: &str) -> (Vec<(usize, Tok<'_>, usize)>, Vec<Diag>) {
    let mut lx = Lexer::new(input);
    let toks: Vec<_> = lx.by_ref().collect();
    let diags = lx.take_diags();
    (toks, diags)
}

/// Source text of every token; injected semicolons render as `;`.
fn words(input: &str) -> Vec<String> {
    Lexer::new(input)
        .map(|(s, t, e)| match t.spelling() {
            Some(sp) => sp.to_string(),
            None => input[s..e].to_string(),
        })
        .collect()
}

#[test]
fn token_text() {
    assert_eq!(
        words("x := a[1:] + 0x1F"),
        ["x", ":=", "a", "[", "1", ":", "]", "+", "0x1F", ";"]
    );
    assert_eq!(
        words("v, ok := <-ch"),
        ["v", ",", "ok", ":=", "<-", "ch", ";"]
    );
    assert_eq!(words("x &^= y"), ["x", "&^=", "y", ";"]);
    assert_eq!(words("f(xs...)"), ["f", "(", "xs", "...", ")", ";"]);
}

#[test]
fn literal_kinds() {
    let (toks, diags) = lex_all("1 2.5 3i 'a' \"s\" `raw`");
    assert!(diags.is_empty(), "{diags:?}");
    let toks: Vec<_> = toks.into_iter().map(|(_, t, _)| t).collect();
    assert_eq!(
        toks,
        vec![
            Tok::IntLit("1"),
            Tok::FloatLit("2.5"),
            Tok::ImagLit("3i"),
            Tok::RuneLit("'a'"),
            Tok::StringLit("\"s\""),
            Tok::RawStringLit("`raw`"),
            Tok::Semi,
        ]
    );
}

#[test]
fn keywords_are_not_identifiers() {
    let (toks, _) = lex_all("func funcs");
    assert_eq!(toks[0].1, Tok::KwFunc);
    assert_eq!(toks[1].1, Tok::Ident("funcs"));
}
