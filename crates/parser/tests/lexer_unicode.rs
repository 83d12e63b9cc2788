use goiferr_parser::error::Diag;
use goiferr_parser::lexer::{Lexer, Tok};

fn lex_all(input: &str) -> (Vec<(usize, Tok<'_>, usize)>, Vec<Diag>) {
    let mut lx = Lexer::new(input);
    let toks: Vec<_> = lx.by_ref().collect();
    let diags = lx.take_diags();
    (toks, diags)
}

#[test]
fn unicode_identifiers() {
    let (toks, diags) = lex_all("größe := 1");
    assert!(diags.is_empty());
    assert_eq!(toks[0].1, Tok::Ident("größe"));
}

#[test]
fn leading_bom_is_skipped() {
    let (toks, diags) = lex_all("\u{FEFF}package p");
    assert!(diags.is_empty());
    assert_eq!(toks[0].1, Tok::KwPackage);
}
