use goiferr::{locate_in, synthesize, NoopSink, SnippetOptions};
use goiferr_parser::ast::Decl;
use goiferr_parser::parse_source;
use walkdir::WalkDir;

/// Parses every `.go` file under `$GOIFERR_CORPUS` (e.g. `$GOROOT/src`) and
/// runs the locator at the start and end of each function declaration.
#[test]
fn go_corpus_if_configured() {
    let Some(root) = std::env::var_os("GOIFERR_CORPUS") else {
        eprintln!("GOIFERR_CORPUS not set; skipping corpus test");
        return;
    };

    let mut files = 0usize;
    let mut funcs = 0usize;
    let opts = SnippetOptions::default();

    for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }
        // testdata holds deliberately broken sources.
        if path.components().any(|c| c.as_os_str() == "testdata") {
            continue;
        }
        let Ok(src) = std::fs::read_to_string(path) else {
            continue;
        };
        files += 1;

        let parsed = match parse_source(&src) {
            Ok(parsed) => parsed,
            Err(f) => panic!("{}: {f}", path.display()),
        };

        for &decl in parsed.arena.get(parsed.file.decls) {
            let Decl::Func(id) = parsed.arena.decls[decl] else {
                continue;
            };
            let span = parsed.arena.funcs.span(id);
            for offset in [span.start as usize, span.end as usize] {
                let found = locate_in(&parsed, offset, &NoopSink)
                    .unwrap_or_else(|e| panic!("{}@{offset}: {e}", path.display()));
                let out = synthesize(&found.results, &opts, &NoopSink);
                assert!(out.starts_with("if err != nil {\n\treturn"));
            }
            funcs += 1;
        }
    }

    eprintln!("checked {funcs} functions in {files} Go files");
}
