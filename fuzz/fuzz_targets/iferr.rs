#![no_main]

use goiferr::{iferr, IferrError, NoopSink, SnippetOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    let opts = SnippetOptions::default();

    for offset in [0, s.len() / 3, s.len() / 2, s.len()] {
        match iferr(&s, offset, &opts, &NoopSink) {
            Ok(out) => {
                assert!(out.starts_with("if err != nil {\n\treturn"));
                assert!(out.ends_with("\n}\n"));
            }
            Err(IferrError::NotFound { offset: o }) => assert_eq!(o, offset),
            Err(IferrError::Parse(f)) => assert!(!f.diags.is_empty()),
        }
    }
});
