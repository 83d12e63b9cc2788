use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use goiferr::{iferr, SnippetOptions, TracingSink};

#[derive(Parser, Debug)]
#[command(
    name = "goiferr",
    version,
    about = "Print an `if err != nil` block for the Go function around a cursor"
)]
struct Args {
    /// Cursor position as a 0-based byte offset into the source
    #[arg(long, default_value_t = 0)]
    pos: usize,

    /// Expression returned in the error slot, e.g. 'fmt.Errorf("load: %w", err)'
    #[arg(long)]
    expr: Option<String>,

    /// Name of the error variable that is checked
    #[arg(long = "var", value_name = "NAME", default_value = "err")]
    error_var: String,

    /// Log debug diagnostics to stderr
    #[arg(long)]
    debug: bool,

    /// Go source file; reads stdin when absent or `-`
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    file: Option<PathBuf>,
}

fn read_source(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        _ => {
            let mut src = String::new();
            io::stdin()
                .read_to_string(&mut src)
                .context("reading stdin")?;
            Ok(src)
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let src = read_source(args.file.as_ref())?;

    let mut opts = SnippetOptions::default().with_error_ident(args.error_var);
    if let Some(expr) = args.expr.filter(|e| !e.trim().is_empty()) {
        opts = opts.with_error_expr(expr);
    }

    let snippet = iferr(&src, args.pos, &opts, &TracingSink)?;
    io::stdout().write_all(snippet.as_bytes())?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .without_time()
        .with_target(false)
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("goiferr: cannot install logger: {e}");
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
