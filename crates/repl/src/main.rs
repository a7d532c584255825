//! schist - a small R5RS Scheme interpreter
//!
//! Usage:
//!   schist                  # interactive REPL
//!   schist prog.scm         # run a file
//!   schist -i prog.scm      # run a file, then drop into the REPL
//!   schist -e '(+ 1 2)'     # evaluate one expression and print it
//!
//! Set RUST_LOG=schist_vm=trace (together with the (trace) form) to watch
//! evaluator frames.

mod repl;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use schist_core::{Value, write_str};
use schist_vm::Interpreter;
use tracing::debug;

#[derive(Parser)]
#[command(name = "schist")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A small R5RS Scheme interpreter", long_about = None)]
struct Args {
    /// Scheme source files to load, in order
    files: Vec<PathBuf>,

    /// Evaluate one expression and exit
    #[arg(short = 'e', long = "eval", value_name = "EXPR")]
    expr: Option<String>,

    /// Enter the REPL after loading files
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let interpreter = Interpreter::new();

    for path in &args.files {
        debug!(file = %path.display(), "loading");
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("{}: {e}", path.display()))?;
        interpreter
            .load_str(&source)
            .map_err(|e| format!("{}: {e}", path.display()))?;
    }

    if let Some(expr) = &args.expr {
        match interpreter.load_str(expr).map_err(|e| e.to_string())? {
            Some(Value::Void) | None => {}
            Some(value) => println!("{}", write_str(&value)),
        }
        return Ok(());
    }

    if args.interactive || args.files.is_empty() {
        repl::run(&interpreter).map_err(|e| e.to_string())?;
    }
    Ok(())
}
