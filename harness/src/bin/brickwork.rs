//! Interactive polynomial minimizer.
//!
//! Usage: `brickwork`, then answer the prompts on stdin.
//!
//! Logging goes to stderr; set `RUST_LOG` (default `warn`) to see the
//! phase switch and per-iteration events.

use std::io;
use std::process::ExitCode;

use brickwork_harness::run_interactive;
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    init_logging("warn");

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run_interactive(stdin.lock(), stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
