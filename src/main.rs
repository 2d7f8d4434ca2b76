#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! cmdtree: hierarchical command dispatcher with abbreviation matching.

mod cli;
mod commands;
mod dispatch;
mod types;

use std::io::Write;

use tracing_subscriber::EnvFilter;

use cli::CommandContext;
use dispatch::Dispatcher;

/// Environment variable holding the log filter (e.g. `debug`, `cmdtree=trace`).
const LOG_ENV: &str = "CMDTREE_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_logging();

    let argv: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    let code = {
        let mut ctx = CommandContext::new(&mut out, &mut err);
        Dispatcher::new(&commands::PROGRAM).run(&mut ctx, argv)
    };

    let _ = out.flush();
    let _ = err.flush();
    std::process::exit(code);
}
