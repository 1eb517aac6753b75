//! taskpad CLI
//!
//! Single-user task tracking: create, edit, filter, and delete tasks kept in
//! one JSON file, from the command line or over a small HTTP JSON API.

use clap::Parser;
use taskpad::cli::Cli;
use taskpad::output::emit_error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let cli = Cli::parse();

    // Tracing is opt-in via RUST_LOG, or --debug when RUST_LOG is unset.
    // Ignore invalid/huge filters so startup stays robust.
    let fallback = if cli.debug {
        "taskpad=debug,tower_http=debug"
    } else {
        "off"
    };
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let command = cli.command.name();
    let json = cli.json;
    if let Err(err) = cli.run() {
        let _ = emit_error(command, &err, json);
        std::process::exit(err.exit_code());
    }
}
