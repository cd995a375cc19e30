//! RemoteTypes CLI entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use rtypes_cli::cli::Cli;
use rtypes_cli::commands;

fn main() {
    // Load .env.local if it exists (for RTYPES_STORAGE_DIR, RUST_LOG)
    let _ = dotenvy::from_filename(".env.local");

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    // stdout carries response batches; logs go to stderr
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let storage_dir = cli.storage_dir();

    if let Err(e) = commands::execute(cli.command, &storage_dir) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
