//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - The interactive session and human-friendly output

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod configure;
mod input;
mod session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cmd = cli::Cli::parse();
    cmd.run().await
}

/// Logs go to stderr so they never mix with the rendered view on stdout.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
