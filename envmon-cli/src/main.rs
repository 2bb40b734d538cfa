//! Binary crate for the `envmon` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Serving `GET /weather` over HTTP
//! - The polling terminal dashboard
//! - Interactive configuration

use clap::Parser;

mod cli;
mod dashboard;
mod report;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.default_log_level());
    cmd.run().await
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
