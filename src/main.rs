//! CLI entry point: parse forwarded arguments, run the wrapper pipeline,
//! and exit with mypy's status.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use turbomypy::{Cli, Output};

#[tokio::main]
async fn main() -> ExitCode {
    // Diagnostics are env-driven (TURBOMYPY_LOG) because the CLI surface
    // itself belongs to mypy.
    let filter =
        EnvFilter::try_from_env("TURBOMYPY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.run().await {
        Ok(status) => status,
        Err(e) => {
            Output::from_env().error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
