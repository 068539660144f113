//! Command-line interface for turbomypy
//!
//! The wrapper claims no flags of its own: every argument after the program
//! name is forwarded verbatim to mypy, hyphens included. Help and version
//! handling therefore stay with the wrapped tool.

use anyhow::Result;
use clap::Parser;
use std::ffi::OsString;
use std::process::ExitCode;

mod output;

pub use output::Output;

/// turbomypy - run mypy with a branch-specific cache
#[derive(Parser)]
#[command(name = "turbomypy")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Arguments forwarded verbatim to mypy
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<OsString>,
}

impl Cli {
    /// Execute the wrapper pipeline
    pub async fn run(self) -> Result<ExitCode> {
        let output = Output::from_env();
        crate::runner::execute(self.args, &output).await
    }
}
