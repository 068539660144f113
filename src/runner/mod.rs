//! Wrapper pipeline: resolve the cache, run pre-commands, delegate to mypy
//!
//! The pipeline runs once per invocation and owns nothing persistent: it
//! computes the branch-specific cache directory, runs any configured
//! pre-commands, assembles mypy's argument list, and hands over to mypy,
//! forwarding its exit status.

use crate::cache;
use crate::cli::Output;
use crate::config::{self, TurboConfig};
use crate::git::GitRepo;
use crate::python;
use anyhow::{Context, Result, bail};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// Run the full wrapper pipeline and return the exit status to report
pub async fn execute(forwarded: Vec<OsString>, output: &Output) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    let repo = GitRepo::discover(&cwd);
    let branch_name = repo.branch_name();
    let repo_root = repo.root();
    debug!("branch={branch_name} repo_root={}", repo_root.display());

    let manifest = config::find_pyproject(&cwd, &repo_root);
    if let Some(path) = &manifest {
        output.info(&format!("Using configuration from {}", path.display()));
    }
    let config = TurboConfig::load(manifest.as_deref())?;

    let python_path_hash = python::interpreter_fingerprint();
    let vars = cache::template_vars(&branch_name, &repo_root, &python_path_hash);
    let cache_dir = cache::prepare(config.cache_dir_template(), &vars)?;
    output.info(&format!("Using cache directory: {}", cache_dir.display()));

    run_pre_commands(&config.pre_commands(), output).await?;

    let mypy_ini = config::find_mypy_ini(&cwd, &repo_root);
    if let Some(path) = &mypy_ini {
        output.info(&format!("Using mypy configuration file: {}", path.display()));
    }

    let args = assemble_args(&config, &cache_dir, mypy_ini.as_deref(), forwarded);
    run_mypy(&config, args, output).await
}

/// Run configured pre-commands through the shell, aborting on the first failure
async fn run_pre_commands(commands: &[String], output: &Output) -> Result<()> {
    for command in commands {
        output.step(&format!("Running pre-command: {command}"));
        let start = Instant::now();

        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .status()
            .await
            .with_context(|| format!("Failed to spawn pre-command: {command}"))?;

        if !status.success() {
            bail!("Pre-command failed ({status}): {command}");
        }
        output.timing("Pre-command", start.elapsed());
    }

    Ok(())
}

/// Assemble mypy's argument list: cache and config flags first, speed flags,
/// then the forwarded CLI arguments verbatim
fn assemble_args(
    config: &TurboConfig,
    cache_dir: &Path,
    mypy_ini: Option<&Path>,
    forwarded: Vec<OsString>,
) -> Vec<OsString> {
    let mut args = Vec::with_capacity(forwarded.len() + 5);

    let mut cache_flag = OsString::from("--cache-dir=");
    cache_flag.push(cache_dir);
    args.push(cache_flag);

    if let Some(ini) = mypy_ini {
        let mut config_flag = OsString::from("--config-file=");
        config_flag.push(ini);
        args.push(config_flag);
    }

    if config.sqlite_cache {
        args.push("--sqlite-cache".into());
    }
    if config.fine_grained_cache {
        args.push("--cache-fine-grained".into());
    }
    if config.fast_module_lookup {
        args.push("--fast-module-lookup".into());
    }

    args.extend(forwarded);
    args
}

/// Spawn mypy with inherited stdio and map its exit status to ours
async fn run_mypy(config: &TurboConfig, args: Vec<OsString>, output: &Output) -> Result<ExitCode> {
    let mypy = locate_mypy(config)?;

    output.info(&format!(
        "Running mypy with arguments: {}",
        args.iter()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    ));

    let start = Instant::now();
    let status = Command::new(&mypy)
        .args(&args)
        .status()
        .await
        .with_context(|| format!("Failed to run {}", mypy.display()))?;
    output.timing("mypy", start.elapsed());

    // Signal termination carries no code; report plain failure
    let code = status.code().map_or(1, |code| code.clamp(0, 255));
    Ok(ExitCode::from(code as u8))
}

/// Resolve the mypy executable, honoring the config override
fn locate_mypy(config: &TurboConfig) -> Result<PathBuf> {
    match &config.mypy_executable {
        Some(exe) => which::which(exe)
            .with_context(|| format!("Configured mypy executable not found: {exe}")),
        None => which::which("mypy")
            .context("mypy not found on PATH (pip install mypy, or set mypy_executable)"),
    }
}
