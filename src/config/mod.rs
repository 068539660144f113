//! Configuration management for turbomypy
//!
//! Wrapper settings live in the `[tool.turbomypy]` table of the nearest
//! `pyproject.toml`, next to where mypy users already keep tool settings.
//! Any key can be overridden through `TURBOMYPY_*` environment variables.
//! This module also locates the optional `mypy.ini` that is handed through
//! to mypy itself.

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Cache layout used when `cache_dir` is not configured
pub const DEFAULT_CACHE_DIR: &str =
    "{repo_root}/.mypy_cache/python_{python_path_hash}/branch/{branch_name}";

/// Settings from the `[tool.turbomypy]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurboConfig {
    /// Cache directory template; placeholders are `{branch_name}`,
    /// `{repo_root}`, `{python_path_hash}` and any environment variable
    pub cache_dir: Option<String>,

    /// Single shell command run before type-checking (older spelling)
    pub pre_command: Option<String>,

    /// Shell commands run before type-checking, in order
    pub pre_commands: Option<Vec<String>>,

    /// Override for the mypy executable looked up on PATH
    pub mypy_executable: Option<String>,

    /// Pass `--sqlite-cache` to mypy
    #[serde(default = "default_enabled")]
    pub sqlite_cache: bool,

    /// Pass `--cache-fine-grained` to mypy
    #[serde(default = "default_enabled")]
    pub fine_grained_cache: bool,

    /// Pass `--fast-module-lookup` to mypy
    #[serde(default = "default_enabled")]
    pub fast_module_lookup: bool,
}

/// Default state for the mypy speed flags
fn default_enabled() -> bool {
    true
}

impl Default for TurboConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            pre_command: None,
            pre_commands: None,
            mypy_executable: None,
            sqlite_cache: true,
            fine_grained_cache: true,
            fast_module_lookup: true,
        }
    }
}

/// Shape of a `pyproject.toml` as far as the wrapper is concerned
#[derive(Debug, Deserialize, Default)]
struct Manifest {
    #[serde(default)]
    tool: ToolTable,
}

#[derive(Debug, Deserialize, Default)]
struct ToolTable {
    turbomypy: Option<TurboConfig>,
}

impl TurboConfig {
    /// Load configuration from the manifest (when present) with
    /// `TURBOMYPY_*` environment variables layered on top
    pub fn load(manifest: Option<&Path>) -> Result<Self> {
        let base = match manifest {
            Some(path) => Self::from_manifest(path)?,
            None => Self::default(),
        };

        Figment::from(Serialized::defaults(base))
            .merge(Env::prefixed("TURBOMYPY_"))
            .extract()
            .context("Invalid TURBOMYPY_* environment override")
    }

    /// Read the `[tool.turbomypy]` table from a `pyproject.toml`
    ///
    /// A manifest without the table yields defaults; a malformed manifest
    /// is an error.
    pub fn from_manifest(path: &Path) -> Result<Self> {
        let manifest: Manifest = Figment::from(Toml::file(path))
            .extract()
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))?;

        Ok(manifest.tool.turbomypy.unwrap_or_default())
    }

    /// Get the cache directory template
    pub fn cache_dir_template(&self) -> &str {
        self.cache_dir.as_deref().unwrap_or(DEFAULT_CACHE_DIR)
    }

    /// Get the configured pre-commands, in execution order
    ///
    /// `pre_commands` wins over the single `pre_command` spelling when both
    /// are present.
    pub fn pre_commands(&self) -> Vec<String> {
        if let Some(commands) = &self.pre_commands {
            commands.clone()
        } else {
            self.pre_command.clone().into_iter().collect()
        }
    }
}

/// Find the nearest `pyproject.toml`, walking from `start` up to and
/// including `repo_root`
pub fn find_pyproject(start: &Path, repo_root: &Path) -> Option<PathBuf> {
    walk_up_for(start, repo_root, "pyproject.toml")
}

/// Find the `mypy.ini` handed through to mypy, walking from `start` up to
/// and including `repo_root`
pub fn find_mypy_ini(start: &Path, repo_root: &Path) -> Option<PathBuf> {
    walk_up_for(start, repo_root, "mypy.ini")
}

fn walk_up_for(start: &Path, repo_root: &Path, file_name: &str) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let candidate = current.join(file_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        if current == repo_root || !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests;
