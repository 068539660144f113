//! Git integration layer for turbomypy
//!
//! This module provides the two repository queries the cache layout depends
//! on: the current branch name and the repository root. Both degrade to
//! fixed fallbacks so the wrapper stays usable outside a repository.

use git2::Repository;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Branch name used when no branch can be resolved
pub const FALLBACK_BRANCH: &str = "default_branch";

/// Repository handle for cache-layout queries
pub struct GitRepo {
    repo: Option<Repository>,
}

impl GitRepo {
    /// Discover the repository containing `path`, if any
    pub fn discover<P: AsRef<Path>>(path: P) -> Self {
        match Repository::discover(path) {
            Ok(repo) => Self { repo: Some(repo) },
            Err(e) => {
                debug!("no git repository found: {e}");
                Self { repo: None }
            }
        }
    }

    /// Get the current branch name, falling back to [`FALLBACK_BRANCH`]
    ///
    /// A detached or unborn HEAD has no shorthand and takes the fallback too.
    pub fn branch_name(&self) -> String {
        self.repo
            .as_ref()
            .and_then(|repo| repo.head().ok())
            .and_then(|head| head.shorthand().map(str::to_string))
            .unwrap_or_else(|| FALLBACK_BRANCH.to_string())
    }

    /// Get the repository working directory, falling back to the filesystem root
    pub fn root(&self) -> PathBuf {
        self.repo
            .as_ref()
            .and_then(|repo| repo.workdir())
            // workdir paths carry a trailing slash; normalize it away
            .map(|path| path.components().collect())
            .unwrap_or_else(|| PathBuf::from("/"))
    }
}
