//! Python interpreter discovery
//!
//! Mypy's cache is only valid for the interpreter it was built against, so
//! the cache layout keys on a fingerprint of the interpreter path. An active
//! virtualenv takes priority over whatever is on PATH.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;
use which::which;

/// Fingerprint used when no interpreter can be located
pub const FALLBACK_FINGERPRINT: &str = "system";

/// Locate the Python interpreter mypy will run under
pub fn interpreter_path() -> Option<PathBuf> {
    if let Ok(venv) = std::env::var("VIRTUAL_ENV") {
        let candidate = Path::new(&venv).join("bin").join("python");
        if candidate.is_file() {
            return Some(candidate);
        }
        debug!("VIRTUAL_ENV set but {} is missing", candidate.display());
    }

    which("python3").or_else(|_| which("python")).ok()
}

/// Short fingerprint of the interpreter path for the cache layout
///
/// Resolves to [`FALLBACK_FINGERPRINT`] when no interpreter is found, so the
/// default cache template still expands.
pub fn interpreter_fingerprint() -> String {
    match interpreter_path() {
        Some(path) => fingerprint(&path),
        None => {
            debug!("no python interpreter found, using fallback fingerprint");
            FALLBACK_FINGERPRINT.to_string()
        }
    }
}

/// Hash a path down to 16 hex characters
pub fn fingerprint(path: &Path) -> String {
    let digest = Sha256::digest(path.as_os_str().as_encoded_bytes());
    hex::encode(&digest[..8])
}
