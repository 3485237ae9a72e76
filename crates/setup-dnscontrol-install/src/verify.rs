//! Verifier: the installed binary must be found by name and must run.

use crate::search_path::SearchPath;
use setup_dnscontrol_core::{Result, SetupError, TOOL_NAME};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

const LOG_TARGET: &str = "setup_dnscontrol::verify";

/// Looks `dnscontrol` up on `search_path` and runs `dnscontrol version`.
///
/// Output is discarded; only the exit status matters. Returns the absolute
/// path of the binary that ran.
///
/// # Errors
///
/// Returns `BinaryNotFound` if no entry of the search path holds the
/// binary, `VerificationFailed` if it cannot be executed or exits non-zero.
pub fn verify_installation(search_path: &SearchPath) -> Result<PathBuf> {
    let path = locate(search_path)?;
    run_version(&path)?;
    debug!(target: LOG_TARGET, path = %path.display(), "binary verified");
    Ok(path)
}

fn locate(search_path: &SearchPath) -> Result<PathBuf> {
    let paths = search_path.joined()?;
    let cwd = std::env::current_dir().unwrap_or_else(|_| std::env::temp_dir());

    let found = which::which_in(TOOL_NAME, Some(paths), cwd).map_err(|_| {
        SetupError::BinaryNotFound {
            binary: TOOL_NAME.to_string(),
        }
    })?;

    std::path::absolute(&found).map_err(|e| SetupError::io(format!("resolve {}", found.display()), e))
}

fn run_version(path: &Path) -> Result<()> {
    let status = Command::new(path)
        .arg("version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| SetupError::VerificationFailed {
            path: path.to_path_buf(),
            reason: format!("failed to execute: {e}"),
        })?;

    if !status.success() {
        return Err(SetupError::VerificationFailed {
            path: path.to_path_buf(),
            reason: format!("`{TOOL_NAME} version` exited with {status}"),
        });
    }

    Ok(())
}
