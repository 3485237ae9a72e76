//! Moving the extracted binary into the install directory.

use setup_dnscontrol_core::{Result, SetupError};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

const LOG_TARGET: &str = "setup_dnscontrol::install";

/// Mode given to the placed binary: rwxr-xr-x.
#[cfg(unix)]
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Atomically replaces `to` with the contents of `from`.
///
/// The data is copied into a temporary file next to `to` (same filesystem),
/// synced, then renamed over the destination, so a concurrent reader sees
/// either the old binary or the new one and never a partial write. The
/// source is removed afterwards on a best-effort basis.
///
/// # Errors
///
/// Returns `Io` naming the failed step.
pub fn atomic_move(from: &Path, to: &Path) -> Result<()> {
    let dest_dir = to.parent().ok_or_else(|| {
        SetupError::io(
            format!("get parent directory of {}", to.display()),
            io::Error::other("no parent directory"),
        )
    })?;

    let mut temp_dest = tempfile::NamedTempFile::new_in(dest_dir)
        .map_err(|e| SetupError::io(format!("create temporary file in {}", dest_dir.display()), e))?;

    let mut src_file = fs::File::open(from)
        .map_err(|e| SetupError::io(format!("open {}", from.display()), e))?;
    io::copy(&mut src_file, &mut temp_dest)
        .map_err(|e| SetupError::io(format!("copy {}", from.display()), e))?;
    drop(src_file);

    #[cfg(unix)]
    {
        let permissions = fs::metadata(from)
            .map_err(|e| SetupError::io(format!("get metadata for {}", from.display()), e))?
            .permissions();
        fs::set_permissions(temp_dest.path(), permissions)
            .map_err(|e| SetupError::io("set permissions on temporary file", e))?;
    }

    temp_dest
        .as_file()
        .sync_all()
        .map_err(|e| SetupError::io("sync temporary file", e))?;

    temp_dest
        .persist(to)
        .map_err(|e| SetupError::io(format!("rename temporary file to {}", to.display()), e.error))?;

    #[cfg(unix)]
    {
        let dir = fs::File::open(dest_dir)
            .map_err(|e| SetupError::io(format!("open {}", dest_dir.display()), e))?;
        dir.sync_all()
            .map_err(|e| SetupError::io("sync install directory", e))?;
    }

    // The source sits in a staging directory that is removed anyway.
    if let Err(e) = fs::remove_file(from) {
        debug!(
            target: LOG_TARGET,
            path = %from.display(),
            error = %e,
            "could not remove moved source"
        );
    }

    Ok(())
}

/// Gives `path` mode 0755. No-op where the filesystem has no execute bits.
///
/// # Errors
///
/// Returns `Io` if the permissions cannot be changed.
pub fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(path, fs::Permissions::from_mode(EXECUTABLE_MODE))
            .map_err(|e| SetupError::io(format!("set permissions for {}", path.display()), e))?;
    }

    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}
