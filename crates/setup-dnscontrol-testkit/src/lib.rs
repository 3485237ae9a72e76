//! Test utilities for the dnscontrol setup workspace
//!
//! - [`fixtures`]: release archives built in memory around a stub binary
//! - [`mock`]: mockito helpers shaped like the GitHub endpoints the setup talks to

pub mod fixtures;
pub mod mock;

use std::path::Path;
use tempfile::TempDir;

pub use fixtures::{stub_binary, tar_gz_with_entry, zip_with_entry};
pub use mock::{asset_path, mock_asset, mock_latest_api, mock_latest_redirect};

/// Creates a scratch directory that is removed on drop.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
pub fn scratch_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Returns true if `path` has any execute bit set. Always true off Unix.
pub fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.exists()
    }
}
