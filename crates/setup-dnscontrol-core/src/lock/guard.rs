use std::fs::File;
use std::path::{Path, PathBuf};

/// Exclusive hold on an install directory's lock file.
///
/// Dropping the guard unlocks; the OS also releases the lock when the
/// descriptor closes, so a panicking installer cannot leave it held.
#[derive(Debug)]
pub struct LockGuard {
    file: File,
    path: PathBuf,
}

impl LockGuard {
    pub(super) fn new(file: File, path: &Path) -> Self {
        Self {
            file,
            path: path.to_path_buf(),
        }
    }

    /// The lock file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}
