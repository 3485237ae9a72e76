//! Directory-backed cache store.
//!
//! Layout under the cache root:
//!
//! ```text
//! {root}/
//!   dnscontrol-cache-3.16.0-linux-x64/
//!     dnscontrol
//!     .complete          <- "<sha256>  <relative path>" per file
//!   .staging-XXXXXX/     <- entry being written, renamed into place when done
//! ```
//!
//! An entry without its marker, or whose files no longer match the
//! manifest, is reported as corrupt rather than restored.

use super::{CacheError, CacheKey, CacheStore, LOG_TARGET};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Marker file (and manifest) of a complete cache entry.
pub const COMPLETION_MARKER: &str = ".complete";

/// Cache store keeping one directory per [`CacheKey`] below a root.
#[derive(Debug, Clone)]
pub struct LocalDirCache {
    root: PathBuf,
}

struct ManifestEntry {
    digest: String,
    relative: PathBuf,
}

impl LocalDirCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the entry for `key`.
    pub fn entry_dir(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.as_str())
    }

    fn read_manifest(&self, key: &CacheKey, entry: &Path) -> Result<Vec<ManifestEntry>, CacheError> {
        let corrupt = |reason: String| CacheError::Corrupt {
            key: key.to_string(),
            reason,
        };

        let marker = entry.join(COMPLETION_MARKER);
        if !marker.is_file() {
            return Err(corrupt("completion marker missing".to_string()));
        }

        let text = fs::read_to_string(&marker).map_err(|e| CacheError::io(&marker, e))?;

        let mut entries = Vec::new();
        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            let (digest, relative) = line
                .split_once("  ")
                .ok_or_else(|| corrupt(format!("malformed manifest line '{line}'")))?;

            let relative = PathBuf::from(relative);
            if !relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)))
            {
                return Err(corrupt(format!(
                    "manifest path escapes the entry: {}",
                    relative.display()
                )));
            }

            entries.push(ManifestEntry {
                digest: digest.to_string(),
                relative,
            });
        }

        if entries.is_empty() {
            return Err(corrupt("manifest lists no files".to_string()));
        }

        Ok(entries)
    }

    /// Reads the manifest of `entry` and checks every listed file against it.
    fn verified_manifest(
        &self,
        key: &CacheKey,
        entry: &Path,
    ) -> Result<Vec<ManifestEntry>, CacheError> {
        let manifest = self.read_manifest(key, entry)?;
        for file in &manifest {
            let path = entry.join(&file.relative);
            let actual = sha256_file(&path).map_err(|e| CacheError::io(&path, e))?;
            if actual != file.digest {
                return Err(CacheError::Corrupt {
                    key: key.to_string(),
                    reason: format!("checksum mismatch for {}", file.relative.display()),
                });
            }
        }
        Ok(manifest)
    }
}

impl CacheStore for LocalDirCache {
    fn restore(&self, install_dir: &Path, key: &CacheKey) -> Result<bool, CacheError> {
        let entry = self.entry_dir(key);
        if !entry.is_dir() {
            debug!(target: LOG_TARGET, key = %key, "cache miss");
            return Ok(false);
        }

        // Verify everything before touching the install directory.
        let manifest = self.verified_manifest(key, &entry)?;

        for file in &manifest {
            let from = entry.join(&file.relative);
            let to = install_dir.join(&file.relative);
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent).map_err(|e| CacheError::io(parent, e))?;
            }
            // fs::copy carries the permission bits along.
            fs::copy(&from, &to).map_err(|e| CacheError::io(&to, e))?;
        }

        debug!(
            target: LOG_TARGET,
            key = %key,
            files = manifest.len(),
            path = %install_dir.display(),
            "cache hit"
        );
        Ok(true)
    }

    fn save(&self, install_dir: &Path, key: &CacheKey) -> Result<(), CacheError> {
        let entry = self.entry_dir(key);
        if entry.join(COMPLETION_MARKER).is_file() {
            match self.verified_manifest(key, &entry) {
                Ok(_) => {
                    debug!(target: LOG_TARGET, key = %key, "entry already cached");
                    return Ok(());
                }
                Err(e) => {
                    debug!(target: LOG_TARGET, key = %key, error = %e, "replacing cache entry");
                }
            }
        }

        fs::create_dir_all(&self.root).map_err(|e| CacheError::io(&self.root, e))?;

        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(&self.root)
            .map_err(|e| CacheError::io(&self.root, e))?;

        let mut manifest = Vec::new();
        for item in walkdir::WalkDir::new(install_dir).min_depth(1).sort_by_file_name() {
            let item = item.map_err(|e| {
                CacheError::io(install_dir, std::io::Error::other(e))
            })?;
            if !item.file_type().is_file() {
                continue;
            }

            let relative = item.path().strip_prefix(install_dir).map_err(|e| {
                CacheError::io(item.path(), std::io::Error::other(e))
            })?;
            let dest = staging.path().join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| CacheError::io(parent, e))?;
            }
            fs::copy(item.path(), &dest).map_err(|e| CacheError::io(&dest, e))?;

            let digest = sha256_file(&dest).map_err(|e| CacheError::io(&dest, e))?;
            let relative: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            manifest.push(format!("{digest}  {}", relative.join("/")));
        }

        if manifest.is_empty() {
            return Err(CacheError::Unavailable(format!(
                "nothing to cache in {}",
                install_dir.display()
            )));
        }

        let marker = staging.path().join(COMPLETION_MARKER);
        fs::write(&marker, manifest.join("\n") + "\n").map_err(|e| CacheError::io(&marker, e))?;

        // Leftover from an interrupted save, or an entry that failed verification.
        if entry.exists() {
            fs::remove_dir_all(&entry).map_err(|e| CacheError::io(&entry, e))?;
        }

        fs::rename(staging.path(), &entry).map_err(|e| CacheError::io(&entry, e))?;

        debug!(
            target: LOG_TARGET,
            key = %key,
            files = manifest.len(),
            path = %entry.display(),
            "cache entry saved"
        );
        Ok(())
    }
}

fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
