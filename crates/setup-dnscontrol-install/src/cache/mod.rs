//! Cache Manager.
//!
//! The cache is an optimisation and never a dependency for correctness.
//! Its operations return [`CacheError`], a type distinct from the fatal
//! `SetupError`, and the installer only ever consumes them through
//! [`best_effort`]: a failed restore degrades to a miss, a failed save is
//! logged and ignored.

mod local;

pub use local::{COMPLETION_MARKER, LocalDirCache};

use crate::install::PlatformTarget;
use setup_dnscontrol_core::CacheSettings;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

const LOG_TARGET: &str = "setup_dnscontrol::cache";

/// Deterministic identifier of a cached install directory:
/// `{tool}-cache-{version}-{platform}-{arch}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// ```
    /// use setup_dnscontrol_install::cache::CacheKey;
    /// use setup_dnscontrol_install::install::{Arch, Os, PlatformTarget};
    ///
    /// let key = CacheKey::new("dnscontrol", "3.16.0", &PlatformTarget::new(Os::Linux, Arch::Amd64));
    /// assert_eq!(key.as_str(), "dnscontrol-cache-3.16.0-linux-x64");
    /// ```
    pub fn new(tool: &str, version: &str, target: &PlatformTarget) -> Self {
        CacheKey(format!(
            "{tool}-cache-{version}-{}-{}",
            target.os.cache_token(),
            target.arch.cache_token()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failures of the cache layer. Never fatal.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache entry {key} is corrupt: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Storage for install directories, keyed by [`CacheKey`].
pub trait CacheStore {
    /// Restores the entry for `key` into `install_dir`.
    ///
    /// Returns `Ok(true)` on a hit and `Ok(false)` on a clean miss.
    fn restore(&self, install_dir: &Path, key: &CacheKey) -> Result<bool, CacheError>;

    /// Stores the contents of `install_dir` under `key`.
    fn save(&self, install_dir: &Path, key: &CacheKey) -> Result<(), CacheError>;
}

/// Store used when caching is switched off: always misses, never stores.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledCache;

impl CacheStore for DisabledCache {
    fn restore(&self, _install_dir: &Path, _key: &CacheKey) -> Result<bool, CacheError> {
        Ok(false)
    }

    fn save(&self, _install_dir: &Path, _key: &CacheKey) -> Result<(), CacheError> {
        Ok(())
    }
}

/// Builds the store described by the settings.
pub fn store_for(settings: &CacheSettings) -> Box<dyn CacheStore> {
    if settings.enabled {
        Box::new(LocalDirCache::new(&settings.dir))
    } else {
        Box::new(DisabledCache)
    }
}

/// Runs the "try, log on failure, continue" contract for a side operation.
///
/// On error the failure is logged at `warn`, its text is appended to
/// `warnings`, and `None` is returned so the caller can carry on.
///
/// ```
/// use setup_dnscontrol_install::cache::best_effort;
///
/// let mut warnings = Vec::new();
/// let hit = best_effort("cache restore", Err::<bool, _>("backend down"), &mut warnings);
/// assert_eq!(hit, None);
/// assert_eq!(warnings, vec!["cache restore failed: backend down".to_string()]);
/// ```
pub fn best_effort<T, E: fmt::Display>(
    operation: &str,
    result: Result<T, E>,
    warnings: &mut Vec<String>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            let message = format!("{operation} failed: {err}");
            warn!(target: LOG_TARGET, operation, error = %err, "continuing without it");
            warnings.push(message);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::{Arch, Os};

    fn linux_x64() -> PlatformTarget {
        PlatformTarget::new(Os::Linux, Arch::Amd64)
    }

    #[test]
    fn test_key_is_deterministic() {
        assert_eq!(
            CacheKey::new("dnscontrol", "3.16.0", &linux_x64()),
            CacheKey::new("dnscontrol", "3.16.0", &linux_x64())
        );
    }

    #[test]
    fn test_key_differs_in_every_dimension() {
        let base = CacheKey::new("dnscontrol", "3.16.0", &linux_x64());
        let variants = [
            CacheKey::new("other", "3.16.0", &linux_x64()),
            CacheKey::new("dnscontrol", "3.16.1", &linux_x64()),
            CacheKey::new("dnscontrol", "3.16.0", &PlatformTarget::new(Os::Darwin, Arch::Amd64)),
            CacheKey::new("dnscontrol", "3.16.0", &PlatformTarget::new(Os::Linux, Arch::Arm64)),
        ];
        for variant in variants {
            assert_ne!(base, variant);
        }
    }

    #[test]
    fn test_windows_key_uses_node_tokens() {
        let key = CacheKey::new(
            "dnscontrol",
            "4.2.0",
            &PlatformTarget::new(Os::Windows, Arch::Arm64),
        );
        assert_eq!(key.to_string(), "dnscontrol-cache-4.2.0-win32-arm64");
    }

    #[test]
    fn test_best_effort_passes_success_through() {
        let mut warnings = Vec::new();
        let value = best_effort("cache save", Ok::<_, CacheError>(7), &mut warnings);
        assert_eq!(value, Some(7));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_best_effort_records_failure() {
        let mut warnings = Vec::new();
        let value: Option<()> = best_effort(
            "cache save",
            Err(CacheError::Unavailable("quota exceeded".to_string())),
            &mut warnings,
        );
        assert_eq!(value, None);
        assert_eq!(
            warnings,
            vec!["cache save failed: cache backend unavailable: quota exceeded".to_string()]
        );
    }

    #[test]
    fn test_disabled_cache_always_misses() {
        let dir = setup_dnscontrol_testkit::scratch_dir();
        let key = CacheKey::new("dnscontrol", "3.16.0", &linux_x64());

        DisabledCache.save(dir.path(), &key).unwrap();
        assert!(!DisabledCache.restore(dir.path(), &key).unwrap());
    }

    #[test]
    fn test_store_for_disabled_settings() {
        let dir = setup_dnscontrol_testkit::scratch_dir();
        let settings = CacheSettings {
            enabled: false,
            dir: dir.path().to_path_buf(),
        };
        let key = CacheKey::new("dnscontrol", "3.16.0", &linux_x64());
        let store = store_for(&settings);

        std::fs::write(dir.path().join("dnscontrol"), b"bin").unwrap();
        store.save(dir.path(), &key).unwrap();
        assert!(!dir.path().join(key.as_str()).exists());
    }
}
