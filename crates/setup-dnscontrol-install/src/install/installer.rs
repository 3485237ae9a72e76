use crate::cache::{CacheKey, CacheStore, best_effort};
use crate::github::build_client;
use crate::info::InstallSource;
use crate::install::archive::{ArchiveFormat, extract, find_binary};
use crate::install::download::download_to;
use crate::install::locate::artifact_uri;
use crate::install::place::{atomic_move, set_executable};
use crate::install::platform::PlatformTarget;
use crate::search_path::SearchPath;
use setup_dnscontrol_core::lock::{acquire_lock, lock_path_for};
use setup_dnscontrol_core::{Result, SetupConfig, SetupError, TOOL_NAME};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

const LOG_TARGET: &str = "setup_dnscontrol::install";

/// What an install did.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub version: String,
    pub install_dir: PathBuf,
    pub source: InstallSource,
    pub cache_key: CacheKey,
    /// Non-fatal failures (cache layer, cleanup) that were logged and skipped.
    pub warnings: Vec<String>,
}

/// Install directory for a version on a platform:
/// `{root}/dnscontrol-{version}-{platform}-{arch}`.
pub fn install_dir_for(root: &Path, version: &str, target: &PlatformTarget) -> PathBuf {
    root.join(format!(
        "{TOOL_NAME}-{version}-{}-{}",
        target.os.cache_token(),
        target.arch.cache_token()
    ))
}

pub struct Installer<'a> {
    config: &'a SetupConfig,
    cache: &'a dyn CacheStore,
}

impl<'a> Installer<'a> {
    pub fn new(config: &'a SetupConfig, cache: &'a dyn CacheStore) -> Self {
        Self { config, cache }
    }

    /// Makes `version` available for `target` and registers it on `search_path`.
    ///
    /// `version` must already be concrete (no `latest`, no `v` prefix).
    ///
    /// # Errors
    ///
    /// Any locate, transfer, placement or lock failure is fatal. Cache and
    /// cleanup failures only end up in [`InstallReport::warnings`].
    pub fn install(
        &self,
        version: &str,
        target: &PlatformTarget,
        search_path: &mut SearchPath,
    ) -> Result<InstallReport> {
        // Unsupported targets fail here, before anything is written to disk.
        let uri = artifact_uri(&self.config.endpoints.github, target, version)?;
        let format = ArchiveFormat::from_uri(uri.as_str())?;

        let install_dir = install_dir_for(&self.config.install_root, version, target);
        let _lock = acquire_lock(
            &lock_path_for(&install_dir),
            self.config.lock_timeout,
            &format!("{TOOL_NAME} {version} install"),
        )?;

        let cache_key = CacheKey::new(TOOL_NAME, version, target);
        let mut warnings = Vec::new();

        let hit = best_effort(
            "cache restore",
            self.cache.restore(&install_dir, &cache_key),
            &mut warnings,
        )
        .unwrap_or(false);

        let source = if hit {
            info!(target: LOG_TARGET, key = %cache_key, "restored from cache");
            InstallSource::Cache
        } else {
            self.download_and_place(version, &uri, format, &install_dir, &mut warnings)?;
            best_effort(
                "cache save",
                self.cache.save(&install_dir, &cache_key),
                &mut warnings,
            );
            InstallSource::Download
        };

        search_path.register(&install_dir)?;

        Ok(InstallReport {
            version: version.to_string(),
            install_dir,
            source,
            cache_key,
            warnings,
        })
    }

    fn download_and_place(
        &self,
        version: &str,
        uri: &Url,
        format: ArchiveFormat,
        install_dir: &Path,
        warnings: &mut Vec<String>,
    ) -> Result<()> {
        info!(target: LOG_TARGET, %uri, "downloading {TOOL_NAME} {version}");

        let client =
            build_client(self.config.http_timeout).map_err(|e| SetupError::DownloadFailed {
                url: uri.to_string(),
                reason: e.to_string(),
            })?;

        let staging = tempfile::Builder::new()
            .prefix(".download-")
            .tempdir_in(&self.config.install_root)
            .map_err(|e| SetupError::io("create download staging directory", e))?;

        let archive = download_to(&client, uri, staging.path())?;
        let extracted = extract(&archive, format, staging.path())?;
        let binary_name = format.binary_entry();
        let found = find_binary(extracted.path(), &binary_name)?;

        fs::create_dir_all(install_dir)
            .map_err(|e| SetupError::io(format!("create {}", install_dir.display()), e))?;
        let destination = install_dir.join(&binary_name);
        atomic_move(&found, &destination)?;
        set_executable(&destination)?;
        debug!(target: LOG_TARGET, path = %destination.display(), "binary placed");

        best_effort(
            "remove downloaded archive",
            fs::remove_file(&archive),
            warnings,
        );
        drop(extracted);
        best_effort("remove download staging", staging.close(), warnings);

        Ok(())
    }
}
