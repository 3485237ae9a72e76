//! Run configuration.
//!
//! A [`SetupConfig`] is assembled once at startup (the binary reads flags and
//! `INPUT_*` variables) and then handed to every stage by reference.

use crate::error::{Result, SetupError};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default GitHub web endpoint (release redirects and asset downloads).
pub const DEFAULT_GITHUB_URL: &str = "https://github.com";

/// Default GitHub REST API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default time to wait for another process installing the same version.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(300);

/// Default timeout for downloading a release asset.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(300);

/// How a `latest` version token is turned into a concrete version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveStrategy {
    /// `Api` when an auth token is configured, `Redirect` otherwise.
    #[default]
    Auto,
    /// Authenticated call to the releases API, reading `tag_name`.
    Api,
    /// Unauthenticated request to `/releases/latest`, reading the `Location` header.
    Redirect,
}

impl ResolveStrategy {
    /// Collapses `Auto` into a concrete strategy.
    pub fn effective(self, auth_token: Option<&str>) -> ResolveStrategy {
        match self {
            ResolveStrategy::Auto => match auth_token {
                Some(token) if !token.trim().is_empty() => ResolveStrategy::Api,
                _ => ResolveStrategy::Redirect,
            },
            other => other,
        }
    }
}

impl FromStr for ResolveStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(ResolveStrategy::Auto),
            "api" => Ok(ResolveStrategy::Api),
            "redirect" => Ok(ResolveStrategy::Redirect),
            other => Err(format!(
                "unknown resolve strategy '{other}' (expected auto, api or redirect)"
            )),
        }
    }
}

impl fmt::Display for ResolveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveStrategy::Auto => write!(f, "auto"),
            ResolveStrategy::Api => write!(f, "api"),
            ResolveStrategy::Redirect => write!(f, "redirect"),
        }
    }
}

/// Optional replacement for the detected host platform.
///
/// Values are kept as raw strings: an unsupported value must reach the
/// artifact locator so it can be reported by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetOverride {
    pub os: Option<String>,
    pub arch: Option<String>,
}

/// Cache layer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub enabled: bool,
    pub dir: PathBuf,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_cache_dir(),
        }
    }
}

/// Remote endpoints. Overridable so tests can point at a local mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub github: String,
    pub api: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            github: DEFAULT_GITHUB_URL.to_string(),
            api: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Everything a single setup run needs to know.
#[derive(Clone)]
pub struct SetupConfig {
    /// Raw version token, `latest` or an explicit (optionally `v`-prefixed) version.
    pub version: String,
    pub auth_token: Option<String>,
    pub strategy: ResolveStrategy,
    pub target: TargetOverride,
    /// Directory under which the version-scoped install directory is created.
    pub install_root: PathBuf,
    pub cache: CacheSettings,
    pub endpoints: Endpoints,
    pub lock_timeout: Duration,
    pub http_timeout: Duration,
    /// File the pipeline reads extra `PATH` entries from (`GITHUB_PATH`).
    pub github_path_file: Option<PathBuf>,
    /// File the pipeline reads step outputs from (`GITHUB_OUTPUT`).
    pub github_output_file: Option<PathBuf>,
}

impl SetupConfig {
    /// Creates a configuration with defaults for everything except the version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            auth_token: None,
            strategy: ResolveStrategy::Auto,
            target: TargetOverride::default(),
            install_root: std::env::temp_dir(),
            cache: CacheSettings::default(),
            endpoints: Endpoints::default(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            github_path_file: None,
            github_output_file: None,
        }
    }

    /// Rejects configurations no stage could work with.
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(SetupError::ConfigInvalid {
                field: "version".to_string(),
                reason: "input required and not supplied".to_string(),
            });
        }

        if !self.install_root.is_absolute() {
            return Err(SetupError::ConfigInvalid {
                field: "install-root".to_string(),
                reason: format!("{} is not an absolute path", self.install_root.display()),
            });
        }

        Ok(())
    }

    /// The strategy actually used for a `latest` token.
    pub fn effective_strategy(&self) -> ResolveStrategy {
        self.strategy.effective(self.auth_token.as_deref())
    }
}

// The token never ends up in logs.
impl fmt::Debug for SetupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetupConfig")
            .field("version", &self.version)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("strategy", &self.strategy)
            .field("target", &self.target)
            .field("install_root", &self.install_root)
            .field("cache", &self.cache)
            .field("endpoints", &self.endpoints)
            .field("lock_timeout", &self.lock_timeout)
            .field("http_timeout", &self.http_timeout)
            .field("github_path_file", &self.github_path_file)
            .field("github_output_file", &self.github_output_file)
            .finish()
    }
}

/// Default location of the local cache.
///
/// - macOS: `~/Library/Caches/setup-dnscontrol`
/// - Linux: `~/.cache/setup-dnscontrol`
/// - Windows: `%LOCALAPPDATA%\setup-dnscontrol`
///
/// Falls back to the temp directory when the platform has no cache dir.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("setup-dnscontrol")
}
