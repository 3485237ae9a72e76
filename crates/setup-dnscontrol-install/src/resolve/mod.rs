//! Turning the `latest` alias into a concrete version.
//!
//! Two interchangeable sources can answer "what is the newest release":
//!
//! - [`ApiReleaseSource`]: the releases REST API, optionally authenticated,
//!   reading the `tag_name` field
//! - [`RedirectReleaseSource`]: the unauthenticated `/releases/latest` page,
//!   reading the tag from the `Location` header of the unfollowed redirect
//!
//! Whichever is used, the returned tag has its `v` prefix stripped and must
//! parse as a semantic version. An install never proceeds with an
//! unresolved `latest`.

mod api;
mod redirect;

pub use api::ApiReleaseSource;
pub use redirect::{RedirectReleaseSource, TAG_SEGMENT_INDEX, tag_from_location};

use crate::version::normalize_version;
use setup_dnscontrol_core::{ResolveStrategy, Result, SetupConfig, SetupError};
use tracing::debug;

const LOG_TARGET: &str = "setup_dnscontrol::resolve";

/// Source of the most recent published release tag.
pub trait LatestReleaseSource {
    /// Returns the raw tag of the latest release (e.g. `v4.2.0`).
    fn latest_tag(&self) -> Result<String>;

    /// Short label for logs.
    fn describe(&self) -> &'static str;
}

/// Builds the source selected by the configuration.
///
/// # Errors
///
/// Returns `ConfigInvalid` if an endpoint URL is malformed, or a resolution
/// error if the HTTP client cannot be built.
pub fn source_for(config: &SetupConfig) -> Result<Box<dyn LatestReleaseSource>> {
    let source: Box<dyn LatestReleaseSource> = match config.effective_strategy() {
        ResolveStrategy::Api => Box::new(ApiReleaseSource::new(
            &config.endpoints.api,
            config.auth_token.clone(),
        )?),
        ResolveStrategy::Redirect | ResolveStrategy::Auto => {
            Box::new(RedirectReleaseSource::new(&config.endpoints.github)?)
        }
    };
    Ok(source)
}

/// Asks `source` for the latest tag and returns it as a bare version.
///
/// # Errors
///
/// Propagates the source's resolution error, or returns `ResolutionFailed`
/// when the tag is not a semantic version.
pub fn resolve_latest(source: &dyn LatestReleaseSource) -> Result<String> {
    debug!(target: LOG_TARGET, source = source.describe(), "requesting latest dnscontrol version");

    let tag = source.latest_tag()?;
    let version = normalize_version(tag.trim());

    semver::Version::parse(version).map_err(|e| {
        SetupError::ResolutionFailed(format!(
            "latest release tag '{tag}' is not a version: {e}"
        ))
    })?;

    debug!(target: LOG_TARGET, %version, "latest version resolved");
    Ok(version.to_string())
}
