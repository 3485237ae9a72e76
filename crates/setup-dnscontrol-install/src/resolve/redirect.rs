//! Latest release through the `/releases/latest` redirect
//!
//! GitHub answers `GET https://github.com/{owner}/{repo}/releases/latest`
//! with a redirect to `/{owner}/{repo}/releases/tag/{tag}`. The redirect is
//! not followed; the tag is read positionally from the `Location` path.

use super::LatestReleaseSource;
use crate::github::{API_TIMEOUT, build_no_redirect_client, endpoint_url};
use reqwest::blocking::Client;
use reqwest::header::LOCATION;
use setup_dnscontrol_core::{REPO_NAME, REPO_OWNER, Result, SetupError};
use url::Url;

/// Index of the tag in `/{owner}/{repo}/releases/tag/{tag}`.
pub const TAG_SEGMENT_INDEX: usize = 4;

pub struct RedirectReleaseSource {
    client: Client,
    url: Url,
}

impl RedirectReleaseSource {
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for a malformed GitHub URL.
    pub fn new(github_base: &str) -> Result<Self> {
        let url = endpoint_url(github_base, &[REPO_OWNER, REPO_NAME, "releases", "latest"])
            .map_err(|e| SetupError::ConfigInvalid {
                field: "github-url".to_string(),
                reason: e.to_string(),
            })?;

        let client = build_no_redirect_client(API_TIMEOUT).map_err(|e| {
            SetupError::ResolutionFailed(format!("failed to build HTTP client: {e}"))
        })?;

        Ok(Self { client, url })
    }
}

impl LatestReleaseSource for RedirectReleaseSource {
    fn latest_tag(&self) -> Result<String> {
        let response = self.client.get(self.url.as_str()).send().map_err(|e| {
            SetupError::ResolutionFailed(format!("request to {} failed: {}", self.url, e))
        })?;

        let status = response.status();
        if !status.is_redirection() {
            return Err(SetupError::ResolutionUnexpectedStatus {
                url: self.url.to_string(),
                status: status.as_u16(),
                expected: "3xx redirect".to_string(),
            });
        }

        let location = response
            .headers()
            .get(LOCATION)
            .ok_or_else(|| {
                SetupError::ResolutionFailed(format!(
                    "redirect from {} has no Location header",
                    self.url
                ))
            })?
            .to_str()
            .map_err(|e| {
                SetupError::ResolutionFailed(format!("unreadable Location header: {e}"))
            })?;

        tag_from_location(&self.url, location)
    }

    fn describe(&self) -> &'static str {
        "latest-release redirect"
    }
}

/// Extracts the tag from a redirect `Location`.
///
/// Relative locations are resolved against `request_url`.
///
/// ```
/// use setup_dnscontrol_install::resolve::tag_from_location;
/// use url::Url;
///
/// let request = Url::parse("https://github.com/Org/tool/releases/latest").unwrap();
/// let tag = tag_from_location(&request, "https://github.com/Org/tool/releases/tag/v4.2.0").unwrap();
/// assert_eq!(tag, "v4.2.0");
/// ```
///
/// # Errors
///
/// Returns `ResolutionFailed` when the location is not a URL or has fewer
/// than `TAG_SEGMENT_INDEX + 1` path segments.
pub fn tag_from_location(request_url: &Url, location: &str) -> Result<String> {
    let resolved = request_url.join(location).map_err(|e| {
        SetupError::ResolutionFailed(format!("invalid redirect location '{location}': {e}"))
    })?;

    let segments: Vec<&str> = resolved
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    match segments.get(TAG_SEGMENT_INDEX) {
        Some(tag) => Ok((*tag).to_string()),
        None => Err(SetupError::ResolutionFailed(format!(
            "cannot read release tag from redirect location '{}': expected at least {} path segments, got {}",
            location,
            TAG_SEGMENT_INDEX + 1,
            segments.len()
        ))),
    }
}
