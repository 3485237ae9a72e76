//! URL construction helpers for GitHub resources

use thiserror::Error;
use url::Url;

/// Appends path segments to `url`, keeping any path it already has.
///
/// Segments are percent-encoded, so a version string can never inject extra
/// path components. An existing path prefix matters for GitHub Enterprise,
/// whose API lives below `/api/v3`.
///
/// # Errors
///
/// Returns error if the URL cannot be a base (e.g. `mailto:`).
pub fn add_path_segments(url: &mut Url, segments: &[&str]) -> Result<(), UrlError> {
    let url_for_error = url.clone();
    url.path_segments_mut()
        .map_err(|_| UrlError::CannotBeABase { url: url_for_error })?
        .pop_if_empty()
        .extend(segments);
    Ok(())
}

/// Parses `base` and appends `segments`.
///
/// ```
/// use setup_dnscontrol_install::github::endpoint_url;
///
/// let url = endpoint_url("https://api.github.com", &["repos", "o", "r"]).unwrap();
/// assert_eq!(url.as_str(), "https://api.github.com/repos/o/r");
/// ```
///
/// # Errors
///
/// Returns error if `base` is not a valid base URL.
pub fn endpoint_url(base: &str, segments: &[&str]) -> Result<Url, UrlError> {
    let mut url = Url::parse(base)?;
    add_path_segments(&mut url, segments)?;
    Ok(url)
}

#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL cannot be a base: {url}")]
    CannotBeABase { url: Url },

    #[error("Invalid URL: {0}")]
    ParseError(#[from] url::ParseError),
}
