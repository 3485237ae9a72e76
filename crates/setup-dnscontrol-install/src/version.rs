//! Version tokens as supplied by the user.

use setup_dnscontrol_core::{Result, SetupError};

/// Alias resolved through the upstream release index.
pub const LATEST_ALIAS: &str = "latest";

/// A user-supplied version token after normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    /// The `latest` alias (any case).
    Latest,
    /// A concrete version without a leading `v`.
    Exact(String),
}

impl VersionSpec {
    /// Parses a raw token: `latest` (case-insensitive) or a version,
    /// optionally prefixed with `v`/`V`.
    ///
    /// ```
    /// use setup_dnscontrol_install::version::VersionSpec;
    ///
    /// assert_eq!(VersionSpec::parse("LATEST").unwrap(), VersionSpec::Latest);
    /// assert_eq!(
    ///     VersionSpec::parse("v3.16.0").unwrap(),
    ///     VersionSpec::Exact("3.16.0".to_string())
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for an empty token or one containing characters
    /// that cannot appear in a release tag.
    pub fn parse(raw: &str) -> Result<Self> {
        let token = raw.trim();

        if token.eq_ignore_ascii_case(LATEST_ALIAS) {
            return Ok(VersionSpec::Latest);
        }

        let version = normalize_version(token);
        if version.is_empty() {
            return Err(invalid_version(raw, "no version given"));
        }

        if let Some(bad) = version
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_')))
        {
            return Err(invalid_version(raw, &format!("unexpected character '{bad}'")));
        }

        Ok(VersionSpec::Exact(version.to_string()))
    }
}

/// Strips a single leading `v` or `V`.
///
/// ```
/// use setup_dnscontrol_install::version::normalize_version;
///
/// assert_eq!(normalize_version("v4.2.0"), "4.2.0");
/// assert_eq!(normalize_version("V4.2.0"), "4.2.0");
/// assert_eq!(normalize_version("4.2.0"), "4.2.0");
/// ```
pub fn normalize_version(raw: &str) -> &str {
    raw.strip_prefix(['v', 'V']).unwrap_or(raw)
}

fn invalid_version(raw: &str, reason: &str) -> SetupError {
    SetupError::ConfigInvalid {
        field: "version".to_string(),
        reason: format!("{reason} in '{raw}'"),
    }
}
