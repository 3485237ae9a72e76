//! Latest release through the GitHub REST API

use super::LatestReleaseSource;
use crate::github::{API_TIMEOUT, build_client, endpoint_url};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use setup_dnscontrol_core::{REPO_NAME, REPO_OWNER, Result, SetupError};
use url::Url;

/// The only field read from the release object.
#[derive(Debug, Deserialize)]
struct LatestRelease {
    tag_name: String,
}

/// `GET {api}/repos/StackExchange/dnscontrol/releases/latest`
pub struct ApiReleaseSource {
    client: Client,
    url: Url,
    token: Option<String>,
}

impl ApiReleaseSource {
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for a malformed API URL.
    pub fn new(api_base: &str, token: Option<String>) -> Result<Self> {
        let url = endpoint_url(
            api_base,
            &["repos", REPO_OWNER, REPO_NAME, "releases", "latest"],
        )
        .map_err(|e| SetupError::ConfigInvalid {
            field: "api-url".to_string(),
            reason: e.to_string(),
        })?;

        let client = build_client(API_TIMEOUT).map_err(|e| {
            SetupError::ResolutionFailed(format!("failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            url,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }
}

impl LatestReleaseSource for ApiReleaseSource {
    fn latest_tag(&self) -> Result<String> {
        let mut request = self
            .client
            .get(self.url.as_str())
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| {
            SetupError::ResolutionFailed(format!("request to {} failed: {}", self.url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SetupError::ResolutionUnexpectedStatus {
                url: self.url.to_string(),
                status: status.as_u16(),
                expected: "2xx".to_string(),
            });
        }

        let release: LatestRelease = response.json().map_err(|e| {
            SetupError::ResolutionFailed(format!(
                "malformed release response from {}: {}",
                self.url, e
            ))
        })?;

        if release.tag_name.trim().is_empty() {
            return Err(SetupError::ResolutionFailed(format!(
                "release response from {} has an empty tag_name",
                self.url
            )));
        }

        Ok(release.tag_name)
    }

    fn describe(&self) -> &'static str {
        "releases API"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use setup_dnscontrol_testkit::mock_latest_api;

    #[test]
    fn test_latest_tag_from_api() {
        let mut server = Server::new();
        let mock = mock_latest_api(&mut server, 200, r#"{"tag_name": "v4.2.0", "name": "v4.2.0"}"#);

        let source = ApiReleaseSource::new(&server.url(), None).unwrap();
        let tag = source.latest_tag().unwrap();

        mock.assert();
        assert_eq!(tag, "v4.2.0");
    }

    #[test]
    fn test_token_is_sent_as_bearer() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/repos/StackExchange/dnscontrol/releases/latest")
            .match_header("authorization", "Bearer ghp_secret")
            .match_header("accept", "application/vnd.github+json")
            .with_status(200)
            .with_body(r#"{"tag_name": "v4.2.0"}"#)
            .create();

        let source = ApiReleaseSource::new(&server.url(), Some("ghp_secret".to_string())).unwrap();
        source.latest_tag().unwrap();

        mock.assert();
    }

    #[test]
    fn test_blank_token_is_not_sent() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/repos/StackExchange/dnscontrol/releases/latest")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"tag_name": "v4.2.0"}"#)
            .create();

        let source = ApiReleaseSource::new(&server.url(), Some("  ".to_string())).unwrap();
        source.latest_tag().unwrap();

        mock.assert();
    }

    #[test]
    fn test_missing_tag_field_is_an_error() {
        let mut server = Server::new();
        let _mock = mock_latest_api(&mut server, 200, r#"{"name": "release"}"#);

        let source = ApiReleaseSource::new(&server.url(), None).unwrap();
        let err = source.latest_tag().unwrap_err();

        assert!(matches!(err, SetupError::ResolutionFailed(_)));
        assert!(err.to_string().contains("tag_name"), "got: {err}");
    }

    #[test]
    fn test_error_status_is_an_error() {
        let mut server = Server::new();
        let _mock = mock_latest_api(&mut server, 403, r#"{"message": "rate limited"}"#);

        let source = ApiReleaseSource::new(&server.url(), None).unwrap();
        let err = source.latest_tag().unwrap_err();

        assert!(matches!(
            err,
            SetupError::ResolutionUnexpectedStatus { status: 403, .. }
        ));
    }

    #[test]
    fn test_empty_tag_is_an_error() {
        let mut server = Server::new();
        let _mock = mock_latest_api(&mut server, 200, r#"{"tag_name": ""}"#);

        let source = ApiReleaseSource::new(&server.url(), None).unwrap();
        assert!(source.latest_tag().is_err());
    }
}
