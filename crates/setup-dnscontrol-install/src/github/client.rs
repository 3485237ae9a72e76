//! HTTP client construction for GitHub interactions

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use std::time::Duration;

/// Timeout for small metadata requests (release lookups).
pub const API_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request; the GitHub API rejects requests without one.
pub const USER_AGENT: &str = concat!("setup-dnscontrol/", env!("CARGO_PKG_VERSION"));

/// Builds an HTTP client that follows redirects (asset downloads land on a CDN).
///
/// # Errors
///
/// Returns error if the TLS backend cannot be initialised.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Builds an HTTP client that never follows redirects.
///
/// Needed to read the `Location` header of the first response as-is.
///
/// # Errors
///
/// Returns error if the TLS backend cannot be initialised.
pub fn build_no_redirect_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .redirect(Policy::none())
        .build()
}
