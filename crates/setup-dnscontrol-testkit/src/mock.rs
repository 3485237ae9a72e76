//! mockito helpers for the GitHub endpoints

use mockito::{Mock, ServerGuard};

/// Path of a release asset below the GitHub base URL.
///
/// ```
/// use setup_dnscontrol_testkit::asset_path;
///
/// assert_eq!(
///     asset_path("3.16.0", "dnscontrol_3.16.0_linux_amd64.tar.gz"),
///     "/StackExchange/dnscontrol/releases/download/v3.16.0/dnscontrol_3.16.0_linux_amd64.tar.gz"
/// );
/// ```
pub fn asset_path(version: &str, file_name: &str) -> String {
    format!("/StackExchange/dnscontrol/releases/download/v{version}/{file_name}")
}

/// Serves `body` for a release asset.
pub fn mock_asset(server: &mut ServerGuard, version: &str, file_name: &str, body: &[u8]) -> Mock {
    server
        .mock("GET", asset_path(version, file_name).as_str())
        .with_status(200)
        .with_header("content-type", "application/octet-stream")
        .with_body(body)
        .create()
}

/// Answers `/releases/latest` with `status` and, when given, a `Location` header.
pub fn mock_latest_redirect(
    server: &mut ServerGuard,
    status: usize,
    location: Option<&str>,
) -> Mock {
    let mut mock = server
        .mock("GET", "/StackExchange/dnscontrol/releases/latest")
        .with_status(status);

    if let Some(location) = location {
        mock = mock.with_header("location", location);
    }

    mock.create()
}

/// Answers the releases API `latest` endpoint with `status` and a JSON `body`.
pub fn mock_latest_api(server: &mut ServerGuard, status: usize, body: &str) -> Mock {
    server
        .mock("GET", "/repos/StackExchange/dnscontrol/releases/latest")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create()
}
