//! Streaming asset download into a staging directory.

use reqwest::blocking::Client;
use setup_dnscontrol_core::{Result, SetupError};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

const LOG_TARGET: &str = "setup_dnscontrol::download";

/// Downloads `url` into a new file inside `dir`.
///
/// The file keeps the last path segment of the URL as its name so the
/// archive format stays recognisable. When the server announces a
/// `Content-Length`, the number of bytes written must match it.
///
/// # Errors
///
/// Returns `DownloadFailed` for transport errors and non-success statuses,
/// `SizeMismatch` for a truncated body, `Io` for local write failures.
pub fn download_to(client: &Client, url: &Url, dir: &Path) -> Result<PathBuf> {
    let failed = |reason: String| SetupError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    debug!(target: LOG_TARGET, %url, "downloading release asset");

    let mut response = client
        .get(url.as_str())
        .send()
        .map_err(|e| failed(e.without_url().to_string()))?;

    if let Err(err) = response.error_for_status_ref() {
        return Err(failed(err.without_url().to_string()));
    }

    let expected_size = response.content_length();

    let file_name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .unwrap_or("download");
    let path = dir.join(file_name);

    let mut file = std::fs::File::create(&path)
        .map_err(|e| SetupError::io(format!("create {}", path.display()), e))?;

    let mut downloaded: u64 = 0;
    let mut buffer = [0; 8192];

    loop {
        let bytes_read = response
            .read(&mut buffer)
            .map_err(|e| failed(format!("read from HTTP response: {e}")))?;

        if bytes_read == 0 {
            break;
        }

        file.write_all(&buffer[..bytes_read])
            .map_err(|e| SetupError::io(format!("write {}", path.display()), e))?;

        downloaded += bytes_read as u64;
    }

    if let Some(expected) = expected_size {
        if downloaded != expected {
            return Err(SetupError::SizeMismatch {
                expected,
                actual: downloaded,
            });
        }
    }

    file.sync_all()
        .map_err(|e| SetupError::io(format!("sync {}", path.display()), e))?;

    debug!(target: LOG_TARGET, bytes = downloaded, path = %path.display(), "download complete");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::build_client;
    use mockito::Server;
    use std::time::Duration;

    fn client() -> Client {
        build_client(Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn test_download_keeps_asset_name() {
        let mut server = Server::new();
        let body = vec![b'x'; 1000];
        let mock = server
            .mock("GET", "/assets/dnscontrol_1.0.0_linux_amd64.tar.gz")
            .with_status(200)
            .with_body(&body)
            .create();

        let dir = setup_dnscontrol_testkit::scratch_dir();
        let url = Url::parse(&format!(
            "{}/assets/dnscontrol_1.0.0_linux_amd64.tar.gz",
            server.url()
        ))
        .unwrap();

        let path = download_to(&client(), &url, dir.path()).unwrap();

        mock.assert();
        assert_eq!(
            path.file_name().unwrap(),
            "dnscontrol_1.0.0_linux_amd64.tar.gz"
        );
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 1000);
    }

    #[test]
    fn test_download_not_found() {
        let mut server = Server::new();
        server.mock("GET", "/missing.zip").with_status(404).create();

        let dir = setup_dnscontrol_testkit::scratch_dir();
        let url = Url::parse(&format!("{}/missing.zip", server.url())).unwrap();

        let err = download_to(&client(), &url, dir.path()).unwrap_err();
        match err {
            SetupError::DownloadFailed { url: failed_url, reason } => {
                assert!(failed_url.ends_with("/missing.zip"));
                assert!(reason.contains("404"), "reason: {reason}");
            }
            other => panic!("expected DownloadFailed, got: {other:?}"),
        }
    }

    #[test]
    fn test_download_network_error() {
        // Nothing listens on the discard port.
        let url = Url::parse("http://127.0.0.1:9/asset.tar.gz").unwrap();
        let dir = setup_dnscontrol_testkit::scratch_dir();

        let err = download_to(&client(), &url, dir.path()).unwrap_err();
        assert!(matches!(err, SetupError::DownloadFailed { .. }));
    }
}
