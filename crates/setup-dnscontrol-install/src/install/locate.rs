//! Release asset naming.
//!
//! dnscontrol publishes one archive per platform:
//!
//! | OS      | arch          | asset                                   |
//! |---------|---------------|-----------------------------------------|
//! | linux   | amd64         | `dnscontrol_{version}_linux_amd64.tar.gz` |
//! | linux   | arm64         | `dnscontrol_{version}_linux_arm64.tar.gz` |
//! | darwin  | amd64, arm64  | `dnscontrol_{version}_darwin_all.tar.gz`  |
//! | windows | amd64         | `dnscontrol_{version}_windows_amd64.zip`  |
//! | windows | arm64         | `dnscontrol_{version}_windows_arm64.zip`  |
//!
//! macOS ships a single universal archive for both architectures.

use crate::github::endpoint_url;
use crate::install::platform::{Arch, Os, PlatformTarget};
use setup_dnscontrol_core::{REPO_NAME, REPO_OWNER, Result, SetupError, TOOL_NAME};
use url::Url;

/// File name of the release asset for `target`.
///
/// # Errors
///
/// Returns `UnsupportedOs` or `UnsupportedArch` naming the offending value.
pub fn asset_file_name(target: &PlatformTarget, version: &str) -> Result<String> {
    let suffix = match (&target.os, &target.arch) {
        (Os::Linux, Arch::Amd64) => "linux_amd64.tar.gz",
        (Os::Linux, Arch::Arm64) => "linux_arm64.tar.gz",
        (Os::Darwin, Arch::Amd64 | Arch::Arm64) => "darwin_all.tar.gz",
        (Os::Windows, Arch::Amd64) => "windows_amd64.zip",
        (Os::Windows, Arch::Arm64) => "windows_arm64.zip",
        (Os::Other(_), _) => {
            return Err(SetupError::UnsupportedOs {
                os: target.os.to_string(),
            });
        }
        (os, arch @ Arch::Other(_)) => {
            let os = match os {
                Os::Darwin => "macOS".to_string(),
                other => other.to_string(),
            };
            return Err(SetupError::UnsupportedArch {
                os,
                arch: arch.to_string(),
            });
        }
    };

    Ok(format!("{TOOL_NAME}_{version}_{suffix}"))
}

/// Download location of the release asset:
/// `{github}/StackExchange/dnscontrol/releases/download/v{version}/{asset}`.
///
/// ```
/// use setup_dnscontrol_install::install::{Arch, Os, PlatformTarget, artifact_uri};
///
/// let target = PlatformTarget::new(Os::Linux, Arch::Amd64);
/// let uri = artifact_uri("https://github.com", &target, "3.16.0").unwrap();
/// assert_eq!(
///     uri.as_str(),
///     "https://github.com/StackExchange/dnscontrol/releases/download/v3.16.0/dnscontrol_3.16.0_linux_amd64.tar.gz"
/// );
/// ```
///
/// # Errors
///
/// Returns an unsupported-target error (see [`asset_file_name`]) or
/// `ConfigInvalid` for a malformed base URL.
pub fn artifact_uri(github_base: &str, target: &PlatformTarget, version: &str) -> Result<Url> {
    let file_name = asset_file_name(target, version)?;
    let tag = format!("v{version}");

    endpoint_url(
        github_base,
        &[REPO_OWNER, REPO_NAME, "releases", "download", tag.as_str(), file_name.as_str()],
    )
    .map_err(|e| SetupError::ConfigInvalid {
        field: "github-url".to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://github.com/StackExchange/dnscontrol/releases/download/v3.16.0";

    fn uri(os: Os, arch: Arch) -> Result<Url> {
        artifact_uri(
            "https://github.com",
            &PlatformTarget::new(os, arch),
            "3.16.0",
        )
    }

    #[test]
    fn test_supported_matrix() {
        let cases = [
            (Os::Linux, Arch::Amd64, "dnscontrol_3.16.0_linux_amd64.tar.gz"),
            (Os::Linux, Arch::Arm64, "dnscontrol_3.16.0_linux_arm64.tar.gz"),
            (Os::Darwin, Arch::Amd64, "dnscontrol_3.16.0_darwin_all.tar.gz"),
            (Os::Darwin, Arch::Arm64, "dnscontrol_3.16.0_darwin_all.tar.gz"),
            (Os::Windows, Arch::Amd64, "dnscontrol_3.16.0_windows_amd64.zip"),
            (Os::Windows, Arch::Arm64, "dnscontrol_3.16.0_windows_arm64.zip"),
        ];

        for (os, arch, file) in cases {
            let label = format!("{os}/{arch}");
            assert_eq!(
                uri(os, arch).unwrap().as_str(),
                format!("{BASE}/{file}"),
                "{label}"
            );
        }
    }

    #[test]
    fn test_darwin_shares_one_artifact() {
        assert_eq!(
            uri(Os::Darwin, Arch::Amd64).unwrap(),
            uri(Os::Darwin, Arch::Arm64).unwrap()
        );
    }

    #[test]
    fn test_unsupported_arch_is_named() {
        for os in [Os::Linux, Os::Darwin, Os::Windows] {
            let err = uri(os, Arch::Other("x32".to_string())).unwrap_err();
            assert!(
                matches!(err, SetupError::UnsupportedArch { ref arch, .. } if arch == "x32"),
                "got: {err}"
            );
        }
    }

    #[test]
    fn test_unset_windows_arch() {
        let err = uri(Os::Windows, Arch::Other(String::new())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "UNSUPPORTED_ARCH: unsupported windows architecture (unset)"
        );
    }

    #[test]
    fn test_unsupported_os_is_named() {
        let err = uri(Os::Other("freebsd".to_string()), Arch::Amd64).unwrap_err();
        assert!(matches!(err, SetupError::UnsupportedOs { ref os } if os == "freebsd"));
    }

    #[test]
    fn test_macos_error_scope() {
        let err = uri(Os::Darwin, Arch::Other("ppc".to_string())).unwrap_err();
        assert!(err.to_string().contains("unsupported macOS architecture (ppc)"));
    }
}
