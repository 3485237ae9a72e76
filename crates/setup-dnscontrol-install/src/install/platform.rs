use setup_dnscontrol_core::TargetOverride;
use std::fmt;

/// Operating system of the build host.
///
/// Anything outside the supported set is kept verbatim in `Other` so the
/// artifact locator can name it in its error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Os {
    Linux,
    Darwin,
    Windows,
    Other(String),
}

/// CPU architecture of the build host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arch {
    Amd64,
    Arm64,
    Other(String),
}

impl Os {
    /// Accepts Rust (`macos`), Go (`darwin`) and Node (`win32`) spellings.
    pub fn parse(value: &str) -> Os {
        match value.trim().to_ascii_lowercase().as_str() {
            "linux" => Os::Linux,
            "darwin" | "macos" | "osx" => Os::Darwin,
            "windows" | "win32" => Os::Windows,
            _ => Os::Other(value.trim().to_string()),
        }
    }

    pub fn detect() -> Os {
        Os::parse(std::env::consts::OS)
    }

    /// Token used in cache keys and install directory names.
    pub fn cache_token(&self) -> &str {
        match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
            Os::Windows => "win32",
            Os::Other(value) => value,
        }
    }
}

impl Arch {
    /// Accepts Rust (`x86_64`, `aarch64`), Go (`amd64`) and Node (`x64`) spellings.
    pub fn parse(value: &str) -> Arch {
        match value.trim().to_ascii_lowercase().as_str() {
            "amd64" | "x64" | "x86_64" => Arch::Amd64,
            "arm64" | "aarch64" => Arch::Arm64,
            _ => Arch::Other(value.trim().to_string()),
        }
    }

    pub fn detect() -> Arch {
        Arch::parse(std::env::consts::ARCH)
    }

    /// Token used in cache keys and install directory names.
    pub fn cache_token(&self) -> &str {
        match self {
            Arch::Amd64 => "x64",
            Arch::Arm64 => "arm64",
            Arch::Other(value) => value,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Os::Linux => write!(f, "linux"),
            Os::Darwin => write!(f, "darwin"),
            Os::Windows => write!(f, "windows"),
            Os::Other(value) if value.is_empty() => write!(f, "unset"),
            Os::Other(value) => write!(f, "{value}"),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arch::Amd64 => write!(f, "amd64"),
            Arch::Arm64 => write!(f, "arm64"),
            Arch::Other(value) if value.is_empty() => write!(f, "unset"),
            Arch::Other(value) => write!(f, "{value}"),
        }
    }
}

/// The (OS, architecture) pair driving artifact selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformTarget {
    pub os: Os,
    pub arch: Arch,
}

impl PlatformTarget {
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// The host this process runs on.
    pub fn detect() -> Self {
        Self::new(Os::detect(), Arch::detect())
    }

    /// The host, with any configured dimension replaced.
    pub fn resolve(overrides: &TargetOverride) -> Self {
        let os = overrides
            .os
            .as_deref()
            .map(Os::parse)
            .unwrap_or_else(Os::detect);
        let arch = overrides
            .arch
            .as_deref()
            .map(Arch::parse)
            .unwrap_or_else(Arch::detect);
        Self::new(os, arch)
    }
}

impl fmt::Display for PlatformTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}
