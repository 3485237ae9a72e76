use crate::lock::LockError;
use std::path::PathBuf;
use thiserror::Error;

/// Broad failure categories of a fatal error.
///
/// Cache-layer failures are not listed: they have their own type in the
/// install crate and only ever surface as warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Resolution,
    UnsupportedTarget,
    Transfer,
    Verification,
}

#[derive(Error, Debug)]
pub enum SetupError {
    // Configuration errors
    #[error("CONFIG_INVALID: {field}: {reason}")]
    ConfigInvalid { field: String, reason: String },

    // Resolution errors
    #[error("RESOLUTION_FAILED: {0}")]
    ResolutionFailed(String),

    #[error("RESOLUTION_UNEXPECTED_STATUS: {url} answered {status}, expected {expected}")]
    ResolutionUnexpectedStatus {
        url: String,
        status: u16,
        expected: String,
    },

    // Unsupported-target errors
    #[error("UNSUPPORTED_OS: unsupported OS ({os})")]
    UnsupportedOs { os: String },

    #[error("UNSUPPORTED_ARCH: unsupported {os} architecture ({arch})")]
    UnsupportedArch { os: String, arch: String },

    #[error("UNSUPPORTED_FORMAT: unsupported distributive format: {uri}")]
    UnsupportedFormat { uri: String },

    // Transfer and placement errors
    #[error("DOWNLOAD_FAILED: {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("DOWNLOAD_SIZE_MISMATCH: expected {expected} bytes, got {actual} bytes")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("EXTRACTION_FAILED: {archive_type}: {reason}")]
    ExtractionFailed {
        archive_type: String,
        reason: String,
    },

    #[error("BINARY_NOT_IN_ARCHIVE: {binary_name} not found in extracted archive")]
    BinaryNotInArchive { binary_name: String },

    #[error("IO_ERROR: failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("INSTALL_LOCK_FAILED: {0}")]
    Lock(#[from] LockError),

    // Verification errors
    #[error("BINARY_NOT_FOUND: {binary} binary file not found in $PATH")]
    BinaryNotFound { binary: String },

    #[error("VERIFICATION_FAILED: {path}: {reason}")]
    VerificationFailed { path: PathBuf, reason: String },
}

impl SetupError {
    /// Convenience constructor for I/O failures with an operation description.
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        SetupError::Io {
            operation: operation.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SetupError::ConfigInvalid { .. } => ErrorKind::Config,
            SetupError::ResolutionFailed(_) | SetupError::ResolutionUnexpectedStatus { .. } => {
                ErrorKind::Resolution
            }
            SetupError::UnsupportedOs { .. }
            | SetupError::UnsupportedArch { .. }
            | SetupError::UnsupportedFormat { .. } => ErrorKind::UnsupportedTarget,
            SetupError::DownloadFailed { .. }
            | SetupError::SizeMismatch { .. }
            | SetupError::ExtractionFailed { .. }
            | SetupError::BinaryNotInArchive { .. }
            | SetupError::Io { .. }
            | SetupError::Lock(_) => ErrorKind::Transfer,
            SetupError::BinaryNotFound { .. } | SetupError::VerificationFailed { .. } => {
                ErrorKind::Verification
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SetupError>;
