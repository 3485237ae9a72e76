use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallSource {
    Cache,
    Download,
}

impl fmt::Display for InstallSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallSource::Cache => write!(f, "cache"),
            InstallSource::Download => write!(f, "release download"),
        }
    }
}

/// The verified result of a setup run.
#[derive(Debug, Clone)]
pub struct InstalledBinary {
    pub version: String,
    pub source: InstallSource,
    /// Absolute path of the executable found on the search path.
    pub path: PathBuf,
}
