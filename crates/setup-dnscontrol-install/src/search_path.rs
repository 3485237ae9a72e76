//! The executable search path handed to later stages.
//!
//! Registration never touches the process environment. The updated path is
//! an explicit value the verifier searches, and when the pipeline provides a
//! `GITHUB_PATH` file the directory is appended there so subsequent steps
//! pick it up.

use setup_dnscontrol_core::{Result, SetupError};
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const LOG_TARGET: &str = "setup_dnscontrol::path";

#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    entries: Vec<PathBuf>,
    github_path_file: Option<PathBuf>,
}

impl SearchPath {
    pub fn new(entries: Vec<PathBuf>, github_path_file: Option<PathBuf>) -> Self {
        Self {
            entries,
            github_path_file,
        }
    }

    /// Starts from the current process `PATH`.
    pub fn from_env(github_path_file: Option<PathBuf>) -> Self {
        let entries = std::env::var_os("PATH")
            .map(|path| std::env::split_paths(&path).collect())
            .unwrap_or_default();
        Self::new(entries, github_path_file)
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Puts `dir` first in the search order and publishes it to the pipeline.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the `GITHUB_PATH` file cannot be appended to.
    pub fn register(&mut self, dir: &Path) -> Result<()> {
        self.entries.retain(|entry| entry != dir);
        self.entries.insert(0, dir.to_path_buf());

        if let Some(file) = &self.github_path_file {
            let mut handle = OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .map_err(|e| SetupError::io(format!("open {}", file.display()), e))?;
            writeln!(handle, "{}", dir.display())
                .map_err(|e| SetupError::io(format!("append to {}", file.display()), e))?;
        }

        debug!(target: LOG_TARGET, dir = %dir.display(), "added to search path");
        Ok(())
    }

    /// The entries joined with the platform separator, as `PATH` expects.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if an entry contains the separator itself.
    pub fn joined(&self) -> Result<OsString> {
        std::env::join_paths(&self.entries).map_err(|e| SetupError::ConfigInvalid {
            field: "PATH".to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use setup_dnscontrol_testkit::scratch_dir;

    #[test]
    fn test_register_prepends() {
        let mut path = SearchPath::new(vec![PathBuf::from("/usr/bin")], None);
        path.register(Path::new("/opt/dnscontrol")).unwrap();

        assert_eq!(
            path.entries(),
            &[PathBuf::from("/opt/dnscontrol"), PathBuf::from("/usr/bin")]
        );
    }

    #[test]
    fn test_register_moves_existing_entry_to_front() {
        let mut path = SearchPath::new(
            vec![PathBuf::from("/usr/bin"), PathBuf::from("/opt/dnscontrol")],
            None,
        );
        path.register(Path::new("/opt/dnscontrol")).unwrap();

        assert_eq!(path.entries().len(), 2);
        assert_eq!(path.entries()[0], PathBuf::from("/opt/dnscontrol"));
    }

    #[test]
    fn test_register_appends_to_github_path_file() {
        let temp = scratch_dir();
        let file = temp.path().join("github_path");
        std::fs::write(&file, "/already/there\n").unwrap();

        let mut path = SearchPath::new(Vec::new(), Some(file.clone()));
        path.register(Path::new("/opt/dnscontrol")).unwrap();

        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "/already/there\n/opt/dnscontrol\n"
        );
    }

    #[test]
    fn test_register_does_not_mutate_process_path() {
        let before = std::env::var_os("PATH");
        let mut path = SearchPath::from_env(None);
        path.register(Path::new("/opt/not-in-process-path")).unwrap();
        assert_eq!(std::env::var_os("PATH"), before);
    }

    #[test]
    #[cfg(unix)]
    fn test_joined_uses_separator() {
        let path = SearchPath::new(vec![PathBuf::from("/a"), PathBuf::from("/b")], None);
        assert_eq!(path.joined().unwrap(), OsString::from("/a:/b"));
    }
}
