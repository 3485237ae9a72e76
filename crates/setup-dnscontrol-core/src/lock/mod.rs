//! Advisory file locks for install directories.
//!
//! Two pipeline jobs installing the same version on one machine would write
//! into the same directory. The installer holds an exclusive lock on a
//! sibling `.lock` file for the whole install so the second job waits and
//! then finds the finished result.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::info;

mod guard;

pub use guard::LockGuard;


pub(crate) const LOG_TARGET: &str = "setup_dnscontrol::lock";

/// Waiting longer than this gets a log line naming the contended lock.
const SLOW_WAIT_NOTICE: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum LockError {
    /// Another job kept the install directory past the timeout.
    #[error("gave up after {waited:?} waiting for {} ({holder_hint})", path.display())]
    Timeout {
        path: PathBuf,
        waited: Duration,
        holder_hint: String,
    },

    #[error("cannot {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LockError {
    fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        LockError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Doubling sleep interval, capped, that never oversleeps a deadline.
#[derive(Debug)]
struct Backoff {
    next: Duration,
    cap: Duration,
}

impl Backoff {
    fn new() -> Self {
        Self {
            next: Duration::from_millis(10),
            cap: Duration::from_millis(500),
        }
    }

    fn wait(&mut self, remaining: Duration) {
        thread::sleep(self.next.min(remaining));
        self.next = (self.next * 2).min(self.cap);
    }
}

/// Acquires an exclusive lock on `lock_path`, retrying with exponential
/// backoff until `timeout` elapses.
///
/// `purpose` names what the lock protects and ends up in the timeout error
/// and the slow-wait log line. The lock is released when the returned
/// [`LockGuard`] is dropped.
///
/// # Examples
///
/// ```no_run
/// use setup_dnscontrol_core::lock::acquire_lock;
/// use std::path::Path;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let guard = acquire_lock(
///     Path::new("/tmp/dnscontrol-3.16.0-linux-x64.lock"),
///     Duration::from_secs(30),
///     "install dnscontrol 3.16.0",
/// )?;
/// // install here
/// drop(guard);
/// # Ok(())
/// # }
/// ```
pub fn acquire_lock(
    lock_path: &Path,
    timeout: Duration,
    purpose: &str,
) -> Result<LockGuard, LockError> {
    if let Some(parent) = lock_path.parent() {
        fs::create_dir_all(parent).map_err(|e| LockError::io("create", parent, e))?;
    }

    let started = Instant::now();
    let mut backoff = Backoff::new();
    let mut announced = false;

    loop {
        let file = open_lock_file(lock_path)?;
        match file.try_lock_exclusive() {
            Ok(()) => return Ok(LockGuard::new(file, lock_path)),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
            Err(e) => return Err(LockError::io("lock", lock_path, e)),
        }

        let waited = started.elapsed();
        if waited >= timeout {
            return Err(LockError::Timeout {
                path: lock_path.to_path_buf(),
                waited,
                holder_hint: format!("another job is running: {purpose}"),
            });
        }
        if !announced && waited >= SLOW_WAIT_NOTICE {
            info!(
                target: LOG_TARGET,
                path = %lock_path.display(),
                purpose,
                "install directory busy, waiting"
            );
            announced = true;
        }
        backoff.wait(timeout - waited);
    }
}

fn open_lock_file(lock_path: &Path) -> Result<File, LockError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .map_err(|e| LockError::io("open", lock_path, e))
}

/// Lock file path guarding `dir`: a sibling named `<dir>.lock`.
///
/// Kept outside the directory so it never ends up in a cache entry.
pub fn lock_path_for(dir: &Path) -> PathBuf {
    let mut name = dir
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    dir.with_file_name(name)
}
