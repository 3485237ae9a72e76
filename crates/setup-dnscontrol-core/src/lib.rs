//! Shared building blocks for the dnscontrol setup step.
//!
//! - [`config`]: the run configuration, built once and passed down explicitly
//! - [`error`]: the error taxonomy every stage reports through
//! - [`lock`]: advisory file locks guarding an install directory

pub mod config;
pub mod error;
pub mod lock;

pub use config::{CacheSettings, Endpoints, ResolveStrategy, SetupConfig, TargetOverride};
pub use error::{ErrorKind, Result, SetupError};

/// Name of the managed tool, used for binaries, cache keys and directories.
pub const TOOL_NAME: &str = "dnscontrol";

/// GitHub owner of the upstream repository.
pub const REPO_OWNER: &str = "StackExchange";

/// GitHub repository publishing the release assets.
pub const REPO_NAME: &str = "dnscontrol";
