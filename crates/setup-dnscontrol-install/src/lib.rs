//! Installing a pinned dnscontrol release on a CI build host.
//!
//! # Flow
//!
//! ```text
//! run_setup()
//!     ↓
//! 1. Resolve (only for "latest")
//!     → ApiReleaseSource (token) or RedirectReleaseSource
//!     → strip "v", require a semantic version
//!     ↓
//! 2. Install
//!     → lock {install_root}/dnscontrol-{version}-{os}-{arch}
//!     → cache restore (best effort)
//!     → miss: locate → download → extract → place → chmod → cache save
//!     → register the directory on the SearchPath
//!     ↓
//! 3. Verify
//!     → which_in("dnscontrol", search path)
//!     → run `dnscontrol version`, require exit 0
//!     ↓
//! InstalledBinary { version, source, path }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use setup_dnscontrol_core::SetupConfig;
//! use setup_dnscontrol_install::{NoopObserver, cache::store_for, run_setup};
//!
//! # fn main() -> setup_dnscontrol_core::Result<()> {
//! let config = SetupConfig::new("v3.16.0");
//! let cache = store_for(&config.cache);
//! let outcome = run_setup(&config, cache.as_ref(), &mut NoopObserver)?;
//! println!("{}", outcome.binary.path.display());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod github;
pub mod info;
pub mod install;
pub mod resolve;
pub mod search_path;
pub mod setup;
pub mod verify;
pub mod version;

pub use info::{InstallSource, InstalledBinary};
pub use search_path::SearchPath;
pub use setup::{NoopObserver, SetupOutcome, Stage, StageObserver, run_setup};
pub use verify::verify_installation;
pub use version::VersionSpec;
