//! Installer: from a concrete version to a binary on the search path.
//!
//! ```text
//! Installer::install()
//!     ↓
//! lock {install_dir}.lock
//!     ↓
//! CHECK_CACHE ── hit ───────────────────────────────┐
//!     ↓ miss                                         │
//! LOCATE        artifact_uri(), ArchiveFormat        │
//!     ↓                                              │
//! DOWNLOAD      download_to()                        │
//!     ↓                                              │
//! EXTRACT       extract() + find_binary()            │
//!     ↓                                              │
//! PLACE         atomic_move() + set_executable()     │
//!     ↓                                              │
//! SAVE_CACHE    best effort                          │
//!     ↓ ←────────────────────────────────────────────┘
//! register install_dir on the SearchPath
//! ```

pub mod archive;
pub mod download;
pub mod installer;
pub mod locate;
pub mod place;
pub mod platform;

pub use archive::{ArchiveFormat, extract, find_binary};
pub use download::download_to;
pub use installer::{InstallReport, Installer, install_dir_for};
pub use locate::{artifact_uri, asset_file_name};
pub use place::{atomic_move, set_executable};
pub use platform::{Arch, Os, PlatformTarget};
