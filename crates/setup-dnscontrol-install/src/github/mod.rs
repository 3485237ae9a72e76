//! Shared GitHub interaction utilities
//!
//! - HTTP client construction with a user agent and timeouts
//! - URL construction for release pages, API endpoints and assets

pub mod client;
pub mod url;

pub use client::{API_TIMEOUT, USER_AGENT, build_client, build_no_redirect_client};
pub use url::{UrlError, add_path_segments, endpoint_url};
