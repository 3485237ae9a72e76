//! tracing subscriber setup
//!
//! Logs go to stderr so stdout stays reserved for workflow commands and the
//! installed path.

use anyhow::{Result, anyhow};
use std::io;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a full filter directive.
pub const LOG_ENV: &str = "SETUP_DNSCONTROL_LOG";

pub fn init(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| {
            EnvFilter::try_new(format!(
                "warn,setup_dnscontrol={level},setup_dnscontrol_core={level},setup_dnscontrol_install={level}"
            ))
        })
        .map_err(|e| anyhow!("Failed to create tracing filter: {e}"))?;

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(verbose)
        .without_time();

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {e}"))
}
