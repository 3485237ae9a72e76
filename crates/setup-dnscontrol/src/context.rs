//! Run context built from the parsed CLI

use crate::cli::Cli;
use setup_dnscontrol_core::SetupConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the library plus what only the binary needs.
pub struct Context {
    pub config: SetupConfig,
    pub github_actions: bool,
}

// Runners export unset inputs as empty strings.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_empty_path(value: Option<PathBuf>) -> Option<PathBuf> {
    value.filter(|p| !p.as_os_str().is_empty())
}

impl Context {
    pub fn from_cli(cli: Cli) -> Self {
        let mut config = SetupConfig::new(cli.version);

        config.auth_token = non_empty(cli.auth_token)
            .or_else(|| non_empty(cli.github_token))
            .or_else(|| non_empty(cli.runner_token));
        config.strategy = cli.strategy;
        config.target.os = non_empty(cli.os);
        config.target.arch = cli.arch;

        if let Some(root) = non_empty_path(cli.install_root) {
            config.install_root = root;
        }

        config.cache.enabled = !cli.no_cache;
        if let Some(dir) = non_empty_path(cli.cache_dir) {
            config.cache.dir = dir;
        }

        config.endpoints.github = cli.github_url;
        config.endpoints.api = cli.api_url;
        config.lock_timeout = Duration::from_secs(cli.lock_timeout_secs);
        config.http_timeout = Duration::from_secs(cli.http_timeout_secs);
        config.github_path_file = non_empty_path(cli.github_path);
        config.github_output_file = non_empty_path(cli.github_output);

        Self {
            config,
            github_actions: cli.github_actions,
        }
    }
}
