//! CLI structure using clap
//!
//! Every input can come from a flag or from the environment the pipeline
//! runner provides (`INPUT_*` for step inputs, `GITHUB_*`/`RUNNER_*` for
//! runner state).

use clap::Parser;
use setup_dnscontrol_core::ResolveStrategy;
use setup_dnscontrol_core::config::{DEFAULT_API_URL, DEFAULT_GITHUB_URL};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "setup-dnscontrol")]
#[command(about = "Install a dnscontrol release and put it on the pipeline PATH")]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Version to install: `latest` or an explicit version (e.g. "v3.16.0")
    #[arg(long, env = "INPUT_VERSION")]
    pub version: String,

    /// Token for the GitHub releases API
    #[arg(long, env = "INPUT_AUTH-TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Earlier name of the token input
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide = true, hide_env_values = true)]
    pub github_token: Option<String>,

    #[arg(long, env = "GITHUB_TOKEN", hide = true, hide_env_values = true)]
    pub runner_token: Option<String>,

    /// How `latest` is resolved: auto, api or redirect
    #[arg(long, env = "INPUT_STRATEGY", default_value = "auto")]
    pub strategy: ResolveStrategy,

    /// Target OS instead of the host's (linux, darwin, windows)
    #[arg(long)]
    pub os: Option<String>,

    /// Target architecture instead of the host's (amd64, arm64)
    #[arg(long)]
    pub arch: Option<String>,

    /// Directory receiving the versioned install directory
    #[arg(long, env = "RUNNER_TEMP")]
    pub install_root: Option<PathBuf>,

    /// Skip cache restore and save
    #[arg(long)]
    pub no_cache: bool,

    /// Local cache directory
    #[arg(long, env = "SETUP_DNSCONTROL_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// GitHub web endpoint (release pages and downloads)
    #[arg(long, default_value = DEFAULT_GITHUB_URL)]
    pub github_url: String,

    /// GitHub REST API endpoint
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Seconds to wait for another job installing the same version
    #[arg(long, default_value_t = 300)]
    pub lock_timeout_secs: u64,

    /// Seconds allowed for the release download
    #[arg(long, default_value_t = 300)]
    pub http_timeout_secs: u64,

    #[arg(long, env = "GITHUB_PATH", hide = true)]
    pub github_path: Option<PathBuf>,

    #[arg(long, env = "GITHUB_OUTPUT", hide = true)]
    pub github_output: Option<PathBuf>,

    /// Emit workflow commands (groups, error annotations)
    #[arg(long, env = "GITHUB_ACTIONS", hide = true)]
    pub github_actions: bool,

    #[arg(short, long)]
    pub verbose: bool,
}
