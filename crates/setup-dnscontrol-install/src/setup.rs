//! Orchestrator: Resolver → Installer → Verifier.
//!
//! Stages run strictly in sequence. The first fatal error ends the run and
//! is returned unchanged; there is no recovery between stages.

use crate::cache::CacheStore;
use crate::info::InstalledBinary;
use crate::install::{InstallReport, Installer, PlatformTarget};
use crate::resolve::{resolve_latest, source_for};
use crate::search_path::SearchPath;
use crate::verify::verify_installation;
use crate::version::VersionSpec;
use setup_dnscontrol_core::{Result, SetupConfig};
use std::fmt;
use tracing::info;

const LOG_TARGET: &str = "setup_dnscontrol::setup";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolve,
    Install,
    Verify,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Resolve => write!(f, "resolve"),
            Stage::Install => write!(f, "install"),
            Stage::Verify => write!(f, "verify"),
        }
    }
}

/// Hooks around each stage, used by the binary to group pipeline output.
///
/// `stage_finished` is called whether the stage succeeded or not.
pub trait StageObserver {
    fn stage_started(&mut self, stage: Stage);
    fn stage_finished(&mut self, stage: Stage);
}

#[derive(Debug, Default)]
pub struct NoopObserver;

impl StageObserver for NoopObserver {
    fn stage_started(&mut self, _stage: Stage) {}
    fn stage_finished(&mut self, _stage: Stage) {}
}

#[derive(Debug, Clone)]
pub struct SetupOutcome {
    pub binary: InstalledBinary,
    pub report: InstallReport,
}

fn observed<T>(
    observer: &mut dyn StageObserver,
    stage: Stage,
    run: impl FnOnce() -> Result<T>,
) -> Result<T> {
    observer.stage_started(stage);
    let result = run();
    observer.stage_finished(stage);
    result
}

/// Runs the whole setup for `config`.
///
/// The resolver only runs for the `latest` alias.
///
/// # Errors
///
/// Returns the first fatal error of any stage.
pub fn run_setup(
    config: &SetupConfig,
    cache: &dyn CacheStore,
    observer: &mut dyn StageObserver,
) -> Result<SetupOutcome> {
    config.validate()?;

    let version = match VersionSpec::parse(&config.version)? {
        VersionSpec::Exact(version) => version,
        VersionSpec::Latest => observed(observer, Stage::Resolve, || {
            let source = source_for(config)?;
            resolve_latest(source.as_ref())
        })?,
    };

    let target = PlatformTarget::resolve(&config.target);
    info!(target: LOG_TARGET, %version, %target, "setting up dnscontrol");

    let mut search_path = SearchPath::from_env(config.github_path_file.clone());

    let report = observed(observer, Stage::Install, || {
        Installer::new(config, cache).install(&version, &target, &mut search_path)
    })?;

    let path = observed(observer, Stage::Verify, || {
        verify_installation(&search_path)
    })?;

    info!(target: LOG_TARGET, path = %path.display(), source = %report.source, "dnscontrol is ready");

    Ok(SetupOutcome {
        binary: InstalledBinary {
            version,
            source: report.source,
            path,
        },
        report,
    })
}
