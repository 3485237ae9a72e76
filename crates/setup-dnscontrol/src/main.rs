mod cli;
mod context;
mod logging;
mod output;

use anyhow::{Context as _, Result};
use clap::Parser;
use cli::Cli;
use colored::Colorize;
use context::Context;
use setup_dnscontrol_core::SetupError;
use setup_dnscontrol_install::cache::store_for;
use setup_dnscontrol_install::run_setup;

/// Name of the step output carrying the binary path.
const OUTPUT_NAME: &str = "dnscontrol-bin";

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    let ctx = Context::from_cli(cli);

    if let Err(e) = logging::init(verbose) {
        eprintln!("Warning: {e}");
    }

    if let Err(e) = run(&ctx) {
        let message = failure_message(&e);
        if ctx.github_actions {
            output::error_annotation(&message);
        }
        eprintln!("{} {}", "Error:".red().bold(), message);
        std::process::exit(1);
    }
}

/// Setup errors already name their cause; anything else gets its context chain.
fn failure_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<SetupError>() {
        Some(setup) => setup.to_string(),
        None => format!("{err:#}"),
    }
}

fn run(ctx: &Context) -> Result<()> {
    let cache = store_for(&ctx.config.cache);
    let mut observer = output::GroupObserver::new(ctx.github_actions);

    let outcome = run_setup(&ctx.config, cache.as_ref(), &mut observer)?;

    if ctx.github_actions {
        for warning in &outcome.report.warnings {
            output::warning_annotation(warning);
        }
    }

    let path = outcome.binary.path.display().to_string();
    if let Some(file) = &ctx.config.github_output_file {
        output::set_output(file, OUTPUT_NAME, &path)
            .with_context(|| format!("failed to write step output to {}", file.display()))?;
    }

    eprintln!(
        "{} dnscontrol {} installed from {}",
        "✓".green(),
        outcome.binary.version,
        outcome.binary.source
    );
    output::print_text(&path)?;

    Ok(())
}
