use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

mod cli;

use cli::Cli;
use golden_diff::Comparator;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for diffs
    let level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!("Starting golden-diff v{}", env!("CARGO_PKG_VERSION"));

    let comparator = Comparator::load(cli.config.as_deref())?;

    cli.execute(comparator)
}
