//! claudemd-audit CLI
//!
//! Audits a CLAUDE.md project-context file against the codebase it
//! describes and reports findings with a deterministic 0-100 score.

use anyhow::Result;
use clap::Parser;
use claudemd_audit::cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone())),
        )
        .init();

    cli::run(cli)
}
