//! CLI command definitions and handlers

mod audit;
mod init;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// claudemd-audit - keep CLAUDE.md honest
#[derive(Parser, Debug)]
#[command(name = "claudemd-audit")]
#[command(
    version,
    about = "Audit a CLAUDE.md project-context file against the actual codebase",
    long_about = "claudemd-audit scans your repository for ground truth (languages, \
frameworks, commands, file layout) and checks the claims your CLAUDE.md makes \
against it. Five rule families produce findings and a deterministic 0-100 score.\n\n\
Run without a subcommand to audit ./CLAUDE.md against the current directory.",
    after_help = "\
Examples:
  claudemd-audit                              Audit ./CLAUDE.md
  claudemd-audit audit docs/CLAUDE.md         Audit a specific file
  claudemd-audit audit --project ../app       Scan a different project root
  claudemd-audit audit --format json          JSON output for scripting
  claudemd-audit audit --min-score 60         Fail CI below 60
  claudemd-audit init                         Write a default claudemd-audit.toml"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel evaluator workers (1-64)
    #[arg(long, global = true, default_value = "4", value_parser = parse_workers)]
    pub workers: usize,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit a CLAUDE.md file against the codebase it describes
    #[command(after_help = "\
Exit codes:
  0  score at or above --min-score
  2  score below --min-score
  1  hard error (unreadable file, empty document, bad config)")]
    Audit {
        /// Path to the document (default: CLAUDE.md)
        #[arg(default_value = "CLAUDE.md")]
        path: PathBuf,

        /// Project root to scan (default: the document's directory)
        #[arg(long, short = 'p')]
        project: Option<PathBuf>,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
        format: String,

        /// Minimum acceptable score; exit code 2 below this
        #[arg(long, default_value = "40")]
        min_score: u32,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Write a claudemd-audit.toml with the default thresholds and weights
    Init,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Audit {
            path,
            project,
            format,
            min_score,
            output,
        }) => audit::run(audit::AuditArgs {
            path,
            project,
            format,
            min_score,
            output,
            workers: cli.workers,
        }),
        Some(Commands::Init) => init::run(&std::env::current_dir()?),
        None => audit::run(audit::AuditArgs {
            path: PathBuf::from("CLAUDE.md"),
            project: None,
            format: "text".to_string(),
            min_score: 40,
            output: None,
            workers: cli.workers,
        }),
    }
}
