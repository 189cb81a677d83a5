//! Audit command - the main entry point

use crate::audit::Auditor;
use crate::config::AuditConfig;
use crate::evaluators::engine::AuditEngine;
use crate::facts::{document_mtime, language_summary, FactScanner};
use crate::reporters;
use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct AuditArgs {
    pub path: PathBuf,
    pub project: Option<PathBuf>,
    pub format: String,
    pub min_score: u32,
    pub output: Option<PathBuf>,
    pub workers: usize,
}

pub fn run(args: AuditArgs) -> Result<()> {
    let doc_path = args
        .path
        .canonicalize()
        .with_context(|| format!("Document not found: {}", args.path.display()))?;

    let project_root = match &args.project {
        Some(root) => root
            .canonicalize()
            .with_context(|| format!("Project root not found: {}", root.display()))?,
        None => doc_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let content = std::fs::read_to_string(&doc_path)
        .with_context(|| format!("Cannot read {}", doc_path.display()))?;

    info!("Scanning project at {}", project_root.display());
    let mut facts = FactScanner::new(&project_root).scan()?;
    facts.doc_modified = document_mtime(&doc_path);
    info!(
        "Found {} files: {}",
        facts.total_files,
        language_summary(&facts.languages)
    );

    let config = AuditConfig::load(&project_root)?;
    let engine = AuditEngine::new().with_workers(args.workers);
    let auditor = Auditor::with_engine(config, engine);
    let report = auditor.audit(&content, &facts)?;

    let rendered = reporters::report(&report, &args.format)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Cannot write {}", path.display()))?;
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        None => print!("{}", rendered),
    }

    if report.score < args.min_score {
        eprintln!(
            "{} Score {} is below the minimum {}",
            style("✗").red(),
            style(report.score).bold(),
            args.min_score
        );
        std::process::exit(2);
    }

    Ok(())
}
