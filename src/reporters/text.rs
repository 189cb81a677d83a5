//! Text (terminal) reporter with colors and formatting

use crate::models::{AuditReport, Severity};
use anyhow::Result;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

fn severity_color(severity: &Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31m",   // Red
        Severity::Warning => "\x1b[33m", // Yellow
        Severity::Info => "\x1b[90m",    // Gray
    }
}

fn severity_tag(severity: &Severity) -> &'static str {
    match severity {
        Severity::Error => "[E]",
        Severity::Warning => "[W]",
        Severity::Info => "[I]",
    }
}

fn score_color(score: u32) -> &'static str {
    if score >= 80 {
        "\x1b[32m" // Green
    } else if score >= 40 {
        "\x1b[33m" // Yellow
    } else {
        "\x1b[31m" // Red
    }
}

/// Render report as formatted terminal output
pub fn render(report: &AuditReport) -> Result<String> {
    let mut out = String::new();

    let score_c = score_color(report.score);
    out.push_str(&format!("\n{BOLD}CLAUDE.md Audit{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Score: {score_c}{BOLD}{}/100{RESET}  {}\n\n",
        report.score,
        score_bar(report.score)
    ));

    let summary = report.summary();
    out.push_str(&format!("{BOLD}FINDINGS{RESET} ({} total)\n", summary.total));
    let mut summary_parts = Vec::new();
    if summary.errors > 0 {
        summary_parts.push(format!("\x1b[31m{} errors{RESET}", summary.errors));
    }
    if summary.warnings > 0 {
        summary_parts.push(format!("\x1b[33m{} warnings{RESET}", summary.warnings));
    }
    if summary.infos > 0 {
        summary_parts.push(format!("\x1b[90m{} info{RESET}", summary.infos));
    }
    if !summary_parts.is_empty() {
        out.push_str(&format!("  {}\n", summary_parts.join(" | ")));
    }
    out.push('\n');

    for finding in &report.findings {
        let sev_c = severity_color(&finding.severity);
        let location = match finding.line {
            Some(line) => format!(" {DIM}(line {}){RESET}", line),
            None => String::new(),
        };
        out.push_str(&format!(
            "  {sev_c}{}{RESET} {DIM}{}{RESET}  {}{}\n",
            severity_tag(&finding.severity),
            finding.family,
            finding.message,
            location
        ));
    }
    if !report.findings.is_empty() {
        out.push('\n');
    }

    if !report.missing_sections.is_empty() {
        out.push_str(&format!("{BOLD}MISSING SECTIONS{RESET}\n"));
        for section in &report.missing_sections {
            out.push_str(&format!("  - {}\n", section));
        }
        out.push('\n');
    }

    if !report.recommendations.is_empty() {
        out.push_str(&format!("{BOLD}RECOMMENDATIONS{RESET}\n"));
        for rec in &report.recommendations {
            out.push_str(&format!("  - {}\n", rec));
        }
        out.push('\n');
    }

    match report.score {
        80..=100 => out.push_str(&format!("{DIM}In good shape.{RESET}\n")),
        40..=79 => out.push_str(&format!(
            "{DIM}Usable, but follow the recommendations above.{RESET}\n"
        )),
        _ => out.push_str(&format!(
            "{DIM}This document needs a rewrite before it will help anyone.{RESET}\n"
        )),
    }

    Ok(out)
}

fn score_bar(score: u32) -> String {
    let filled = (score as usize) / 5;
    let color = score_color(score);
    format!(
        "{color}{}{RESET}{DIM}{}{RESET}",
        "█".repeat(filled),
        "░".repeat(20 - filled)
    )
}
