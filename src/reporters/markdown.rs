//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Suitable for pull request comments and CI job summaries.

use crate::models::{AuditReport, Severity};
use anyhow::Result;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &AuditReport) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(report));
    md.push('\n');
    md.push_str(&render_findings(report));
    if !report.missing_sections.is_empty() {
        md.push('\n');
        md.push_str(&render_missing_sections(report));
    }
    if !report.recommendations.is_empty() {
        md.push('\n');
        md.push_str(&render_recommendations(report));
    }

    Ok(md)
}

fn render_header(report: &AuditReport) -> String {
    let assessment = match report.score {
        80..=100 => "Good - the document reflects the codebase",
        40..=79 => "Fair - usable but with gaps",
        _ => "Poor - misleading or near-empty",
    };
    let summary = report.summary();

    format!(
        r#"# CLAUDE.md Audit Report

**Score: {}/100**

| Metric | Value |
|--------|-------|
| Findings | {} |
| Errors | {} |
| Warnings | {} |
| Assessment | {} |
"#,
        report.score, summary.total, summary.errors, summary.warnings, assessment
    )
}

fn severity_marker(severity: &Severity) -> &'static str {
    match severity {
        Severity::Error => "🔴",
        Severity::Warning => "🟡",
        Severity::Info => "⚪",
    }
}

fn render_findings(report: &AuditReport) -> String {
    if report.findings.is_empty() {
        return "## Findings\n\nNo findings.\n".to_string();
    }

    let mut md = String::from("## Findings\n\n| | Family | Finding | Line |\n|---|--------|---------|------|\n");
    for finding in &report.findings {
        let line = finding
            .line
            .map(|l| l.to_string())
            .unwrap_or_else(|| "-".to_string());
        md.push_str(&format!(
            "| {} | `{}` | {} | {} |\n",
            severity_marker(&finding.severity),
            finding.family,
            escape_pipes(&finding.message),
            line
        ));
    }
    md
}

fn render_missing_sections(report: &AuditReport) -> String {
    let mut md = String::from("## Missing Sections\n\n");
    for section in &report.missing_sections {
        md.push_str(&format!("- {}\n", section));
    }
    md
}

fn render_recommendations(report: &AuditReport) -> String {
    let mut md = String::from("## Recommendations\n\n");
    for rec in &report.recommendations {
        md.push_str(&format!("- {}\n", rec));
    }
    md
}

fn escape_pipes(text: &str) -> String {
    text.replace('|', "\\|")
}
