//! Specificity rules
//!
//! Generic boilerplate is only acceptable when it is immediately backed by
//! something concrete. This family also reports checks attempted/passed so
//! the scorer can grant the specificity bonus.

use super::{AuditContext, Evaluation, Evaluator};
use crate::claims::Claim;
use crate::models::{Finding, RuleFamily, Severity};
use anyhow::Result;

/// Boilerplate phrases that demand a concrete elaboration
const VAGUE_PHRASES: &[&str] = &[
    "follow best practices",
    "use standard conventions",
    "write clean code",
    "keep it simple",
    "be consistent",
    "use appropriate",
    "handle errors properly",
];

pub struct SpecificityEvaluator;

impl Evaluator for SpecificityEvaluator {
    fn name(&self) -> &'static str {
        "specificity"
    }

    fn family(&self) -> RuleFamily {
        RuleFamily::Specificity
    }

    fn evaluate(&self, ctx: &AuditContext) -> Result<Evaluation> {
        let mut eval = Evaluation::default();
        let doc = ctx.document;
        let lines: Vec<&str> = doc.text.lines().collect();

        // Vague phrases: each occurrence is one check; it passes when a
        // concrete elaboration follows within the configured window.
        for (idx, line) in lines.iter().enumerate() {
            let lower = line.to_lowercase();
            for phrase in VAGUE_PHRASES {
                if !lower.contains(phrase) {
                    continue;
                }
                eval.checks_attempted += 1;
                let window_end = (idx + 1 + ctx.config.elaboration_window).min(lines.len());
                let elaborated = lines[idx + 1..window_end].iter().any(|l| is_concrete(l));
                if elaborated {
                    eval.checks_passed += 1;
                } else {
                    eval.findings.push(
                        Finding::new(
                            Severity::Warning,
                            RuleFamily::Specificity,
                            format!("Contains vague phrase: \"{}\"", phrase),
                        )
                        .with_suggestion("Replace with specific, actionable instructions")
                        .at_line((idx + 1) as u32),
                    );
                }
            }
        }

        // Anti-patterns section must show code, not just describe it.
        if let Some((index, line)) = section_heading(ctx, doc, "Anti-Patterns") {
            eval.checks_attempted += 1;
            let body = doc.section_body(index).unwrap_or_default();
            if body.contains('`') {
                eval.checks_passed += 1;
            } else {
                eval.findings.push(
                    Finding::new(
                        Severity::Info,
                        RuleFamily::Specificity,
                        "Anti-patterns section lacks code examples",
                    )
                    .with_suggestion("Add inline code or code blocks showing what NOT to do")
                    .at_line(line),
                );
            }
        }

        // Commands section must contain at least one literal command.
        if let Some((index, line)) = section_heading(ctx, doc, "Common Commands") {
            eval.checks_attempted += 1;
            let (start, end) = doc.section_span(index).unwrap_or((0, 0));
            let has_command = ctx.claims.iter().any(|c| {
                matches!(c, Claim::Command { line, .. } if *line > start && *line <= end)
            });
            if has_command {
                eval.checks_passed += 1;
            } else {
                eval.findings.push(
                    Finding::new(
                        Severity::Info,
                        RuleFamily::Specificity,
                        "Commands section contains prose but no literal command",
                    )
                    .with_suggestion("Add code blocks with runnable commands")
                    .at_line(line),
                );
            }
        }

        Ok(eval)
    }
}

/// Index and line of the first heading matching a canonical section name
fn section_heading(
    ctx: &AuditContext,
    doc: &crate::document::Document,
    section: &str,
) -> Option<(usize, u32)> {
    let claim_line = ctx.claims.iter().find_map(|c| match c {
        Claim::SectionPresent { section: s, line } if *s == section => Some(*line),
        _ => None,
    })?;
    let index = doc.headings.iter().position(|h| h.line == claim_line)?;
    Some((index, claim_line))
}

/// A line concrete enough to justify preceding boilerplate: code, a list
/// entry, or something with digits in it.
fn is_concrete(line: &str) -> bool {
    let t = line.trim();
    t.starts_with("```")
        || t.starts_with("- ")
        || t.starts_with("* ")
        || t.contains('`')
        || t.chars().any(|c| c.is_ascii_digit())
}
