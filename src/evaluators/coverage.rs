//! Section coverage rules
//!
//! One finding per canonical section with no matching heading, severity
//! taken from the section's importance tier.

use super::{AuditContext, Evaluation, Evaluator};
use crate::claims::Claim;
use crate::models::{Finding, RuleFamily};
use crate::sections::CATALOG;
use anyhow::Result;

pub struct CoverageEvaluator;

impl Evaluator for CoverageEvaluator {
    fn name(&self) -> &'static str {
        "coverage"
    }

    fn family(&self) -> RuleFamily {
        RuleFamily::Coverage
    }

    fn evaluate(&self, ctx: &AuditContext) -> Result<Evaluation> {
        let mut findings = Vec::new();

        for spec in CATALOG {
            let present = ctx.claims.iter().any(|c| {
                matches!(c, Claim::SectionPresent { section, .. } if *section == spec.name)
            });
            if present {
                continue;
            }
            findings.push(
                Finding::new(
                    spec.importance.missing_severity(),
                    RuleFamily::Coverage,
                    format!("Missing \"{}\" section", spec.name),
                )
                .with_suggestion(format!(
                    "Add a ## {} section with relevant content",
                    spec.name
                )),
            );
        }

        Ok(Evaluation::from_findings(findings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::test_support::ContextFixture;
    use crate::models::Severity;

    #[test]
    fn all_sections_present_yields_nothing() {
        let text = "## Project Overview\n## Common Commands\n## Architecture\n\
                    ## Coding Standards\n## Anti-Patterns\n## Dependencies\n\
                    ## Git Conventions\n## Domain Context\n";
        let fixture = ContextFixture::parse(text);
        let eval = CoverageEvaluator.evaluate(&fixture.ctx()).unwrap();
        assert!(eval.findings.is_empty());
    }

    #[test]
    fn missing_critical_section_is_error() {
        let fixture = ContextFixture::parse("## Coding Standards\nSome content.\n");
        let eval = CoverageEvaluator.evaluate(&fixture.ctx()).unwrap();
        let errors: Vec<_> = eval
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|f| f.message.contains("Common Commands")));
        assert!(errors.iter().any(|f| f.message.contains("Architecture")));
    }

    #[test]
    fn synonym_heading_counts_as_present() {
        let fixture = ContextFixture::parse("## project overview\nSome content.\n");
        let eval = CoverageEvaluator.evaluate(&fixture.ctx()).unwrap();
        assert!(!eval
            .findings
            .iter()
            .any(|f| f.message.contains("Project Overview")));
    }

    #[test]
    fn empty_document_misses_everything() {
        let fixture = ContextFixture::parse("# CLAUDE.md\n");
        let eval = CoverageEvaluator.evaluate(&fixture.ctx()).unwrap();
        assert_eq!(eval.findings.len(), crate::sections::CATALOG.len());
        // Tiers map to severities: 3 errors, 2 warnings, 3 infos.
        let summary = crate::models::FindingsSummary::from_findings(&eval.findings);
        assert_eq!((summary.errors, summary.warnings, summary.infos), (3, 2, 3));
    }

    #[test]
    fn every_coverage_finding_has_a_suggestion() {
        let fixture = ContextFixture::parse("plain text\n");
        let eval = CoverageEvaluator.evaluate(&fixture.ctx()).unwrap();
        assert!(eval.findings.iter().all(|f| f.suggestion.is_some()));
    }
}
