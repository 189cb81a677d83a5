//! Score aggregation
//!
//! Concatenates the per-family evaluations in registry order and computes
//! the bounded 0-100 score. Per-severity deductions come off a 70-point
//! base; the remaining 30 points are earned through the coverage and
//! specificity bonuses, so a maximal document lands exactly at 100 and a
//! degenerate one bottoms out near zero.

use crate::claims::{distinct_sections_present, Claim};
use crate::evaluators::Evaluation;
use crate::models::{AuditReport, Finding, Severity};
use crate::sections::CATALOG;
use serde::{Deserialize, Serialize};

/// Scoring weights. All externally configurable; defaults are the
/// canonical values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub error_penalty: i64,
    pub warning_penalty: i64,
    pub info_penalty: i64,
    /// Maximum points earned for full canonical-section coverage
    pub coverage_bonus: i64,
    /// Maximum points earned for passing every specificity check
    pub specificity_bonus: i64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            error_penalty: 15,
            warning_penalty: 5,
            info_penalty: 1,
            coverage_bonus: 20,
            specificity_bonus: 10,
        }
    }
}

/// Build the final report from per-family evaluations.
///
/// `evaluations` must be in registry order; findings are concatenated
/// as-is, with no cross-family deduplication.
pub fn build_report(
    evaluations: Vec<Evaluation>,
    claims: &[Claim],
    weights: &ScoreWeights,
) -> AuditReport {
    let mut findings: Vec<Finding> = Vec::new();
    let mut checks_attempted = 0usize;
    let mut checks_passed = 0usize;

    for evaluation in evaluations {
        findings.extend(evaluation.findings);
        checks_attempted += evaluation.checks_attempted;
        checks_passed += evaluation.checks_passed;
    }

    let sections_present = distinct_sections_present(claims);
    let score = calculate_score(
        &findings,
        sections_present,
        CATALOG.len(),
        checks_passed,
        checks_attempted,
        weights,
    );

    let missing_sections = CATALOG
        .iter()
        .filter(|spec| {
            !claims.iter().any(|c| {
                matches!(c, Claim::SectionPresent { section, .. } if *section == spec.name)
            })
        })
        .map(|spec| spec.name.to_string())
        .collect();

    // Lossless: one recommendation per finding that carries a suggestion.
    let recommendations = findings
        .iter()
        .filter_map(|f| f.suggestion.clone())
        .collect();

    AuditReport {
        score,
        findings,
        missing_sections,
        recommendations,
    }
}

fn calculate_score(
    findings: &[Finding],
    sections_present: usize,
    sections_total: usize,
    checks_passed: usize,
    checks_attempted: usize,
    w: &ScoreWeights,
) -> u32 {
    let mut score: i64 = 100 - w.coverage_bonus - w.specificity_bonus;

    for finding in findings {
        score -= match finding.severity {
            Severity::Error => w.error_penalty,
            Severity::Warning => w.warning_penalty,
            Severity::Info => w.info_penalty,
        };
    }

    if sections_total > 0 {
        score += w.coverage_bonus * sections_present as i64 / sections_total as i64;
    }
    // No checks attempted means no bonus: an empty document earns nothing
    // for vacuously passing.
    if checks_attempted > 0 {
        score += w.specificity_bonus * checks_passed as i64 / checks_attempted as i64;
    }

    score.clamp(0, 100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims;
    use crate::models::{RuleFamily, Severity};

    fn finding(severity: Severity) -> Finding {
        Finding::new(severity, RuleFamily::Coverage, "x")
    }

    #[test]
    fn perfect_inputs_reach_exactly_100() {
        let score = calculate_score(&[], 8, 8, 2, 2, &ScoreWeights::default());
        assert_eq!(score, 100);
    }

    #[test]
    fn no_bonuses_caps_at_70() {
        let score = calculate_score(&[], 0, 8, 0, 0, &ScoreWeights::default());
        assert_eq!(score, 70);
    }

    #[test]
    fn deductions_per_severity() {
        let findings = vec![
            finding(Severity::Error),
            finding(Severity::Warning),
            finding(Severity::Info),
        ];
        let score = calculate_score(&findings, 8, 8, 0, 0, &ScoreWeights::default());
        // 70 - 15 - 5 - 1 + 20 = 69
        assert_eq!(score, 69);
    }

    #[test]
    fn score_never_leaves_bounds() {
        let many_errors: Vec<Finding> = (0..50).map(|_| finding(Severity::Error)).collect();
        assert_eq!(
            calculate_score(&many_errors, 0, 8, 0, 0, &ScoreWeights::default()),
            0
        );
        assert_eq!(calculate_score(&[], 8, 8, 5, 5, &ScoreWeights::default()), 100);
    }

    #[test]
    fn partial_coverage_bonus_floors() {
        // 3 of 8 sections: 20 * 3 / 8 = 7 (integer division)
        let score = calculate_score(&[], 3, 8, 0, 0, &ScoreWeights::default());
        assert_eq!(score, 77);
    }

    #[test]
    fn one_extra_error_drops_at_least_error_penalty() {
        let base = calculate_score(&[], 4, 8, 0, 0, &ScoreWeights::default());
        let with_error =
            calculate_score(&[finding(Severity::Error)], 4, 8, 0, 0, &ScoreWeights::default());
        assert!(base - with_error >= 15);
    }

    #[test]
    fn report_recommendations_map_one_to_one() {
        let (_, parsed) = claims::parse("## Project Overview\nA thing.\n");
        let evaluations = vec![Evaluation::from_findings(vec![
            Finding::new(Severity::Warning, RuleFamily::AntiPattern, "a").with_suggestion("fix a"),
            Finding::new(Severity::Info, RuleFamily::Freshness, "b"),
            Finding::new(Severity::Error, RuleFamily::Coverage, "c").with_suggestion("fix c"),
        ])];
        let report = build_report(evaluations, &parsed, &ScoreWeights::default());
        assert_eq!(report.recommendations, vec!["fix a".to_string(), "fix c".to_string()]);
        assert_eq!(report.findings.len(), 3);
    }

    #[test]
    fn missing_sections_in_catalog_order() {
        let (_, parsed) = claims::parse("## Common Commands\n## Dependencies\n");
        let report = build_report(Vec::new(), &parsed, &ScoreWeights::default());
        assert_eq!(
            report.missing_sections,
            vec![
                "Project Overview",
                "Architecture",
                "Coding Standards",
                "Anti-Patterns",
                "Git Conventions",
                "Domain Context",
            ]
        );
    }
}
