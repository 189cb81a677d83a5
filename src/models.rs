//! Core data models for claudemd-audit
//!
//! These models are used throughout the codebase for representing
//! findings, audit reports, and codebase ground truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Severity levels for findings
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// The five rule families, in aggregation order.
///
/// The declaration order here is the order findings appear in the final
/// report, independent of how the evaluators were scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleFamily {
    Coverage,
    Accuracy,
    AntiPattern,
    Specificity,
    Freshness,
}

impl RuleFamily {
    /// All families in aggregation order.
    pub const ALL: [RuleFamily; 5] = [
        RuleFamily::Coverage,
        RuleFamily::Accuracy,
        RuleFamily::AntiPattern,
        RuleFamily::Specificity,
        RuleFamily::Freshness,
    ];
}

impl std::fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleFamily::Coverage => write!(f, "coverage"),
            RuleFamily::Accuracy => write!(f, "accuracy"),
            RuleFamily::AntiPattern => write!(f, "anti_pattern"),
            RuleFamily::Specificity => write!(f, "specificity"),
            RuleFamily::Freshness => write!(f, "freshness"),
        }
    }
}

/// A single defect or observation from one rule family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub family: RuleFamily,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// 1-based line in the audited document, when the finding points at one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Finding {
    pub fn new(severity: Severity, family: RuleFamily, message: impl Into<String>) -> Self {
        Self {
            severity,
            family,
            message: message.into(),
            suggestion: None,
            line: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

/// Summary of findings by severity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindingsSummary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub total: usize,
}

impl FindingsSummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self::default();
        for f in findings {
            match f.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.infos += 1,
            }
            summary.total += 1;
        }
        summary
    }
}

/// Complete audit report for one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// Bounded quality score, always within 0..=100
    pub score: u32,
    /// Findings in fixed family order, emission order within a family
    pub findings: Vec<Finding>,
    /// Canonical sections with no matching heading, in catalog order
    pub missing_sections: Vec<String>,
    /// One recommendation per finding that carries a suggestion
    pub recommendations: Vec<String>,
}

impl AuditReport {
    pub fn summary(&self) -> FindingsSummary {
        FindingsSummary::from_findings(&self.findings)
    }
}

/// Read-only snapshot of codebase ground truth.
///
/// Produced by the fact scanner (or built by hand in tests) and only ever
/// read by the audit engine. Collections are BTree-based so iteration order
/// is stable across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactSnapshot {
    pub total_files: usize,
    /// Language name -> file count
    pub languages: BTreeMap<String, usize>,
    /// Detected frameworks, lowercase ("react", "django", ...)
    pub frameworks: BTreeSet<String>,
    /// Detected package managers and build tools ("cargo", "npm", "make", ...)
    pub toolchains: BTreeSet<String>,
    /// Commands known to work in this project ("cargo test", "npm run build", ...)
    pub commands: BTreeSet<String>,
    /// Domain vocabulary pulled from the project layout
    pub domain_terms: BTreeSet<String>,
    /// Declared dependency names, lowercase
    pub dependencies: BTreeSet<String>,
    /// Declared dependency versions, keyed by lowercase name
    pub dependency_versions: BTreeMap<String, String>,
    /// Relative file paths, forward slashes
    pub files: BTreeSet<String>,
    /// Relative directory paths, forward slashes
    pub directories: BTreeSet<String>,
    /// Number of files that look like tests
    pub test_files: usize,
    /// Modification time of the audited document, when known
    pub doc_modified: Option<DateTime<Utc>>,
    /// Most recent modification time across source files, when known
    pub source_modified: Option<DateTime<Utc>>,
}

impl FactSnapshot {
    /// True when the path exists in the inventory as a file or directory.
    ///
    /// Directory references may be written with a trailing slash in docs.
    pub fn path_exists(&self, path: &str) -> bool {
        let trimmed = path.trim_end_matches('/');
        self.files.contains(trimmed) || self.directories.contains(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_info_to_error() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn family_display_is_snake_case() {
        assert_eq!(RuleFamily::AntiPattern.to_string(), "anti_pattern");
        assert_eq!(RuleFamily::Coverage.to_string(), "coverage");
    }

    #[test]
    fn findings_summary_counts_by_severity() {
        let findings = vec![
            Finding::new(Severity::Error, RuleFamily::Coverage, "a"),
            Finding::new(Severity::Warning, RuleFamily::AntiPattern, "b"),
            Finding::new(Severity::Warning, RuleFamily::Freshness, "c"),
            Finding::new(Severity::Info, RuleFamily::Specificity, "d"),
        ];
        let summary = FindingsSummary::from_findings(&findings);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.warnings, 2);
        assert_eq!(summary.infos, 1);
        assert_eq!(summary.total, 4);
    }

    #[test]
    fn path_exists_ignores_trailing_slash() {
        let mut facts = FactSnapshot::default();
        facts.directories.insert("src/parsers".to_string());
        assert!(facts.path_exists("src/parsers/"));
        assert!(facts.path_exists("src/parsers"));
        assert!(!facts.path_exists("src/gone"));
    }
}
