//! Top-level audit entry point
//!
//! Single-pass, stateless pipeline: parse claims, run the rule families,
//! aggregate into one `AuditReport`. All intermediate values live for one
//! call and are dropped when the report is returned.

use crate::claims;
use crate::config::AuditConfig;
use crate::evaluators::engine::AuditEngine;
use crate::evaluators::AuditContext;
use crate::models::{AuditReport, FactSnapshot};
use crate::scoring;
use thiserror::Error;
use tracing::info;

/// Invalid-input failures. Distinct from a low score: an unusable input is
/// not the same fact as a bad document, and callers must be able to tell
/// them apart.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("document is empty — nothing to audit")]
    EmptyDocument,
    #[error("evaluator pool could not be started: {0}")]
    Engine(String),
}

/// Reusable auditor holding configuration and the evaluator registry.
pub struct Auditor {
    config: AuditConfig,
    engine: AuditEngine,
}

impl Auditor {
    pub fn new(config: AuditConfig) -> Self {
        Self {
            config,
            engine: AuditEngine::new(),
        }
    }

    /// Auditor with a custom engine, for embedding extra rule families.
    pub fn with_engine(config: AuditConfig, engine: AuditEngine) -> Self {
        Self { config, engine }
    }

    /// Audit one document against a fact snapshot.
    ///
    /// Always returns a complete report for any non-blank input; failures
    /// inside individual rule families surface as findings, not errors.
    pub fn audit(&self, content: &str, facts: &FactSnapshot) -> Result<AuditReport, AuditError> {
        if content.trim().is_empty() {
            return Err(AuditError::EmptyDocument);
        }

        let (document, parsed_claims) = claims::parse(content);
        let ctx = AuditContext {
            document: &document,
            claims: &parsed_claims,
            facts,
            config: &self.config,
        };

        let evaluations = self
            .engine
            .run(&ctx)
            .map_err(|e| AuditError::Engine(e.to_string()))?;
        let report = scoring::build_report(evaluations, &parsed_claims, &self.config.weights);

        info!(
            "Audit complete: score {} with {} findings",
            report.score,
            report.findings.len()
        );
        Ok(report)
    }
}

/// One-shot audit with default configuration.
pub fn audit(content: &str, facts: &FactSnapshot) -> Result<AuditReport, AuditError> {
    Auditor::new(AuditConfig::default()).audit(content, facts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_invalid_input() {
        let facts = FactSnapshot::default();
        assert!(matches!(audit("", &facts), Err(AuditError::EmptyDocument)));
        assert!(matches!(audit("   \n\t\n", &facts), Err(AuditError::EmptyDocument)));
    }

    #[test]
    fn non_empty_document_always_gets_a_report() {
        let facts = FactSnapshot::default();
        let report = audit("hello\n", &facts).unwrap();
        assert!(report.score <= 100);
    }
}
