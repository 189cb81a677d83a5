//! Rule evaluators
//!
//! Each rule family is a pure function over (document, claims, facts):
//! no shared mutable state, no ordering requirements between families.
//! New families are added by appending to `default_evaluators`, which
//! fixes the aggregation order.

mod accuracy;
mod anti_pattern;
mod coverage;
pub mod engine;
mod freshness;
mod specificity;

pub use accuracy::AccuracyEvaluator;
pub use anti_pattern::AntiPatternEvaluator;
pub use coverage::CoverageEvaluator;
pub use freshness::FreshnessEvaluator;
pub use specificity::SpecificityEvaluator;

use crate::claims::Claim;
use crate::config::AuditConfig;
use crate::document::Document;
use crate::models::{FactSnapshot, Finding, RuleFamily};
use anyhow::Result;

/// Read-only inputs shared by all evaluators
pub struct AuditContext<'a> {
    pub document: &'a Document,
    pub claims: &'a [Claim],
    pub facts: &'a FactSnapshot,
    pub config: &'a AuditConfig,
}

/// Output of one evaluator run
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub findings: Vec<Finding>,
    /// Specificity checks performed; other families leave these at zero
    pub checks_attempted: usize,
    pub checks_passed: usize,
}

impl Evaluation {
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        Self {
            findings,
            ..Default::default()
        }
    }
}

/// Contract every rule family implements
pub trait Evaluator: Send + Sync {
    /// Short identifier used in logs and failure findings
    fn name(&self) -> &'static str;

    /// Rule family this evaluator belongs to
    fn family(&self) -> RuleFamily;

    /// Run the rules. Must be pure: same inputs, same output, every time.
    fn evaluate(&self, ctx: &AuditContext) -> Result<Evaluation>;
}

/// The fixed registry, in aggregation order.
pub fn default_evaluators() -> Vec<Box<dyn Evaluator>> {
    vec![
        Box::new(CoverageEvaluator),
        Box::new(AccuracyEvaluator),
        Box::new(AntiPatternEvaluator),
        Box::new(SpecificityEvaluator),
        Box::new(FreshnessEvaluator),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::claims;
    use crate::config::AuditConfig;
    use crate::document::Document;
    use crate::models::FactSnapshot;

    /// Owned bundle so tests can borrow an `AuditContext` from parsed text.
    pub struct ContextFixture {
        pub document: Document,
        pub claims: Vec<Claim>,
        pub facts: FactSnapshot,
        pub config: AuditConfig,
    }

    impl ContextFixture {
        pub fn parse(text: &str) -> Self {
            let (document, parsed) = claims::parse(text);
            Self {
                document,
                claims: parsed,
                facts: FactSnapshot::default(),
                config: AuditConfig::default(),
            }
        }

        pub fn with_facts(mut self, facts: FactSnapshot) -> Self {
            self.facts = facts;
            self
        }

        pub fn ctx(&self) -> AuditContext<'_> {
            AuditContext {
                document: &self.document,
                claims: &self.claims,
                facts: &self.facts,
                config: &self.config,
            }
        }
    }
}
