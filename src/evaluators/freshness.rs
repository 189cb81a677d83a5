//! Freshness rules
//!
//! Detects drift between the document and the codebase it describes:
//! references to paths that no longer exist, dependency mentions no longer
//! declared, and a document that has not kept up with source changes.

use super::{AuditContext, Evaluation, Evaluator};
use crate::claims::Claim;
use crate::models::{Finding, RuleFamily, Severity};
use anyhow::Result;
use chrono::Duration;
use std::collections::BTreeSet;

pub struct FreshnessEvaluator;

impl Evaluator for FreshnessEvaluator {
    fn name(&self) -> &'static str {
        "freshness"
    }

    fn family(&self) -> RuleFamily {
        RuleFamily::Freshness
    }

    fn evaluate(&self, ctx: &AuditContext) -> Result<Evaluation> {
        let mut findings = Vec::new();
        let facts = ctx.facts;

        // Stale path references. Only meaningful when an inventory exists.
        if !facts.files.is_empty() || !facts.directories.is_empty() {
            let mut reported: BTreeSet<&str> = BTreeSet::new();
            for claim in ctx.claims {
                if let Claim::PathRef { path, line } = claim {
                    if facts.path_exists(path) || reported.contains(path.as_str()) {
                        continue;
                    }
                    reported.insert(path);
                    findings.push(
                        Finding::new(
                            Severity::Warning,
                            RuleFamily::Freshness,
                            format!("References path `{}` which doesn't exist in the project", path),
                        )
                        .with_suggestion("Update or remove stale file references")
                        .at_line(*line),
                    );
                }
            }
        }

        // Framework mentions absent from declared dependencies. This is a
        // different fact source than accuracy's detected-framework set, so
        // both families may flag the same mention; that is intentional.
        if !facts.dependencies.is_empty() {
            let mut reported: BTreeSet<&str> = BTreeSet::new();
            for claim in ctx.claims {
                if let Claim::Framework { name, line } = claim {
                    if facts.dependencies.contains(name.as_str())
                        || reported.contains(name.as_str())
                    {
                        continue;
                    }
                    reported.insert(name);
                    findings.push(
                        Finding::new(
                            Severity::Warning,
                            RuleFamily::Freshness,
                            format!("Mentions {} but it is not among the declared dependencies", name),
                        )
                        .with_suggestion("Remove the mention or re-add the dependency")
                        .at_line(*line),
                    );
                }
            }
        }

        // Document meaningfully older than the codebase.
        if let (Some(doc), Some(source)) = (facts.doc_modified, facts.source_modified) {
            let lag = source - doc;
            if lag > Duration::days(ctx.config.stale_days) {
                findings.push(
                    Finding::new(
                        Severity::Info,
                        RuleFamily::Freshness,
                        format!(
                            "Document is {} days older than the most recent source change",
                            lag.num_days()
                        ),
                    )
                    .with_suggestion("Re-read the document against the current codebase"),
                );
            }
        }

        Ok(Evaluation::from_findings(findings))
    }
}
