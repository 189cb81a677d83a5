//! Evaluator execution engine
//!
//! Runs the registered evaluators over a shared read-only context, in
//! parallel when there is more than one worker. Two guarantees hold no
//! matter how execution is scheduled:
//!
//! - Output order is registry declaration order, never completion order.
//! - A panic or error inside one evaluator becomes a single error-severity
//!   finding tagged with its family; the other evaluators are unaffected.

use super::{AuditContext, Evaluation, Evaluator};
use crate::models::{Finding, Severity};
use anyhow::Result;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, warn};

pub struct AuditEngine {
    evaluators: Vec<Box<dyn Evaluator>>,
    workers: usize,
}

impl AuditEngine {
    /// Engine with the default rule families registered.
    pub fn new() -> Self {
        Self::with_evaluators(super::default_evaluators())
    }

    /// Engine with an explicit registry. Order of the vec is the
    /// aggregation order.
    pub fn with_evaluators(evaluators: Vec<Box<dyn Evaluator>>) -> Self {
        let workers = std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4)
            .min(evaluators.len().max(1));
        Self {
            evaluators,
            workers,
        }
    }

    /// Override the worker count. `1` forces serial execution.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Append a rule family to the registry. New families are always added
    /// at the end so existing report ordering never shifts.
    pub fn register(&mut self, evaluator: Box<dyn Evaluator>) {
        self.evaluators.push(evaluator);
    }

    pub fn evaluator_count(&self) -> usize {
        self.evaluators.len()
    }

    /// Run every evaluator and return one `Evaluation` per registry slot,
    /// in registry order. This joins all evaluators before returning;
    /// nothing is streamed.
    pub fn run(&self, ctx: &AuditContext) -> Result<Vec<Evaluation>> {
        let start = Instant::now();

        let evaluations: Vec<Evaluation> = if self.workers <= 1 || self.evaluators.len() <= 1 {
            self.evaluators
                .iter()
                .map(|e| run_single(e.as_ref(), ctx))
                .collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .build()?;
            // Indexed par_iter + collect preserves registry order.
            pool.install(|| {
                self.evaluators
                    .par_iter()
                    .map(|e| run_single(e.as_ref(), ctx))
                    .collect()
            })
        };

        debug!(
            "Ran {} evaluators in {:?}",
            self.evaluators.len(),
            start.elapsed()
        );
        Ok(evaluations)
    }
}

impl Default for AuditEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one evaluator, converting any error or panic into a failure finding.
fn run_single(evaluator: &dyn Evaluator, ctx: &AuditContext) -> Evaluation {
    let name = evaluator.name();
    let start = Instant::now();

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        evaluator.evaluate(ctx)
    }));

    match outcome {
        Ok(Ok(evaluation)) => {
            debug!(
                "Evaluator {} produced {} findings in {:?}",
                name,
                evaluation.findings.len(),
                start.elapsed()
            );
            evaluation
        }
        Ok(Err(err)) => {
            warn!("Evaluator {} failed: {}", name, err);
            failure_evaluation(evaluator, err.to_string())
        }
        Err(panic_info) => {
            let msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            warn!("Evaluator {} panicked: {}", name, msg);
            failure_evaluation(evaluator, msg)
        }
    }
}

fn failure_evaluation(evaluator: &dyn Evaluator, message: String) -> Evaluation {
    Evaluation::from_findings(vec![Finding::new(
        Severity::Error,
        evaluator.family(),
        format!("{} evaluator failed: {}", evaluator.name(), message),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::test_support::ContextFixture;
    use crate::models::RuleFamily;
    use anyhow::anyhow;

    struct FixedEvaluator {
        name: &'static str,
        family: RuleFamily,
        messages: Vec<&'static str>,
    }

    impl Evaluator for FixedEvaluator {
        fn name(&self) -> &'static str {
            self.name
        }
        fn family(&self) -> RuleFamily {
            self.family
        }
        fn evaluate(&self, _ctx: &AuditContext) -> Result<Evaluation> {
            Ok(Evaluation::from_findings(
                self.messages
                    .iter()
                    .map(|m| Finding::new(Severity::Info, self.family, *m))
                    .collect(),
            ))
        }
    }

    struct PanickingEvaluator;
    impl Evaluator for PanickingEvaluator {
        fn name(&self) -> &'static str {
            "boom"
        }
        fn family(&self) -> RuleFamily {
            RuleFamily::Accuracy
        }
        fn evaluate(&self, _ctx: &AuditContext) -> Result<Evaluation> {
            panic!("index out of range");
        }
    }

    struct ErroringEvaluator;
    impl Evaluator for ErroringEvaluator {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn family(&self) -> RuleFamily {
            RuleFamily::Freshness
        }
        fn evaluate(&self, _ctx: &AuditContext) -> Result<Evaluation> {
            Err(anyhow!("backing store unavailable"))
        }
    }

    #[test]
    fn output_order_is_registry_order() {
        let engine = AuditEngine::with_evaluators(vec![
            Box::new(FixedEvaluator {
                name: "first",
                family: RuleFamily::Coverage,
                messages: vec!["a", "b"],
            }),
            Box::new(FixedEvaluator {
                name: "second",
                family: RuleFamily::Accuracy,
                messages: vec!["c"],
            }),
            Box::new(FixedEvaluator {
                name: "third",
                family: RuleFamily::Freshness,
                messages: vec!["d"],
            }),
        ]);
        let fixture = ContextFixture::parse("x\n");
        for _ in 0..20 {
            let evaluations = engine.run(&fixture.ctx()).unwrap();
            let messages: Vec<&str> = evaluations
                .iter()
                .flat_map(|e| e.findings.iter().map(|f| f.message.as_str()))
                .collect();
            assert_eq!(messages, vec!["a", "b", "c", "d"]);
        }
    }

    #[test]
    fn panicking_evaluator_becomes_failure_finding() {
        let engine = AuditEngine::with_evaluators(vec![
            Box::new(FixedEvaluator {
                name: "ok",
                family: RuleFamily::Coverage,
                messages: vec!["fine"],
            }),
            Box::new(PanickingEvaluator),
        ]);
        let fixture = ContextFixture::parse("x\n");
        let evaluations = engine.run(&fixture.ctx()).unwrap();
        assert_eq!(evaluations.len(), 2);
        assert_eq!(evaluations[0].findings[0].message, "fine");
        let failure = &evaluations[1].findings[0];
        assert_eq!(failure.severity, Severity::Error);
        assert_eq!(failure.family, RuleFamily::Accuracy);
        assert!(failure.message.contains("boom evaluator failed"));
    }

    #[test]
    fn erroring_evaluator_is_isolated() {
        let engine = AuditEngine::with_evaluators(vec![
            Box::new(ErroringEvaluator),
            Box::new(FixedEvaluator {
                name: "ok",
                family: RuleFamily::Coverage,
                messages: vec!["still here"],
            }),
        ]);
        let fixture = ContextFixture::parse("x\n");
        let evaluations = engine.run(&fixture.ctx()).unwrap();
        assert!(evaluations[0].findings[0]
            .message
            .contains("backing store unavailable"));
        assert_eq!(evaluations[1].findings[0].message, "still here");
    }

    #[test]
    fn serial_and_parallel_agree() {
        let fixture = ContextFixture::parse("## Overview\nsome text\n");
        let serial = AuditEngine::new().with_workers(1);
        let parallel = AuditEngine::new().with_workers(4);
        let a = serial.run(&fixture.ctx()).unwrap();
        let b = parallel.run(&fixture.ctx()).unwrap();
        let flatten = |evals: &[Evaluation]| {
            evals
                .iter()
                .flat_map(|e| e.findings.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(flatten(&a), flatten(&b));
    }
}
