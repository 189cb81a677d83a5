//! Accuracy rules
//!
//! Cross-references textual assertions against codebase ground truth:
//! project-phase claims vs file count, framework mentions vs detected
//! frameworks, command tools vs detected toolchains, test-framework
//! mentions vs detected test files, version claims vs declared versions.

use super::{AuditContext, Evaluation, Evaluator};
use crate::claims::Claim;
use crate::models::{Finding, RuleFamily, Severity};
use anyhow::Result;
use std::collections::BTreeSet;

pub struct AccuracyEvaluator;

impl Evaluator for AccuracyEvaluator {
    fn name(&self) -> &'static str {
        "accuracy"
    }

    fn family(&self) -> RuleFamily {
        RuleFamily::Accuracy
    }

    fn evaluate(&self, ctx: &AuditContext) -> Result<Evaluation> {
        let mut findings = Vec::new();
        let facts = ctx.facts;

        // Phase claims contradicted by project size.
        if let Some((phrase, line)) = first_phase_claim(ctx.claims) {
            if facts.total_files > ctx.config.greenfield_file_threshold {
                findings.push(
                    Finding::new(
                        Severity::Error,
                        RuleFamily::Accuracy,
                        format!(
                            "Says \"{}\" but the project has {} source files",
                            phrase, facts.total_files
                        ),
                    )
                    .with_suggestion("Update the project phase description")
                    .at_line(line),
                );
            }
        }

        // Framework claims not backed by detection. One finding per distinct
        // framework, at its first mention.
        let mut reported: BTreeSet<&str> = BTreeSet::new();
        for claim in ctx.claims {
            if let Claim::Framework { name, line } = claim {
                if facts.frameworks.contains(name.as_str()) || reported.contains(name.as_str()) {
                    continue;
                }
                reported.insert(name);
                findings.push(
                    Finding::new(
                        Severity::Error,
                        RuleFamily::Accuracy,
                        format!("Mentions \"{}\" but it was not detected in the project", name),
                    )
                    .with_suggestion(format!(
                        "Remove the {} reference or add it to the dependencies",
                        name
                    ))
                    .at_line(*line),
                );
            }
        }

        // Command claims whose tool is absent from the detected toolchains.
        // Only meaningful once at least one toolchain was detected.
        if !facts.toolchains.is_empty() {
            let mut reported_tools: BTreeSet<&str> = BTreeSet::new();
            for claim in ctx.claims {
                if let Claim::Command { text, tool, line } = claim {
                    if is_generic_tool(tool)
                        || facts.toolchains.contains(tool.as_str())
                        || reported_tools.contains(tool.as_str())
                    {
                        continue;
                    }
                    reported_tools.insert(tool);
                    findings.push(
                        Finding::new(
                            Severity::Warning,
                            RuleFamily::Accuracy,
                            format!(
                                "Command \"{}\" uses {} which was not detected in this project",
                                text, tool
                            ),
                        )
                        .with_suggestion("Verify the command still works, or remove it")
                        .at_line(*line),
                    );
                }
            }
        }

        // npm scripts and make targets are fully enumerated from the
        // manifests, so a documented entry missing there is simply wrong.
        // Checked only when the namespace was actually enumerated.
        let mut reported_cmds: BTreeSet<String> = BTreeSet::new();
        for claim in ctx.claims {
            if let Claim::Command { text, tool, line } = claim {
                let Some((key, namespace)) = enumerable_command(text, tool) else {
                    continue;
                };
                let namespace_known = facts.commands.iter().any(|c| c.starts_with(namespace));
                if namespace_known
                    && !facts.commands.contains(&key)
                    && reported_cmds.insert(key)
                {
                    let kind = if namespace == "make " {
                        "make target"
                    } else {
                        "npm script"
                    };
                    findings.push(
                        Finding::new(
                            Severity::Warning,
                            RuleFamily::Accuracy,
                            format!("Documents \"{}\" but the project defines no such {}", text, kind),
                        )
                        .with_suggestion("Sync documented commands with the manifest")
                        .at_line(*line),
                    );
                }
            }
        }

        // Test framework named but no test files found.
        if facts.test_files == 0 {
            if let Some((name, line)) = first_test_framework_claim(ctx.claims) {
                findings.push(
                    Finding::new(
                        Severity::Warning,
                        RuleFamily::Accuracy,
                        format!("Mentions {} but no test files were found", name),
                    )
                    .with_suggestion("Add tests or drop the test-framework guidance")
                    .at_line(line),
                );
            }
        }

        // Version claims that disagree with declared versions.
        for claim in ctx.claims {
            if let Claim::Version {
                name,
                version,
                line,
            } = claim
            {
                if let Some(declared) = facts.dependency_versions.get(name.as_str()) {
                    if !versions_agree(version, declared) {
                        findings.push(
                            Finding::new(
                                Severity::Info,
                                RuleFamily::Accuracy,
                                format!(
                                    "States {} {} but the manifest declares {}",
                                    name, version, declared
                                ),
                            )
                            .with_suggestion("Sync the stated version with the manifest")
                            .at_line(*line),
                        );
                    }
                }
            }
        }

        Ok(Evaluation::from_findings(findings))
    }
}

fn first_phase_claim(claims: &[Claim]) -> Option<(&str, u32)> {
    claims.iter().find_map(|c| match c {
        Claim::ProjectPhase { phrase, line } => Some((phrase.as_str(), *line)),
        _ => None,
    })
}

fn first_test_framework_claim(claims: &[Claim]) -> Option<(&str, u32)> {
    claims.iter().find_map(|c| match c {
        Claim::TestFramework { name, line } => Some((name.as_str(), *line)),
        _ => None,
    })
}

/// Canonical lookup key for commands living in an enumerable namespace.
///
/// "yarn run build" and "pnpm run build" normalize to "npm run build",
/// matching how the fact scanner records package scripts.
fn enumerable_command(text: &str, tool: &str) -> Option<(String, &'static str)> {
    let mut parts = text.split_whitespace();
    let _ = parts.next();
    match tool {
        "npm" | "pnpm" | "yarn" | "bun" => {
            if parts.next() != Some("run") {
                return None;
            }
            let script = parts.next()?;
            Some((format!("npm run {}", script), "npm run "))
        }
        "make" => {
            let target = parts.next()?;
            Some((format!("make {}", target), "make "))
        }
        _ => None,
    }
}

/// Tools assumed present everywhere; flagging them is pure noise.
fn is_generic_tool(tool: &str) -> bool {
    matches!(tool, "git" | "bash" | "sh" | "cd" | "ls" | "echo" | "curl" | "docker")
}

/// "4.2" agrees with "4.2.1"; "4.2" disagrees with "5.0".
/// Declared versions may carry range prefixes ("^4.2.0", ">=4.2").
fn versions_agree(stated: &str, declared: &str) -> bool {
    let declared = declared.trim_start_matches(['^', '~', '=', '>', '<', ' ']);
    declared.starts_with(stated) || stated.starts_with(declared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::test_support::ContextFixture;
    use crate::models::FactSnapshot;

    fn facts_with_files(n: usize) -> FactSnapshot {
        FactSnapshot {
            total_files: n,
            test_files: 1,
            ..Default::default()
        }
    }

    #[test]
    fn greenfield_on_large_project_is_error() {
        let fixture = ContextFixture::parse("## Project Overview\nThis is a greenfield project.\n")
            .with_facts(facts_with_files(60));
        let eval = AccuracyEvaluator.evaluate(&fixture.ctx()).unwrap();
        assert!(eval
            .findings
            .iter()
            .any(|f| f.severity == Severity::Error && f.message.contains("greenfield")));
    }

    #[test]
    fn greenfield_on_small_project_is_fine() {
        let fixture = ContextFixture::parse("This is a greenfield project.\n")
            .with_facts(facts_with_files(5));
        let eval = AccuracyEvaluator.evaluate(&fixture.ctx()).unwrap();
        assert!(eval.findings.is_empty());
    }

    #[test]
    fn undetected_framework_is_exactly_one_error() {
        let fixture = ContextFixture::parse(
            "Uses Django for the API.\nDjango models live in `app/`.\nMore Django here.\n",
        )
        .with_facts(facts_with_files(10));
        let eval = AccuracyEvaluator.evaluate(&fixture.ctx()).unwrap();
        let django: Vec<_> = eval
            .findings
            .iter()
            .filter(|f| f.message.contains("django") && f.severity == Severity::Error)
            .collect();
        assert_eq!(django.len(), 1);
        assert_eq!(django[0].line, Some(1));
    }

    #[test]
    fn detected_framework_is_not_flagged() {
        let mut facts = facts_with_files(10);
        facts.frameworks.insert("react".to_string());
        let fixture = ContextFixture::parse("Frontend is React.\n").with_facts(facts);
        let eval = AccuracyEvaluator.evaluate(&fixture.ctx()).unwrap();
        assert!(eval.findings.is_empty());
    }

    #[test]
    fn unknown_command_tool_is_warning() {
        let mut facts = facts_with_files(10);
        facts.toolchains.insert("cargo".to_string());
        let fixture =
            ContextFixture::parse("## Commands\n```bash\nnpm run build\ncargo test\n```\n")
                .with_facts(facts);
        let eval = AccuracyEvaluator.evaluate(&fixture.ctx()).unwrap();
        let warnings: Vec<_> = eval
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("npm"));
    }

    #[test]
    fn no_toolchain_facts_means_no_command_findings() {
        let fixture = ContextFixture::parse("```bash\nweirdtool build\n```\n")
            .with_facts(facts_with_files(10));
        let eval = AccuracyEvaluator.evaluate(&fixture.ctx()).unwrap();
        assert!(eval.findings.is_empty());
    }

    #[test]
    fn unknown_npm_script_is_warning() {
        let mut facts = facts_with_files(10);
        facts.toolchains.insert("npm".to_string());
        facts.commands.insert("npm run build".to_string());
        facts.commands.insert("npm run test".to_string());
        let fixture = ContextFixture::parse("```bash\nnpm run build\nnpm run deploy\n```\n")
            .with_facts(facts);
        let eval = AccuracyEvaluator.evaluate(&fixture.ctx()).unwrap();
        assert_eq!(eval.findings.len(), 1);
        assert!(eval.findings[0].message.contains("npm run deploy"));
        assert!(eval.findings[0].message.contains("npm script"));
    }

    #[test]
    fn script_checks_need_an_enumerated_namespace() {
        let mut facts = facts_with_files(10);
        facts.toolchains.insert("npm".to_string());
        // No npm scripts recorded, so nothing to contradict.
        let fixture =
            ContextFixture::parse("```bash\nnpm run anything\n```\n").with_facts(facts);
        let eval = AccuracyEvaluator.evaluate(&fixture.ctx()).unwrap();
        assert!(eval.findings.is_empty());
    }

    #[test]
    fn test_framework_without_tests_is_warning() {
        let mut facts = facts_with_files(10);
        facts.test_files = 0;
        let fixture = ContextFixture::parse("Run pytest before committing.\n").with_facts(facts);
        let eval = AccuracyEvaluator.evaluate(&fixture.ctx()).unwrap();
        assert!(eval
            .findings
            .iter()
            .any(|f| f.severity == Severity::Warning && f.message.contains("pytest")));
    }

    #[test]
    fn version_mismatch_is_info() {
        let mut facts = facts_with_files(10);
        facts
            .dependency_versions
            .insert("react".to_string(), "18.3.0".to_string());
        facts.frameworks.insert("react".to_string());
        let fixture = ContextFixture::parse("Uses React 17.0 for rendering.\n").with_facts(facts);
        let eval = AccuracyEvaluator.evaluate(&fixture.ctx()).unwrap();
        assert!(eval
            .findings
            .iter()
            .any(|f| f.severity == Severity::Info && f.message.contains("18.3.0")));
    }

    #[test]
    fn matching_version_prefix_is_fine() {
        assert!(versions_agree("4.2", "^4.2.11"));
        assert!(versions_agree("18.3.0", "18.3"));
        assert!(!versions_agree("17.0", "18.3.0"));
    }
}
