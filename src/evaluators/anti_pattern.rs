//! Anti-pattern rules
//!
//! Flags structural smells of the document itself: degenerate length,
//! leftover planning tokens, conversational residue, broken markdown.

use super::{AuditContext, Evaluation, Evaluator};
use crate::models::{Finding, RuleFamily, Severity};
use anyhow::Result;
use regex::Regex;
use std::sync::OnceLock;

pub struct AntiPatternEvaluator;

fn planning_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(TODO|FIXME|HACK)\b").expect("valid regex"))
}

fn first_person_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(I want|I need|We use|We have|Our team|Our codebase)\b")
            .expect("valid regex")
    })
}

/// Copy-paste residue from AI chat sessions
const CONVERSATION_MARKERS: &[&str] = &[
    "can you",
    "please help",
    "i want you to",
    "let me know",
    "here's what",
    "i'll help",
];

/// `[text](` with no closing paren on the same line, or an empty target
fn malformed_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[[^\]]*\]\(\s*\)|\[[^\]]*\]\([^)\n]*$").expect("valid regex"))
}

impl Evaluator for AntiPatternEvaluator {
    fn name(&self) -> &'static str {
        "anti-pattern"
    }

    fn family(&self) -> RuleFamily {
        RuleFamily::AntiPattern
    }

    fn evaluate(&self, ctx: &AuditContext) -> Result<Evaluation> {
        let mut findings = Vec::new();
        let doc = ctx.document;
        let cfg = ctx.config;
        let line_count = doc.line_count;

        if line_count > cfg.max_lines {
            findings.push(
                Finding::new(
                    Severity::Warning,
                    RuleFamily::AntiPattern,
                    format!(
                        "Document is {} lines — too long, agents lose context",
                        line_count
                    ),
                )
                .with_suggestion(format!(
                    "Trim to under {} lines, focus on essentials",
                    cfg.max_lines
                )),
            );
        }

        if line_count < cfg.min_lines {
            findings.push(
                Finding::new(
                    Severity::Warning,
                    RuleFamily::AntiPattern,
                    format!(
                        "Document is only {} lines — too short for useful context",
                        line_count
                    ),
                )
                .with_suggestion("Add more sections: overview, commands, coding standards"),
            );
        }

        // Planning tokens: one finding at the first offending line.
        if let Some(line) = first_match_line(doc, |l| planning_token_re().is_match(l)) {
            findings.push(
                Finding::new(
                    Severity::Warning,
                    RuleFamily::AntiPattern,
                    "Contains TODO/FIXME/HACK items (stale planning artifacts)",
                )
                .with_suggestion("Resolve or remove planning tokens from the document")
                .at_line(line),
            );
        }

        if let Some(line) = first_match_line(doc, |l| {
            let lower = l.to_lowercase();
            CONVERSATION_MARKERS.iter().any(|m| lower.contains(m))
        }) {
            findings.push(
                Finding::new(
                    Severity::Warning,
                    RuleFamily::AntiPattern,
                    "Contains conversation fragments (copy-paste from an AI chat)",
                )
                .with_suggestion("Use declarative style, not conversational prompts")
                .at_line(line),
            );
        }

        if let Some(line) = first_match_line(doc, |l| first_person_re().is_match(l)) {
            findings.push(
                Finding::new(
                    Severity::Info,
                    RuleFamily::AntiPattern,
                    "Uses first-person language instead of declarative style",
                )
                .with_suggestion("Write \"Use pytest\" instead of \"We use pytest\"")
                .at_line(line),
            );
        }

        let fence_markers = doc
            .text
            .lines()
            .filter(|l| {
                let t = l.trim_start();
                t.starts_with("```") || t.starts_with("~~~")
            })
            .count();
        if fence_markers % 2 != 0 {
            findings.push(
                Finding::new(
                    Severity::Warning,
                    RuleFamily::AntiPattern,
                    "Contains an unclosed code block (odd number of fence markers)",
                )
                .with_suggestion("Close every code block with a matching ```"),
            );
        }

        if let Some(line) = first_match_line(doc, |l| malformed_link_re().is_match(l)) {
            findings.push(
                Finding::new(
                    Severity::Warning,
                    RuleFamily::AntiPattern,
                    "Contains malformed markdown link syntax",
                )
                .with_suggestion("Fix the link target or remove the link")
                .at_line(line),
            );
        }

        Ok(Evaluation::from_findings(findings))
    }
}

fn first_match_line(doc: &crate::document::Document, pred: impl Fn(&str) -> bool) -> Option<u32> {
    doc.text
        .lines()
        .position(|l| pred(l))
        .map(|idx| (idx + 1) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::test_support::ContextFixture;

    fn run(text: &str) -> Vec<Finding> {
        let fixture = ContextFixture::parse(text);
        AntiPatternEvaluator
            .evaluate(&fixture.ctx())
            .unwrap()
            .findings
    }

    #[test]
    fn six_hundred_lines_is_too_long() {
        let findings = run(&"line\n".repeat(600));
        assert!(findings.iter().any(|f| f.message.contains("too long")));
        assert!(!findings.iter().any(|f| f.message.contains("too short")));
    }

    #[test]
    fn three_hundred_lines_has_no_length_finding() {
        let findings = run(&"line\n".repeat(300));
        assert!(!findings.iter().any(|f| f.message.contains("too long")));
        assert!(!findings.iter().any(|f| f.message.contains("too short")));
    }

    #[test]
    fn one_line_is_too_short() {
        let findings = run("# CLAUDE.md\n");
        assert!(findings
            .iter()
            .any(|f| f.severity == Severity::Warning && f.message.contains("too short")));
    }

    #[test]
    fn todo_emitted_once_at_first_line() {
        let findings = run("TODO one\nFIXME two\nTODO three\n");
        let todos: Vec<_> = findings
            .iter()
            .filter(|f| f.message.contains("TODO"))
            .collect();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].line, Some(1));
    }

    #[test]
    fn todos_inside_words_do_not_count() {
        let findings = run(&"The mastodon exhibit is fine.\n".repeat(25));
        assert!(!findings.iter().any(|f| f.message.contains("TODO")));
    }

    #[test]
    fn conversation_fragments_are_flagged() {
        let findings = run(&"Can you help me write a good CLAUDE.md?\n".repeat(25));
        assert!(findings
            .iter()
            .any(|f| f.message.to_lowercase().contains("conversation")));
    }

    #[test]
    fn first_person_is_info() {
        let findings = run(&"We use pytest for everything.\n".repeat(25));
        let fp: Vec<_> = findings
            .iter()
            .filter(|f| f.message.contains("first-person"))
            .collect();
        assert_eq!(fp.len(), 1);
        assert_eq!(fp[0].severity, Severity::Info);
    }

    #[test]
    fn unclosed_fence_is_warning() {
        let mut text = "x\n".repeat(25);
        text.push_str("```bash\ncargo test\n");
        let findings = run(&text);
        assert!(findings
            .iter()
            .any(|f| f.message.contains("unclosed code block")));
    }

    #[test]
    fn malformed_link_is_warning() {
        let mut text = "x\n".repeat(25);
        text.push_str("See [the docs]() for details.\n");
        let findings = run(&text);
        assert!(findings.iter().any(|f| f.message.contains("malformed")));
    }

    #[test]
    fn clean_document_in_band_has_no_findings() {
        let findings = run(&"Declarative guidance line.\n".repeat(40));
        assert!(findings.is_empty(), "unexpected: {:?}", findings);
    }
}
