//! Claim extraction from document text
//!
//! Turns raw markdown into a structured list of located claims: section
//! headings, framework mentions, command literals, path references, and
//! length metrics. Extraction is literal/token based, never semantic, and
//! never fails — a fragment that does not parse simply produces no claim.
//! Identical text always yields an identical, identically ordered claim
//! list.

use crate::document::Document;
use crate::sections::{match_heading, CATALOG};
use regex::Regex;
use std::sync::OnceLock;

/// Frameworks recognized as claims when named in prose
pub const KNOWN_FRAMEWORKS: &[&str] = &[
    "react", "vue", "angular", "svelte", "nextjs", "next.js", "nuxt", "django", "flask",
    "fastapi", "express", "nestjs", "spring", "rails", "laravel", "axum", "actix",
];

/// Test frameworks recognized as claims when named in prose
pub const KNOWN_TEST_FRAMEWORKS: &[&str] = &[
    "pytest", "jest", "vitest", "mocha", "rspec", "junit", "playwright", "cypress",
];

/// Leading tokens that mark a code-block line as a runnable command
const COMMAND_TOOLS: &[&str] = &[
    "cargo", "npm", "npx", "pnpm", "yarn", "bun", "pip", "pip3", "python", "python3", "uv",
    "poetry", "go", "make", "git", "docker", "docker-compose", "kubectl", "mvn", "gradle",
    "bundle", "rake", "just", "bash", "sh",
];

/// A located assertion extracted from the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// A heading matched a canonical catalog entry
    SectionPresent { section: &'static str, line: u32 },
    /// A framework named as a distinct token in prose
    Framework { name: String, line: u32 },
    /// A runnable command inside a fenced code block
    Command { text: String, tool: String, line: u32 },
    /// A backticked token that looks like a file or directory path
    PathRef { path: String, line: u32 },
    /// A "greenfield" / "new project" style phase assertion
    ProjectPhase { phrase: String, line: u32 },
    /// A test framework named in prose or commands
    TestFramework { name: String, line: u32 },
    /// A "name 1.2.3" style version assertion
    Version { name: String, version: String, line: u32 },
    /// Line span of one matched canonical section
    SectionLength { section: &'static str, lines: u32 },
}

fn inline_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`([^`\s]+)`").expect("valid regex"))
}

fn version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b([a-z][a-z0-9_+.-]{1,40})\s+v?(\d+\.\d+(?:\.\d+)?)\b")
            .expect("valid regex")
    })
}

fn phase_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(greenfield|brand[- ]new project|new project)\b").expect("valid regex")
    })
}

/// Parse document text into a `Document` plus its claim list.
///
/// Claims are emitted in a fixed pass order: sections and length metrics
/// first, then the line-by-line token claims in document order.
pub fn parse(text: &str) -> (Document, Vec<Claim>) {
    let document = Document::parse(text);
    let mut claims = Vec::new();

    // Section claims from matched headings, plus their spans.
    for (idx, heading) in document.headings.iter().enumerate() {
        if let Some(spec) = match_heading(&heading.text) {
            claims.push(Claim::SectionPresent {
                section: spec.name,
                line: heading.line,
            });
            if let Some((start, end)) = document.section_span(idx) {
                claims.push(Claim::SectionLength {
                    section: spec.name,
                    lines: end.saturating_sub(start) + 1,
                });
            }
        }
    }

    // Token claims, line by line. Fenced blocks yield command claims;
    // prose yields framework/path/version/phase claims.
    let mut in_fence = false;
    let mut fence_lang = String::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = (idx + 1) as u32;
        let trimmed = line.trim();

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            if !in_fence {
                fence_lang = trimmed
                    .trim_start_matches('`')
                    .trim_start_matches('~')
                    .trim()
                    .to_lowercase();
            }
            in_fence = !in_fence;
            continue;
        }

        if in_fence {
            extract_command(trimmed, &fence_lang, line_no, &mut claims);
            continue;
        }

        extract_prose_claims(line, line_no, &mut claims);
    }

    (document, claims)
}

fn extract_command(line: &str, fence_lang: &str, line_no: u32, claims: &mut Vec<Claim>) {
    if line.is_empty() || line.starts_with('#') {
        return;
    }
    let stripped = line.strip_prefix("$ ").unwrap_or(line);
    let tool = match stripped.split_whitespace().next() {
        Some(t) => t,
        None => return,
    };

    let shell_fence = matches!(fence_lang, "bash" | "sh" | "shell" | "zsh" | "console" | "");
    let known_tool = COMMAND_TOOLS.contains(&tool);
    if !known_tool && !shell_fence {
        return;
    }
    // In an untyped fence only known tools count; anything goes in a shell fence.
    if !known_tool && fence_lang.is_empty() {
        return;
    }

    claims.push(Claim::Command {
        text: stripped.to_string(),
        tool: tool.to_lowercase(),
        line: line_no,
    });

    for tf in KNOWN_TEST_FRAMEWORKS {
        if contains_token(&stripped.to_lowercase(), tf) {
            claims.push(Claim::TestFramework {
                name: (*tf).to_string(),
                line: line_no,
            });
        }
    }
}

fn extract_prose_claims(line: &str, line_no: u32, claims: &mut Vec<Claim>) {
    let lower = line.to_lowercase();

    if let Some(m) = phase_re().find(line) {
        claims.push(Claim::ProjectPhase {
            phrase: m.as_str().to_lowercase(),
            line: line_no,
        });
    }

    for fw in KNOWN_FRAMEWORKS {
        if contains_token(&lower, fw) {
            claims.push(Claim::Framework {
                name: canonical_framework(fw),
                line: line_no,
            });
        }
    }

    for tf in KNOWN_TEST_FRAMEWORKS {
        if contains_token(&lower, tf) {
            claims.push(Claim::TestFramework {
                name: (*tf).to_string(),
                line: line_no,
            });
        }
    }

    for cap in inline_code_re().captures_iter(line) {
        let token = &cap[1];
        if looks_like_path(token) {
            claims.push(Claim::PathRef {
                path: token.to_string(),
                line: line_no,
            });
        }
    }

    for cap in version_re().captures_iter(line) {
        claims.push(Claim::Version {
            name: cap[1].to_lowercase(),
            version: cap[2].to_string(),
            line: line_no,
        });
    }
}

/// Whole-token containment: `needle` must not be embedded in a larger word.
///
/// "react" matches in "uses React 18" but not in "reaction time".
fn contains_token(haystack: &str, needle: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let abs = start + pos;
        let before_ok = abs == 0
            || !haystack[..abs]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric());
        let after = abs + needle.len();
        let after_ok = after >= haystack.len()
            || !haystack[after..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = abs + needle.len();
    }
    false
}

/// "next.js" and "nextjs" both claim nextjs; everything else is already canonical
fn canonical_framework(name: &str) -> String {
    match name {
        "next.js" => "nextjs".to_string(),
        other => other.to_string(),
    }
}

/// Path heuristic from the freshness rules: a separator plus either an
/// extension on the last segment or a trailing slash. Tool invocations
/// written in backticks ("pip install x") are not paths.
fn looks_like_path(token: &str) -> bool {
    if !token.contains('/') {
        return false;
    }
    const TOOL_PREFIXES: &[&str] = &["pip", "npm", "cargo", "make", "git", "pnpm", "yarn", "go"];
    if let Some(first) = token.split('/').next() {
        if TOOL_PREFIXES.contains(&first) {
            return false;
        }
    }
    if token.starts_with("http://") || token.starts_with("https://") {
        return false;
    }
    let last = token.rsplit('/').next().unwrap_or("");
    token.ends_with('/') || last.contains('.')
}

/// Count of distinct canonical sections present in a claim list
pub fn distinct_sections_present(claims: &[Claim]) -> usize {
    CATALOG
        .iter()
        .filter(|spec| {
            claims.iter().any(|c| {
                matches!(c, Claim::SectionPresent { section, .. } if *section == spec.name)
            })
        })
        .count()
}
