//! Canonical section catalog for CLAUDE.md documents
//!
//! Every entry carries an importance tier and a synonym list so heading
//! matching tolerates the common naming variants ("Tech Stack" vs
//! "Technology Stack", "Commands" vs "Common Commands").

use crate::models::Severity;
use serde::{Deserialize, Serialize};

/// Importance tier of a canonical section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Critical,
    Recommended,
    Optional,
}

impl Importance {
    /// Severity of the finding emitted when a section of this tier is missing
    pub fn missing_severity(self) -> Severity {
        match self {
            Importance::Critical => Severity::Error,
            Importance::Recommended => Severity::Warning,
            Importance::Optional => Severity::Info,
        }
    }
}

/// One entry in the canonical section catalog
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub name: &'static str,
    pub importance: Importance,
    synonyms: &'static [&'static str],
}

/// The canonical catalog, in reporting order.
///
/// Critical sections are the ones an agent cannot work without; recommended
/// ones sharpen behavior; optional ones add context.
pub const CATALOG: &[SectionSpec] = &[
    SectionSpec {
        name: "Project Overview",
        importance: Importance::Critical,
        synonyms: &["project overview", "overview", "about", "project description", "what is this"],
    },
    SectionSpec {
        name: "Common Commands",
        importance: Importance::Critical,
        synonyms: &[
            "common commands",
            "commands",
            "development commands",
            "dev commands",
            "useful commands",
            "scripts",
        ],
    },
    SectionSpec {
        name: "Architecture",
        importance: Importance::Critical,
        synonyms: &[
            "architecture",
            "structure",
            "project structure",
            "code structure",
            "project layout",
            "codebase layout",
        ],
    },
    SectionSpec {
        name: "Coding Standards",
        importance: Importance::Recommended,
        synonyms: &[
            "coding standards",
            "code standards",
            "coding conventions",
            "code style",
            "style guide",
            "conventions",
        ],
    },
    SectionSpec {
        name: "Anti-Patterns",
        importance: Importance::Recommended,
        synonyms: &["anti-patterns", "anti patterns", "antipatterns", "things to avoid", "do not"],
    },
    SectionSpec {
        name: "Dependencies",
        importance: Importance::Optional,
        synonyms: &["dependencies", "tech stack", "technology stack", "stack", "libraries", "packages"],
    },
    SectionSpec {
        name: "Git Conventions",
        importance: Importance::Optional,
        synonyms: &[
            "git conventions",
            "git workflow",
            "commit conventions",
            "commit style",
            "branching",
            "version control",
        ],
    },
    SectionSpec {
        name: "Domain Context",
        importance: Importance::Optional,
        synonyms: &["domain context", "domain", "glossary", "terminology", "business context"],
    },
];

/// Normalize a heading for matching: lowercase, trimmed, markdown noise removed.
fn normalize(heading: &str) -> String {
    heading
        .trim()
        .trim_start_matches('#')
        .trim()
        .trim_matches(|c: char| c == '*' || c == '_' || c == ':' || c == '`')
        .to_lowercase()
}

/// Match a heading against the catalog.
///
/// When a heading satisfies several entries ("Architecture Overview"
/// contains both "architecture" and "overview"), the longest matching
/// synonym wins so the more specific section is credited.
pub fn match_heading(heading: &str) -> Option<&'static SectionSpec> {
    let normalized = normalize(heading);
    if normalized.is_empty() {
        return None;
    }

    let mut best: Option<(&'static SectionSpec, usize)> = None;
    for spec in CATALOG {
        for synonym in spec.synonyms {
            let hit = normalized == *synonym || normalized.contains(synonym);
            if hit {
                let better = match best {
                    Some((_, len)) => synonym.len() > len,
                    None => true,
                };
                if better {
                    best = Some((spec, synonym.len()));
                }
            }
        }
    }
    best.map(|(spec, _)| spec)
}
