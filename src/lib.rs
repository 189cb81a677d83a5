//! claudemd-audit - audits CLAUDE.md project-context files
//!
//! A CLAUDE.md tells a coding agent how a repository works. This crate
//! checks that file against the repository itself: it extracts the claims
//! the document makes, scans the codebase for ground truth, and runs five
//! rule families (coverage, accuracy, anti-pattern, specificity,
//! freshness) to produce findings and a deterministic 0-100 score.
//!
//! ```no_run
//! use claudemd_audit::audit::audit;
//! use claudemd_audit::facts::FactScanner;
//!
//! let facts = FactScanner::new(".").scan()?;
//! let report = audit(&std::fs::read_to_string("CLAUDE.md")?, &facts)?;
//! println!("score: {}", report.score);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod audit;
pub mod claims;
pub mod cli;
pub mod config;
pub mod document;
pub mod evaluators;
pub mod facts;
pub mod models;
pub mod reporters;
pub mod scoring;
pub mod sections;
