//! Audit configuration
//!
//! Thresholds and weights for the rule families and scorer. Everything has
//! a canonical default; a `claudemd-audit.toml` at the project root can
//! override any field.

use crate::scoring::ScoreWeights;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "claudemd-audit.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// "Greenfield" claims are contradicted above this many source files
    pub greenfield_file_threshold: usize,
    /// Documents shorter than this are flagged "too short"
    pub min_lines: usize,
    /// Documents longer than this are flagged "too long"
    pub max_lines: usize,
    /// Lines after a vague phrase in which a concrete elaboration counts
    pub elaboration_window: usize,
    /// Days of document-vs-source lag before the staleness rule fires
    pub stale_days: i64,
    pub weights: ScoreWeights,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            greenfield_file_threshold: 50,
            min_lines: 20,
            max_lines: 500,
            elaboration_window: 3,
            stale_days: 30,
            weights: ScoreWeights::default(),
        }
    }
}

impl AuditConfig {
    /// Load config from `claudemd-audit.toml` under `root`, falling back
    /// to defaults when the file is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            debug!("No {} found, using defaults", CONFIG_FILE_NAME);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_canonical() {
        let config = AuditConfig::default();
        assert_eq!(config.greenfield_file_threshold, 50);
        assert_eq!(config.min_lines, 20);
        assert_eq!(config.max_lines, 500);
        assert_eq!(config.weights.error_penalty, 15);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AuditConfig::load(dir.path()).unwrap();
        assert_eq!(config.max_lines, 500);
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "max_lines = 300\n\n[weights]\nerror_penalty = 20\n",
        )
        .unwrap();
        let config = AuditConfig::load(dir.path()).unwrap();
        assert_eq!(config.max_lines, 300);
        assert_eq!(config.weights.error_penalty, 20);
        assert_eq!(config.min_lines, 20);
        assert_eq!(config.weights.warning_penalty, 5);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "max_lines = [nope").unwrap();
        assert!(AuditConfig::load(dir.path()).is_err());
    }
}
