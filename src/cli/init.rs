//! Init command - write a default configuration file

use crate::config::CONFIG_FILE_NAME;
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

pub fn run(root: &Path) -> Result<()> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        println!(
            "{} {} already exists, leaving it alone",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    let default_config = r#"# claudemd-audit configuration
# Every field is optional; absent fields keep their defaults.

# "Greenfield" claims are contradicted above this many source files
greenfield_file_threshold = 50

# Document length bounds (lines)
min_lines = 20
max_lines = 500

# Lines after a vague phrase in which a concrete elaboration counts
elaboration_window = 3

# Days of document-vs-source lag before the staleness rule fires
stale_days = 30

[weights]
error_penalty = 15
warning_penalty = 5
info_penalty = 1
coverage_bonus = 20
specificity_bonus = 10
"#;
    std::fs::write(&config_path, default_config)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    println!(
        "\nNext: {}",
        style("claudemd-audit audit CLAUDE.md").cyan()
    );
    Ok(())
}
