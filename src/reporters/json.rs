//! JSON reporter
//!
//! Outputs the full AuditReport as pretty-printed JSON, for machine
//! consumption or piping to jq.

use crate::models::AuditReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &AuditReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
