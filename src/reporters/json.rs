//! JSON reporter
//!
//! Outputs the AnalysisReport as pretty-printed JSON, in the same shape the
//! HTTP API returns.

use crate::models::AnalysisReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
