//! Analyze Commands
//!
//! Read a records document, run one analysis invocation, and render the
//! result as JSON.

use std::path::Path;

use pothole_analysis_core::{parse_records, Record};
use pothole_analysis_engine::{fallback, normalize_json_text, AnalysisReport, ResultEnvelope};
use serde_json::Value;
use serde::Serialize;
use tracing::info;

use crate::services::analysis::AnalysisRunner;
use crate::utils::error::AppResult;

/// Read and parse a records document from disk.
pub async fn load_records(path: &Path) -> AppResult<Vec<Record>> {
    let text = tokio::fs::read_to_string(path).await?;
    let records = parse_records(&text)?;
    info!(path = %path.display(), count = records.len(), "Loaded records");
    Ok(records)
}

/// Run one invocation over the records stored at `records_path`.
pub async fn analyze_records_file(
    runner: &AnalysisRunner,
    records_path: &Path,
) -> AppResult<ResultEnvelope> {
    let records = load_records(records_path).await?;
    runner.run(&records).await
}

/// Compute only the in-process report for the records at `records_path`.
///
/// The document must be valid JSON, but any shape is accepted: a
/// `{"potholes": [...]}` wrapper is unwrapped and anything other than an
/// array counts as no records.
pub async fn fallback_report(records_path: &Path) -> AppResult<AnalysisReport> {
    let text = tokio::fs::read_to_string(records_path).await?;
    let document: Value = serde_json::from_str(normalize_json_text(&text))?;
    let records = document.get("potholes").unwrap_or(&document);
    info!(path = %records_path.display(), "Computing fallback report");
    Ok(fallback::analyze_value(records))
}

/// Render a value as JSON, pretty unless `compact`.
pub fn render_json<T: Serialize>(value: &T, compact: bool) -> AppResult<String> {
    let text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(text)
}
