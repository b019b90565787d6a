//! Analysis Models
//!
//! Data structures for the analysis report and the result envelope returned
//! to callers of the runner.

use std::collections::BTreeMap;
use std::path::PathBuf;

use pothole_analysis_core::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Analysis Report
// ============================================================================

/// Latitude/longitude extent of the input. An axis with no finite values
/// has both of its bounds set to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
    pub min_lon: Option<f64>,
    pub max_lon: Option<f64>,
}

/// One entry of the top-5 ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Top5Entry {
    pub id: RecordId,
    pub severity: String,
    pub resolved_reports: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Statistics summary over a set of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Number of input records
    pub count: usize,
    /// Records per severity label
    pub severity_counts: BTreeMap<String, usize>,
    /// Label with the highest count, `None` for empty input
    pub most_common_severity: Option<String>,
    /// Mean resolved count, 0 for empty input
    pub average_resolved_reports: f64,
    /// Largest resolved count, 0 for empty input
    pub max_resolved_reports: f64,
    /// Coordinate extent
    pub bounding_box: BoundingBox,
    /// At most five records, highest resolved count first
    pub top5_by_resolved_reports: Vec<Top5Entry>,
}

// ============================================================================
// Provenance
// ============================================================================

/// Where the final analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisSource {
    /// The configured output path
    #[serde(rename = "output-file")]
    OutputFile,
    /// One of the alternate well-known output paths
    #[serde(rename = "alternate-output-file")]
    AlternateOutputFile,
    /// `ANALYSIS_JSON:` marker on stdout
    #[serde(rename = "stdout-marker")]
    StdoutMarker,
    /// `ANALYSIS_JSON:` marker on stderr
    #[serde(rename = "stderr-marker")]
    StderrMarker,
    /// Computed in-process from the input records
    #[serde(rename = "node-fallback")]
    Fallback,
}

impl std::fmt::Display for AnalysisSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisSource::OutputFile => write!(f, "output-file"),
            AnalysisSource::AlternateOutputFile => write!(f, "alternate-output-file"),
            AnalysisSource::StdoutMarker => write!(f, "stdout-marker"),
            AnalysisSource::StderrMarker => write!(f, "stderr-marker"),
            AnalysisSource::Fallback => write!(f, "node-fallback"),
        }
    }
}

/// The recovered analysis.
///
/// External results are kept opaque; the fallback report is typed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Analysis {
    External(Value),
    Fallback(AnalysisReport),
}

impl Analysis {
    /// Render as a plain JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            Analysis::External(value) => value.clone(),
            Analysis::Fallback(report) => serde_json::to_value(report).unwrap_or(Value::Null),
        }
    }

    /// The fallback report, if this analysis was computed in-process.
    pub fn as_report(&self) -> Option<&AnalysisReport> {
        match self {
            Analysis::Fallback(report) => Some(report),
            Analysis::External(_) => None,
        }
    }
}

// ============================================================================
// Result Envelope
// ============================================================================

/// Fields present only when the external command was executed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionDetails {
    /// Materialized command line
    pub command: String,
    /// Raw standard output
    pub stdout: String,
    /// Raw standard error
    pub stderr: String,
    /// Recovered analysis
    pub analysis: Analysis,
    /// Provenance of `analysis`
    pub analysis_source: AnalysisSource,
    /// Diagnostics accumulated while resolving candidates, joined with " | "
    pub analysis_parse_error: Option<String>,
}

/// The runner's sole return value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    pub ok: bool,
    pub executed: bool,
    /// Why the command was not executed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    #[serde(flatten)]
    pub execution: Option<ExecutionDetails>,
}

impl ResultEnvelope {
    /// Envelope for an invocation where no command template is configured.
    pub fn not_configured(
        reason: impl Into<String>,
        input_path: PathBuf,
        output_path: PathBuf,
    ) -> Self {
        Self {
            ok: false,
            executed: false,
            reason: Some(reason.into()),
            input_path,
            output_path,
            execution: None,
        }
    }

    /// Envelope for an executed invocation.
    pub fn executed(input_path: PathBuf, output_path: PathBuf, details: ExecutionDetails) -> Self {
        Self {
            ok: true,
            executed: true,
            reason: None,
            input_path,
            output_path,
            execution: Some(details),
        }
    }

    /// Provenance of the analysis, if the command was executed.
    pub fn analysis_source(&self) -> Option<AnalysisSource> {
        self.execution.as_ref().map(|e| e.analysis_source)
    }

    /// The recovered analysis, if the command was executed.
    pub fn analysis(&self) -> Option<&Analysis> {
        self.execution.as_ref().map(|e| &e.analysis)
    }

    /// Accumulated diagnostics, if any.
    pub fn analysis_parse_error(&self) -> Option<&str> {
        self.execution
            .as_ref()
            .and_then(|e| e.analysis_parse_error.as_deref())
    }
}
