//! Candidate Resolution
//!
//! Each place the external process may have left its result is a
//! `CandidateSource`. Sources are probed in order by [`resolve_first`]:
//! the first one yielding a non-null value wins, and every diagnostic
//! recorded along the way is kept.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::json::safe_json_parse;
use crate::marker::extract_marked_json;
use crate::models::AnalysisSource;

/// Diagnostic recorded when neither output stream carries a marker.
pub const NO_MARKER_DIAGNOSTIC: &str = "No ANALYSIS_JSON marker found in stdout or stderr";

/// Separator used when joining diagnostics.
pub const DIAGNOSTIC_SEPARATOR: &str = " | ";

// ============================================================================
// Outcome Types
// ============================================================================

/// A successfully recovered value and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: Value,
    pub source: AnalysisSource,
}

/// Result of probing a single candidate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CandidateOutcome {
    pub resolved: Option<Resolved>,
    pub diagnostic: Option<String>,
}

impl CandidateOutcome {
    /// The candidate produced a value.
    pub fn resolved(value: Value, source: AnalysisSource) -> Self {
        Self {
            resolved: Some(Resolved { value, source }),
            diagnostic: None,
        }
    }

    /// The candidate failed; record why.
    pub fn failed(diagnostic: impl Into<String>) -> Self {
        Self {
            resolved: None,
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// The candidate was not there and that is not worth reporting.
    pub fn skipped() -> Self {
        Self::default()
    }
}

/// Combined result of probing a candidate list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolution {
    pub resolved: Option<Resolved>,
    pub diagnostics: Vec<String>,
}

impl Resolution {
    /// Diagnostics joined for display, `None` when nothing went wrong.
    pub fn joined_diagnostics(&self) -> Option<String> {
        if self.diagnostics.is_empty() {
            None
        } else {
            Some(self.diagnostics.join(DIAGNOSTIC_SEPARATOR))
        }
    }
}

// ============================================================================
// Candidate Trait
// ============================================================================

/// A place the analysis result may be recovered from.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Short description for logging.
    fn describe(&self) -> String;

    /// Probe the candidate. Never fails; problems go into the diagnostic.
    async fn resolve(&self) -> CandidateOutcome;
}

/// Probe candidates in order until one resolves.
pub async fn resolve_first(candidates: &[Box<dyn CandidateSource + '_>]) -> Resolution {
    let mut resolution = Resolution::default();

    for candidate in candidates {
        let outcome = candidate.resolve().await;

        if let Some(diagnostic) = outcome.diagnostic {
            debug!(candidate = %candidate.describe(), %diagnostic, "Candidate not usable");
            resolution.diagnostics.push(diagnostic);
        }

        if let Some(resolved) = outcome.resolved {
            debug!(candidate = %candidate.describe(), source = %resolved.source, "Candidate resolved");
            resolution.resolved = Some(resolved);
            break;
        }
    }

    resolution
}

/// Turn parsed text into an outcome, treating JSON `null` as no result.
fn outcome_from_text(
    text: &str,
    source: AnalysisSource,
    parse_failure: impl FnOnce(String) -> String,
    null_result: impl FnOnce() -> String,
) -> CandidateOutcome {
    match safe_json_parse(text).into_result() {
        Ok(Value::Null) => CandidateOutcome::failed(null_result()),
        Ok(value) => CandidateOutcome::resolved(value, source),
        Err(error) => CandidateOutcome::failed(parse_failure(error)),
    }
}

// ============================================================================
// File Candidate
// ============================================================================

/// A JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    path: PathBuf,
    source: AnalysisSource,
    report_missing: bool,
}

impl FileCandidate {
    /// The configured output path. A missing file is reported.
    pub fn primary(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            source: AnalysisSource::OutputFile,
            report_missing: true,
        }
    }

    /// An alternate well-known path. A missing file is skipped silently.
    pub fn alternate(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            source: AnalysisSource::AlternateOutputFile,
            report_missing: false,
        }
    }
}

#[async_trait]
impl CandidateSource for FileCandidate {
    fn describe(&self) -> String {
        format!("{} ({})", self.path.display(), self.source)
    }

    async fn resolve(&self) -> CandidateOutcome {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound && !self.report_missing => {
                return CandidateOutcome::skipped();
            }
            Err(e) => {
                return CandidateOutcome::failed(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                ));
            }
        };

        let text = String::from_utf8_lossy(&bytes);
        let path = self.path.display().to_string();
        outcome_from_text(
            &text,
            self.source,
            |error| format!("Failed to parse {}: {}", path, error),
            || format!("{} contained no analysis (JSON null)", path),
        )
    }
}

// ============================================================================
// Marker Candidate
// ============================================================================

/// An `ANALYSIS_JSON:` line in the captured process output.
///
/// Stdout is preferred; stderr is only consulted when stdout has no marker.
#[derive(Debug, Clone)]
pub struct MarkerCandidate<'a> {
    stdout: &'a str,
    stderr: &'a str,
}

impl<'a> MarkerCandidate<'a> {
    pub fn new(stdout: &'a str, stderr: &'a str) -> Self {
        Self { stdout, stderr }
    }
}

#[async_trait]
impl<'a> CandidateSource for MarkerCandidate<'a> {
    fn describe(&self) -> String {
        "stdout/stderr marker".to_string()
    }

    async fn resolve(&self) -> CandidateOutcome {
        let (payload, source, channel) = match extract_marked_json(self.stdout) {
            Some(payload) => (payload, AnalysisSource::StdoutMarker, "stdout"),
            None => match extract_marked_json(self.stderr) {
                Some(payload) => (payload, AnalysisSource::StderrMarker, "stderr"),
                None => return CandidateOutcome::failed(NO_MARKER_DIAGNOSTIC),
            },
        };

        outcome_from_text(
            payload,
            source,
            |error| format!("Failed to parse {} marker JSON: {}", channel, error),
            || format!("{} marker contained no analysis (JSON null)", channel),
        )
    }
}
