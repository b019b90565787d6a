//! Result Reconciliation
//!
//! Recovers a single analysis from whatever the external process left
//! behind, in strict precedence order:
//!
//! 1. the primary output file
//! 2. alternate well-known output files
//! 3. an `ANALYSIS_JSON:` marker on stdout, else stderr
//! 4. the in-process fallback analysis, which always succeeds

use std::path::{Path, PathBuf};

use pothole_analysis_core::Record;
use tracing::{info, warn};

use crate::candidates::{
    resolve_first, CandidateSource, FileCandidate, MarkerCandidate, DIAGNOSTIC_SEPARATOR,
};
use crate::fallback;
use crate::models::{Analysis, AnalysisSource};

/// Note appended to the diagnostics when the fallback analysis is used.
pub const FALLBACK_NOTE: &str = "Used in-process fallback analysis";

/// Everything reconciliation needs from one invocation.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileRequest<'a> {
    pub output_path: &'a Path,
    pub alternate_paths: &'a [PathBuf],
    pub stdout: &'a str,
    pub stderr: &'a str,
    pub records: &'a [Record],
}

/// The reconciled analysis with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub analysis: Analysis,
    pub source: AnalysisSource,
    /// Diagnostics joined with " | ", `None` when the first candidate won cleanly
    pub parse_error: Option<String>,
}

/// Build the ordered candidate list.
///
/// Alternate paths equal to the primary path or to an earlier alternate are
/// dropped so that no file is probed twice.
pub fn build_candidates<'a>(request: &ReconcileRequest<'a>) -> Vec<Box<dyn CandidateSource + 'a>> {
    let mut candidates: Vec<Box<dyn CandidateSource + 'a>> =
        vec![Box::new(FileCandidate::primary(request.output_path))];

    let mut seen: Vec<&Path> = vec![request.output_path];
    for path in request.alternate_paths {
        if seen.contains(&path.as_path()) {
            continue;
        }
        seen.push(path.as_path());
        candidates.push(Box::new(FileCandidate::alternate(path)));
    }

    candidates.push(Box::new(MarkerCandidate::new(request.stdout, request.stderr)));
    candidates
}

/// Run the full precedence protocol. Never fails.
pub async fn reconcile(request: ReconcileRequest<'_>) -> Reconciliation {
    let candidates = build_candidates(&request);
    let resolution = resolve_first(&candidates).await;

    if let Some(resolved) = resolution.resolved.clone() {
        info!(source = %resolved.source, "Recovered external analysis");
        return Reconciliation {
            analysis: Analysis::External(resolved.value),
            source: resolved.source,
            parse_error: resolution.joined_diagnostics(),
        };
    }

    warn!(
        diagnostics = resolution.diagnostics.len(),
        records = request.records.len(),
        "No external analysis recovered; computing fallback"
    );

    let mut diagnostics = resolution.diagnostics;
    diagnostics.push(FALLBACK_NOTE.to_string());

    Reconciliation {
        analysis: Analysis::Fallback(fallback::analyze(request.records)),
        source: AnalysisSource::Fallback,
        parse_error: Some(diagnostics.join(DIAGNOSTIC_SEPARATOR)),
    }
}

/// Default alternate output locations, in probe order.
///
/// - the primary path made absolute against `working_dir`
/// - `default_file_name` as given, resolved by the OS
/// - `default_file_name` made absolute against `working_dir`
pub fn default_alternate_paths(
    output_path: &Path,
    working_dir: &Path,
    default_file_name: &Path,
) -> Vec<PathBuf> {
    vec![
        absolutize(output_path, working_dir),
        default_file_name.to_path_buf(),
        absolutize(default_file_name, working_dir),
    ]
}

/// Join a relative path onto `base`; absolute paths are returned as is.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
