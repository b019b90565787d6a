//! Pothole Analysis Engine
//!
//! Building blocks for running the external analysis command and recovering
//! its result:
//!
//! - `command` - Template materialization (`{input}` / `{output}`)
//! - `process` - Shell execution with output capture and optional timeout
//! - `json` - BOM-tolerant JSON parsing that reports instead of failing
//! - `marker` - `ANALYSIS_JSON:` extraction from free-form output
//! - `candidates` - Ordered candidate sources and the first-success combinator
//! - `reconcile` - The precedence protocol ending in the fallback analysis
//! - `fallback` - Deterministic in-process statistics over the input records
//! - `models` - Report, provenance and result envelope types
//!
//! Config loading and the invocation lifecycle (directories, input file)
//! live in the application crate.

pub mod candidates;
pub mod command;
pub mod fallback;
pub mod json;
pub mod marker;
pub mod models;
pub mod process;
pub mod reconcile;

// Re-export model types
pub use models::{
    Analysis, AnalysisReport, AnalysisSource, BoundingBox, ExecutionDetails, ResultEnvelope,
    Top5Entry,
};

// Re-export the protocol pieces
pub use candidates::{resolve_first, CandidateOutcome, CandidateSource, Resolution, Resolved};
pub use command::materialize_command;
pub use json::{normalize_json_text, safe_json_parse, ParseOutcome};
pub use marker::{extract_marked_json, ANALYSIS_MARKER};
pub use process::{run_shell_command, ProcessOutput};
pub use reconcile::{default_alternate_paths, reconcile, ReconcileRequest, Reconciliation};
