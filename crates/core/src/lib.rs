//! Pothole Analysis Core
//!
//! Foundational error types and the input record model for the pothole
//! analysis workspace. This crate has no dependency on process execution or
//! the analysis engine.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `record` - Loosely typed input records and their coercion into
//!   `NormalizedRecord`

pub mod error;
pub mod record;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Records ────────────────────────────────────────────────────────────
pub use record::{
    parse_records, to_finite_number, to_severity_string, NormalizedRecord, Record, RecordId,
    UNKNOWN_SEVERITY,
};
