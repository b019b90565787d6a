//! Analysis Service
//!
//! Drives the external analysis command. The pure pieces (templating,
//! reconciliation, fallback statistics) live in `pothole-analysis-engine`.

pub mod runner;

pub use runner::AnalysisRunner;
