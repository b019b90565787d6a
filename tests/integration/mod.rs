//! Integration Tests Module
//!
//! End-to-end tests for the pothole analysis runner. Tests cover the
//! invocation lifecycle with real shell commands, the reconciliation
//! precedence across files and output markers, and the fallback report.

// Runner lifecycle and reconciliation precedence (unix shell required)
mod runner_test;

// Fallback report properties through the public API
mod fallback_test;
