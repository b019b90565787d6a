//! Data Models
//!
//! Contains the configuration structures used throughout the application.
//! Analysis and record types come from the workspace crates.

pub mod settings;

pub use settings::*;
