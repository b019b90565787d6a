//! Storage Layer
//!
//! Handles the JSON configuration file and environment overrides.

pub mod config;

pub use config::*;
