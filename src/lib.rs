//! Pothole Analysis - Application Library
//!
//! Runs the external pothole analysis command over a batch of records and
//! always returns a usable result. It includes:
//! - Command entry points used by the CLI
//! - The analysis runner service
//! - Configuration loading (JSON file + environment)
//! - Error and path utilities

pub mod commands;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use commands::{analyze_records_file, fallback_report, load_records, render_json};
pub use models::settings::{AnalysisConfig, ConfigOverrides};
pub use services::AnalysisRunner;
pub use storage::config::ConfigService;
pub use utils::error::{AppError, AppResult};
