//! JSON Configuration Management
//!
//! Loads the runner configuration from an optional JSON file and the process
//! environment. This is the only place the environment is read; the
//! resulting `AnalysisConfig` is handed to the runner by value.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::models::settings::AnalysisConfig;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::ensure_parent_dir_sync;

/// Environment variable holding the command template.
pub const ENV_COMMAND: &str = "POTHOLE_ANALYSIS_COMMAND";
/// Environment variable holding the timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "POTHOLE_ANALYSIS_TIMEOUT_SECS";
/// Environment variable holding the child working directory.
pub const ENV_WORKDIR: &str = "POTHOLE_ANALYSIS_WORKDIR";

/// Configuration service for the runner settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: Option<PathBuf>,
    config: AnalysisConfig,
}

impl ConfigService {
    /// Load configuration from `path` (if any) and the process environment.
    ///
    /// A config path that does not exist yet is created with defaults.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Same as [`ConfigService::load`] with an explicit environment lookup.
    pub fn load_with_env(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let mut config = match path {
            Some(path) if path.exists() => Self::load_from_file(path)?,
            Some(path) => {
                let default_config = AnalysisConfig::default();
                Self::save_to_file(path, &default_config)?;
                info!(path = %path.display(), "Created default analysis config");
                default_config
            }
            None => AnalysisConfig::default(),
        };

        apply_env_overrides(&mut config, env)?;
        config.validate().map_err(AppError::validation)?;

        Ok(Self {
            config_path: path.map(Path::to_path_buf),
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<AnalysisConfig> {
        let content = fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        Ok(config)
    }

    /// Save configuration to a file with pretty formatting
    fn save_to_file(path: &Path, config: &AnalysisConfig) -> AppResult<()> {
        config.validate().map_err(AppError::validation)?;
        ensure_parent_dir_sync(path)?;
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Take ownership of the configuration
    pub fn into_config(self) -> AnalysisConfig {
        self.config
    }

    /// Path the configuration was loaded from, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

/// Overlay environment values on top of `config`.
pub fn apply_env_overrides(
    config: &mut AnalysisConfig,
    env: impl Fn(&str) -> Option<String>,
) -> AppResult<()> {
    if let Some(template) = env(ENV_COMMAND).filter(|t| !t.trim().is_empty()) {
        config.command_template = Some(template);
    }

    if let Some(raw) = env(ENV_TIMEOUT_SECS) {
        config.timeout_secs = raw.trim().parse().map_err(|_| {
            AppError::config(format!(
                "{} must be a whole number of seconds, got {:?}",
                ENV_TIMEOUT_SECS, raw
            ))
        })?;
    }

    if let Some(dir) = env(ENV_WORKDIR).filter(|d| !d.trim().is_empty()) {
        config.working_dir = Some(PathBuf::from(dir));
    }

    Ok(())
}
