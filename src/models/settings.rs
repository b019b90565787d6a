//! Settings Models
//!
//! Runner configuration and partial overrides.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Runner configuration, loaded once at startup and injected into the runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Shell command template with `{input}` / `{output}` placeholders
    #[serde(default)]
    pub command_template: Option<String>,
    /// Where the input records are written
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,
    /// Where the external process is expected to write its result
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Working directory of the child process (defaults to the host cwd)
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    /// File name probed as an alternate output location
    #[serde(default = "default_output_file_name")]
    pub default_output_file_name: PathBuf,
    /// Replaces the default alternate output list when set
    #[serde(default)]
    pub alternate_output_paths: Option<Vec<PathBuf>>,
    /// Child process time limit in seconds; 0 waits indefinitely
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_input_path() -> PathBuf {
    PathBuf::from("data").join("potholes.json")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("data").join("pothole_analysis.json")
}

fn default_output_file_name() -> PathBuf {
    PathBuf::from("pothole_analysis.json")
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            command_template: None,
            input_path: default_input_path(),
            output_path: default_output_path(),
            working_dir: None,
            default_output_file_name: default_output_file_name(),
            alternate_output_paths: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Partial configuration update (command-line flags, tests)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigOverrides {
    pub command_template: Option<String>,
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl AnalysisConfig {
    /// The command template, if one is usable. Blank templates count as unset.
    pub fn command_template(&self) -> Option<&str> {
        self.command_template
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// The child process time limit, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Apply a partial update to the configuration
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(template) = overrides.command_template {
            self.command_template = Some(template);
        }
        if let Some(path) = overrides.input_path {
            self.input_path = path;
        }
        if let Some(path) = overrides.output_path {
            self.output_path = path;
        }
        if let Some(dir) = overrides.working_dir {
            self.working_dir = Some(dir);
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout_secs = secs;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.input_path.as_os_str().is_empty() {
            return Err("inputPath must not be empty".to_string());
        }
        if self.output_path.as_os_str().is_empty() {
            return Err("outputPath must not be empty".to_string());
        }
        if self.input_path == self.output_path {
            return Err("inputPath and outputPath must differ".to_string());
        }
        if self.default_output_file_name.as_os_str().is_empty() {
            return Err("defaultOutputFileName must not be empty".to_string());
        }
        Ok(())
    }
}
