//! Analysis Execution Orchestrator
//!
//! One invocation: persist the input records, run the external analysis
//! command, and reconcile whatever it produced into a `ResultEnvelope`.
//!
//! Invocations share nothing but the read-only configuration. Concurrent
//! invocations must use distinct input/output paths; files are not locked.

use std::path::{Path, PathBuf};

use pothole_analysis_core::Record;
use pothole_analysis_engine::reconcile::absolutize;
use pothole_analysis_engine::{
    default_alternate_paths, materialize_command, reconcile, run_shell_command,
    ExecutionDetails, ReconcileRequest, ResultEnvelope,
};
use tracing::{info, warn};

use crate::models::settings::AnalysisConfig;
use crate::storage::config::ENV_COMMAND;
use crate::utils::error::AppResult;
use crate::utils::paths::{ensure_parent_dir, resolve_working_dir};

/// Runs the external analysis and reconciles its result.
#[derive(Debug, Clone)]
pub struct AnalysisRunner {
    config: AnalysisConfig,
    working_dir: PathBuf,
}

impl AnalysisRunner {
    /// Create a runner from an already loaded configuration.
    pub fn new(config: AnalysisConfig) -> AppResult<Self> {
        let working_dir = resolve_working_dir(config.working_dir.as_deref())?;
        Ok(Self {
            config,
            working_dir,
        })
    }

    /// Get the runner configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Directory the command runs in and relative paths resolve against.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Run with the configured input and output paths.
    pub async fn run(&self, records: &[Record]) -> AppResult<ResultEnvelope> {
        let input_path = self.config.input_path.clone();
        let output_path = self.config.output_path.clone();
        self.run_with_paths(records, &input_path, &output_path).await
    }

    /// Run with explicit input and output paths.
    ///
    /// I/O failures and command failures (spawn error, non-zero exit,
    /// timeout) are returned as errors. Everything that goes wrong while
    /// recovering the result ends up in the envelope's diagnostics instead.
    pub async fn run_with_paths(
        &self,
        records: &[Record],
        input_path: &Path,
        output_path: &Path,
    ) -> AppResult<ResultEnvelope> {
        let input_path = absolutize(input_path, &self.working_dir);
        let output_path = absolutize(output_path, &self.working_dir);

        ensure_parent_dir(&input_path).await?;
        ensure_parent_dir(&output_path).await?;
        write_input(records, &input_path).await?;

        let Some(template) = self.config.command_template() else {
            warn!(input = %input_path.display(), "No analysis command configured");
            return Ok(ResultEnvelope::not_configured(
                not_configured_reason(),
                input_path,
                output_path,
            ));
        };

        let command = materialize_command(template, &input_path, &output_path);
        info!(%command, records = records.len(), "Running external analysis");

        let output =
            run_shell_command(&command, &self.working_dir, self.config.timeout()).await?;

        let alternate_paths = self.alternate_paths(&output_path);
        let reconciliation = reconcile(ReconcileRequest {
            output_path: &output_path,
            alternate_paths: &alternate_paths,
            stdout: &output.stdout,
            stderr: &output.stderr,
            records,
        })
        .await;

        info!(
            source = %reconciliation.source,
            duration_ms = output.duration_ms,
            diagnostics = reconciliation.parse_error.as_deref().unwrap_or(""),
            "Analysis reconciled"
        );

        Ok(ResultEnvelope::executed(
            input_path,
            output_path,
            ExecutionDetails {
                command,
                stdout: output.stdout,
                stderr: output.stderr,
                analysis: reconciliation.analysis,
                analysis_source: reconciliation.source,
                analysis_parse_error: reconciliation.parse_error,
            },
        ))
    }

    /// Alternate output locations probed after the primary path.
    fn alternate_paths(&self, output_path: &Path) -> Vec<PathBuf> {
        match &self.config.alternate_output_paths {
            Some(paths) => paths
                .iter()
                .map(|p| absolutize(p, &self.working_dir))
                .collect(),
            None => default_alternate_paths(
                output_path,
                &self.working_dir,
                &self.config.default_output_file_name,
            ),
        }
    }
}

fn not_configured_reason() -> String {
    format!(
        "No analysis command is configured. Set {} or `commandTemplate` in the config file to run the external analysis.",
        ENV_COMMAND
    )
}

/// Write the records as pretty-printed JSON.
async fn write_input(records: &[Record], input_path: &Path) -> AppResult<()> {
    let payload = serde_json::to_string_pretty(records)?;
    tokio::fs::write(input_path, payload).await?;
    Ok(())
}
