//! External Process Execution
//!
//! Runs a materialized command line through the platform shell, capturing
//! stdout and stderr. The child inherits the host environment.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use pothole_analysis_core::{CoreError, CoreResult};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Maximum number of stderr characters quoted in a failure message.
const STDERR_EXCERPT_CHARS: usize = 500;

/// Captured result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

/// Run `command` through the shell in `working_dir`.
///
/// A non-zero exit, a spawn failure or an expired `time_limit` is an error.
/// On expiry the child is killed.
pub async fn run_shell_command(
    command: &str,
    working_dir: &Path,
    time_limit: Option<Duration>,
) -> CoreResult<ProcessOutput> {
    let start = Instant::now();

    let mut cmd = shell_command(command);
    cmd.current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(%command, working_dir = %working_dir.display(), "Spawning analysis command");

    let result = match time_limit {
        Some(limit) => match timeout(limit, cmd.output()).await {
            Ok(result) => result,
            Err(_) => {
                warn!(%command, secs = limit.as_secs(), "Analysis command timed out");
                return Err(CoreError::command(format!(
                    "`{}` timed out after {} seconds",
                    command,
                    limit.as_secs()
                )));
            }
        },
        None => cmd.output().await,
    };

    let output = result
        .map_err(|e| CoreError::command(format!("Failed to execute `{}`: {}", command, e)))?;

    let duration_ms = start.elapsed().as_millis() as u64;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        let status = match output.status.code() {
            Some(code) => format!("exited with code {}", code),
            None => "was terminated by a signal".to_string(),
        };
        return Err(CoreError::command(format!(
            "`{}` {}: {}",
            command,
            status,
            stderr_excerpt(&stderr)
        )));
    }

    debug!(%command, duration_ms, "Analysis command finished");

    Ok(ProcessOutput {
        stdout,
        stderr,
        duration_ms,
    })
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

/// Tail of the trimmed stderr text.
fn stderr_excerpt(stderr: &str) -> String {
    let trimmed = stderr.trim();
    let total = trimmed.chars().count();
    if total <= STDERR_EXCERPT_CHARS {
        return trimmed.to_string();
    }
    let tail: String = trimmed.chars().skip(total - STDERR_EXCERPT_CHARS).collect();
    format!("...{}", tail)
}
