//! Path Utilities
//!
//! Working-directory resolution and directory creation for the input and
//! output files.

use std::path::{Path, PathBuf};

use crate::utils::error::AppResult;

/// Resolve the working directory for an invocation.
///
/// `None` means the host's current directory; a relative path is taken
/// relative to it.
pub fn resolve_working_dir(configured: Option<&Path>) -> AppResult<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match configured {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => cwd.join(dir),
        None => cwd,
    })
}

/// Ensure the parent directory of `path` exists, creating it if necessary.
pub async fn ensure_parent_dir(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

/// Blocking variant of [`ensure_parent_dir`] for startup code.
pub fn ensure_parent_dir_sync(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
