//! Path helpers.

use crate::constants::PROJECT_FILE_NAME;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Renders `path` relative to `base` for log lines.
///
/// Paths outside `base` are rendered in full.
pub fn relative_display(path: &Path, base: &Path) -> String {
    path.strip_prefix(base).unwrap_or(path).display().to_string()
}

/// Expands a leading `~` and `$VAR` references in a configured path.
pub fn expand_home(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).as_ref()),
    }
}

/// Finds the nearest directory, starting at `start` and walking up, that
/// contains a `pom.xml`.
///
/// # Errors
///
/// Fails when no ancestor contains a project file.
pub fn find_project_root(start: &Path) -> Result<PathBuf> {
    let mut current = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());

    loop {
        if current.join(PROJECT_FILE_NAME).exists() {
            return Ok(current);
        }

        if !current.pop() {
            return Err(anyhow::anyhow!(
                "No {PROJECT_FILE_NAME} found in current directory or any parent directory"
            ));
        }
    }
}
