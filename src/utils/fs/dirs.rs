//! Directory creation and file copying.

use crate::core::{FileOperation, FileOperationError, FileResultExt};
use std::fs;
use std::io;
use std::path::Path;

/// Creates `path` and its parents if missing.
///
/// Calling it on an existing directory is a no-op that leaves the directory's
/// content untouched.
///
/// # Errors
///
/// Fails when the directory cannot be created or when `path` exists and is
/// not a directory.
pub fn ensure_dir(path: &Path) -> Result<(), FileOperationError> {
    if path.exists() && !path.is_dir() {
        return Err(FileOperationError::new(
            FileOperation::CreateDir,
            path,
            "creating directory",
            "utils::fs::ensure_dir",
            io::Error::new(io::ErrorKind::AlreadyExists, "path exists but is not a directory"),
        ));
    }
    fs::create_dir_all(path).with_file_context(
        FileOperation::CreateDir,
        path,
        "creating directory",
        "utils::fs::ensure_dir",
    )
}

/// Copies `source` to `dest`, replacing any existing file at `dest`.
///
/// The parent directory of `dest` is created when missing. Returns the number
/// of bytes copied.
pub async fn copy_file(source: &Path, dest: &Path) -> Result<u64, FileOperationError> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await.with_file_context(
            FileOperation::CreateDir,
            parent,
            "creating destination directory",
            "utils::fs::copy_file",
        )?;
    }

    tokio::fs::copy(source, dest)
        .await
        .with_file_context(FileOperation::Copy, source, "staging artifact", "utils::fs::copy_file")
        .map_err(|e| e.with_related_path(dest))
}
