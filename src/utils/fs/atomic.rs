//! Atomic file writes.

use crate::core::{FileOperation, FileOperationError, FileResultExt};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes `content` to a `.part` sibling of `path`, syncs it and renames it
/// over `path`.
///
/// Readers never observe a partially written file; a crash leaves at most a
/// stale `.part` file behind.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), FileOperationError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_file_context(
            FileOperation::CreateDir,
            parent,
            "creating parent directory",
            "utils::fs::atomic_write",
        )?;
    }

    let temp_path = part_path(path);

    {
        let mut file = std::fs::File::create(&temp_path).with_file_context(
            FileOperation::Write,
            &temp_path,
            "creating temporary file",
            "utils::fs::atomic_write",
        )?;

        file.write_all(content).with_file_context(
            FileOperation::Write,
            &temp_path,
            "writing temporary file",
            "utils::fs::atomic_write",
        )?;

        file.sync_all().with_file_context(
            FileOperation::Write,
            &temp_path,
            "syncing temporary file",
            "utils::fs::atomic_write",
        )?;
    }

    std::fs::rename(&temp_path, path)
        .with_file_context(FileOperation::Rename, &temp_path, "moving into place", "utils::fs::atomic_write")
        .map_err(|e| e.with_related_path(path))
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}
