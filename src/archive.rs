//! Archive extraction for unpacked dependencies.
//!
//! The stager extracts archives through the [`ArchiveService`] trait so that
//! tests can observe the calls without real archives. [`ArchiveExtractor`] is
//! the production implementation; it picks the format from the file name:
//!
//! | file name | format |
//! |-----------|--------|
//! | `*.zip`, `*.jar`, `*.war`, `*.ear`, `*.rar`, `*.sar`, `*.har` | zip |
//! | `*.tar` | tar |
//! | `*.tar.gz`, `*.tgz` | gzip-compressed tar |
//!
//! Entries whose path is absolute or climbs out of the destination with `..`
//! are rejected to prevent zip-slip. Symlink and hard link entries of tar
//! archives are skipped, and tar entries are only written through
//! [`tar::Entry::unpack_in`], which refuses paths leading outside the
//! destination through links already on disk.

use crate::pattern::EntrySelector;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Extensions handled by the zip extractor.
const ZIP_EXTENSIONS: &[&str] = &["zip", "jar", "war", "ear", "rar", "sar", "har"];

/// Errors arising from archive extraction.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// No extractor handles the file name.
    #[error("unknown archive format: {}", path.display())]
    UnknownFormat {
        /// The archive path
        path: PathBuf,
    },

    /// I/O error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] io::Error),

    /// The zip container is malformed.
    #[error("invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry
        path: String,
    },
}

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
}

impl ArchiveFormat {
    /// Detects the format from the file name, case-insensitively.
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();

        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            return Some(Self::TarGz);
        }
        if name.ends_with(".tar") {
            return Some(Self::Tar);
        }

        let extension = Path::new(&name).extension()?.to_string_lossy().into_owned();
        ZIP_EXTENSIONS.contains(&extension.as_str()).then_some(Self::Zip)
    }
}

/// Trait for extracting archives, enabling test doubles.
pub trait ArchiveService {
    /// Extract the entries of `source` selected by `selector` into `dest`.
    ///
    /// Returns the number of files written.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::UnknownFormat`] if no extractor handles the
    /// file, any other variant if extraction started and failed.
    fn extract(
        &self,
        source: &Path,
        dest: &Path,
        selector: &EntrySelector,
    ) -> Result<usize, ArchiveError>;
}

/// Default extractor using the `zip`, `tar` and `flate2` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExtractor;

impl ArchiveService for ArchiveExtractor {
    fn extract(
        &self,
        source: &Path,
        dest: &Path,
        selector: &EntrySelector,
    ) -> Result<usize, ArchiveError> {
        let format = ArchiveFormat::detect(source).ok_or_else(|| ArchiveError::UnknownFormat {
            path: source.to_path_buf(),
        })?;

        debug!("Extracting {} ({:?}) to {}", source.display(), format, dest.display());

        let file = File::open(source)?;
        let count = match format {
            ArchiveFormat::Zip => extract_zip(file, dest, selector)?,
            ArchiveFormat::Tar => extract_tar(BufReader::new(file), dest, selector)?,
            ArchiveFormat::TarGz => {
                extract_tar(GzDecoder::new(BufReader::new(file)), dest, selector)?
            }
        };

        debug!("Extracted {} file(s) from {}", count, source.display());
        Ok(count)
    }
}

fn extract_zip(file: File, dest: &Path, selector: &EntrySelector) -> Result<usize, ArchiveError> {
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
    let mut extracted = 0;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let entry_path = PathBuf::from(entry.name());
        validate_entry_path(&entry_path)?;

        if !selector.is_selected(&entry_path) {
            continue;
        }

        let dest_path = dest.join(&entry_path);
        if entry.is_dir() {
            std::fs::create_dir_all(&dest_path)?;
            continue;
        }

        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&dest_path)?;
        io::copy(&mut entry, &mut out)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                let permissions = std::fs::Permissions::from_mode(mode & 0o777);
                std::fs::set_permissions(&dest_path, permissions)?;
            }
        }

        extracted += 1;
    }

    Ok(extracted)
}

fn extract_tar<R: io::Read>(
    reader: R,
    dest: &Path,
    selector: &EntrySelector,
) -> Result<usize, ArchiveError> {
    std::fs::create_dir_all(dest)?;
    let mut archive = tar::Archive::new(reader);
    let mut extracted = 0;

    for entry_result in archive.entries()? {
        let mut entry = entry_result?;
        let entry_path = entry.path()?.into_owned();
        validate_entry_path(&entry_path)?;

        if !selector.is_selected(&entry_path) {
            continue;
        }

        let entry_type = entry.header().entry_type();
        if entry_type.is_symlink() || entry_type.is_hard_link() {
            debug!("Skipping link entry {}", entry_path.display());
            continue;
        }

        if !entry.unpack_in(dest)? {
            return Err(ArchiveError::PathTraversal {
                path: entry_path.display().to_string(),
            });
        }
        if !entry_type.is_dir() {
            extracted += 1;
        }
    }

    Ok(extracted)
}

/// Validate that an entry path does not escape the destination directory
/// via `..` components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<(), ArchiveError> {
    let traversal = path.is_absolute()
        || path.components().any(|c| {
            matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
        });

    if traversal {
        return Err(ArchiveError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    Ok(())
}
