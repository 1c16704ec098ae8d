//! Materialising resolved dependencies in the stage directory.
//!
//! Every resolved dependency gets exactly one [`StagingAction`]:
//!
//! | condition | action |
//! |-----------|--------|
//! | no resolved file | skip, logged at error level |
//! | empty file name | skip, logged at info level |
//! | extension in `copy-types` and not in `copy-excludes` | copy to `<stage>/<name>.<extension>` |
//! | extension in `unpack-types` and not in `unpack-excludes` | unpack into `<stage>/<name>/` |
//! | anything else | skip silently |
//!
//! Copy is checked first, so a dependency matching both type lists is copied.
//! `<name>` comes from the [`NameMapper`].
//!
//! # Failure handling
//!
//! A failed copy is logged, recorded in the [`StageReport`] and the pass
//! moves on. A failed extraction aborts the pass. Nothing is rolled back:
//! files staged before a failure stay in place, and outputs of earlier runs
//! are never removed.

use crate::archive::{ArchiveError, ArchiveService};
use crate::coordinate::{ArtifactCoordinate, ResolvedDependency};
use crate::core::StageError;
use crate::exclusion::ExclusionPattern;
use crate::filter::is_actionable;
use crate::mapping::NameMapper;
use crate::pattern::EntrySelector;
use crate::utils::{copy_file, ensure_dir, relative_display};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{error, info};

/// Validated settings of a staging pass.
#[derive(Debug, Clone, Default)]
pub struct StageSettings {
    pub stage_dir: PathBuf,
    /// Project base directory; log lines show paths relative to it.
    pub base_dir: PathBuf,
    pub copy_types: Vec<String>,
    pub copy_excludes: Vec<ExclusionPattern>,
    pub unpack_types: Vec<String>,
    pub unpack_excludes: Vec<ExclusionPattern>,
    pub selector: EntrySelector,
    pub mapper: NameMapper,
    pub skip: bool,
}

/// Why a dependency is not staged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    NoFile,
    EmptyFileName,
    NotActionable,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFile => write!(f, "no file"),
            Self::EmptyFileName => write!(f, "empty file name"),
            Self::NotActionable => write!(f, "not actionable"),
        }
    }
}

/// What happens to one resolved dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StagingAction {
    Copy { source: PathBuf, destination: PathBuf },
    Unpack { source: PathBuf, destination: PathBuf },
    Skip { reason: SkipReason },
}

/// A dependency with its decided action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedAction {
    pub artifact: ArtifactCoordinate,
    pub scope: String,
    pub action: StagingAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedEntry {
    pub artifact: ArtifactCoordinate,
    pub destination: PathBuf,
    /// Files written: 1 for a copy, the extracted count for an unpack.
    pub files: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub artifact: ArtifactCoordinate,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedEntry {
    pub artifact: ArtifactCoordinate,
    pub destination: PathBuf,
    pub error: String,
}

/// Outcome of a staging pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub copied: Vec<StagedEntry>,
    pub unpacked: Vec<StagedEntry>,
    pub skipped: Vec<SkippedEntry>,
    pub failed: Vec<FailedEntry>,
}

impl StageReport {
    pub fn is_empty(&self) -> bool {
        self.copied.is_empty() && self.unpacked.is_empty() && self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Applies [`StageSettings`] to resolved dependencies.
#[derive(Debug)]
pub struct Stager<'a, A: ArchiveService> {
    settings: &'a StageSettings,
    archiver: &'a A,
}

impl<'a, A: ArchiveService> Stager<'a, A> {
    pub const fn new(settings: &'a StageSettings, archiver: &'a A) -> Self {
        Self {
            settings,
            archiver,
        }
    }

    /// Decides the action for one dependency without touching the file
    /// system.
    pub fn decide(&self, dependency: &ResolvedDependency) -> StagingAction {
        let settings = self.settings;
        let Some(source) = &dependency.file else {
            return StagingAction::Skip {
                reason: SkipReason::NoFile,
            };
        };
        if dependency.file_name().is_none_or(|name| name.is_empty()) {
            return StagingAction::Skip {
                reason: SkipReason::EmptyFileName,
            };
        }

        let name = settings.mapper.map_name(&dependency.artifact);
        if is_actionable(dependency, &settings.copy_types, &settings.copy_excludes) {
            StagingAction::Copy {
                source: source.clone(),
                destination: settings
                    .stage_dir
                    .join(format!("{name}.{}", dependency.artifact.extension)),
            }
        } else if is_actionable(dependency, &settings.unpack_types, &settings.unpack_excludes) {
            StagingAction::Unpack {
                source: source.clone(),
                destination: settings.stage_dir.join(name),
            }
        } else {
            StagingAction::Skip {
                reason: SkipReason::NotActionable,
            }
        }
    }

    /// The action of every dependency, in input order.
    pub fn plan(&self, dependencies: &[ResolvedDependency]) -> Vec<PlannedAction> {
        dependencies
            .iter()
            .map(|dependency| PlannedAction {
                artifact: dependency.artifact.clone(),
                scope: dependency.scope.clone(),
                action: self.decide(dependency),
            })
            .collect()
    }

    /// Stages `dependencies` one after another.
    ///
    /// # Errors
    ///
    /// [`StageError::UnknownArchiveFormat`] or [`StageError::Extraction`] when
    /// an unpack fails, [`StageError::FileOperation`] when the stage directory
    /// cannot be created. Copy failures are not errors; they are listed in
    /// [`StageReport::failed`].
    pub async fn stage(&self, dependencies: &[ResolvedDependency]) -> Result<StageReport, StageError> {
        if self.settings.skip {
            info!("Skipping dependency staging");
            return Ok(StageReport::default());
        }

        ensure_dir(&self.settings.stage_dir)?;

        let mut report = StageReport::default();
        for planned in self.plan(dependencies) {
            let artifact = planned.artifact;
            match planned.action {
                StagingAction::Skip { reason } => {
                    match reason {
                        SkipReason::NoFile => error!("Dependency {}: file is missing", artifact),
                        SkipReason::EmptyFileName => info!("Dependency {}: empty file name", artifact),
                        SkipReason::NotActionable => {}
                    }
                    report.skipped.push(SkippedEntry { artifact, reason });
                }
                StagingAction::Copy { source, destination } => {
                    info!("Copying {} to {}", artifact, self.display(&destination));
                    match copy_file(&source, &destination).await {
                        Ok(_) => report.copied.push(StagedEntry {
                            artifact,
                            destination,
                            files: 1,
                        }),
                        Err(e) => {
                            error!("{}", e.user_message());
                            report.failed.push(FailedEntry {
                                artifact,
                                destination,
                                error: e.to_string(),
                            });
                        }
                    }
                }
                StagingAction::Unpack { source, destination } => {
                    info!("Unpacking {} to {}", artifact, self.display(&destination));
                    ensure_dir(&destination)?;
                    let files = self
                        .archiver
                        .extract(&source, &destination, &self.settings.selector)
                        .map_err(|e| match e {
                            ArchiveError::UnknownFormat { .. } => StageError::UnknownArchiveFormat {
                                file: source.clone(),
                            },
                            other => StageError::Extraction {
                                file: source.clone(),
                                dest: destination.clone(),
                                source: other,
                            },
                        })?;
                    report.unpacked.push(StagedEntry {
                        artifact,
                        destination,
                        files,
                    });
                }
            }
        }

        info!(
            "Staged {} copied, {} unpacked, {} skipped, {} failed",
            report.copied.len(),
            report.unpacked.len(),
            report.skipped.len(),
            report.failed.len()
        );
        Ok(report)
    }

    fn display(&self, path: &std::path::Path) -> String {
        relative_display(path, &self.settings.base_dir)
    }
}
