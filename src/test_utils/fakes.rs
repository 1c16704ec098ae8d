//! In-memory service implementations that record their calls.

use crate::archive::{ArchiveError, ArchiveService};
use crate::coordinate::{ArtifactCoordinate, ArtifactRequest, DependencyDeclaration, ResolvedDependency};
use crate::core::StageError;
use crate::pattern::EntrySelector;
use crate::repository::RepositoryService;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A repository answering from maps filled in by the test.
///
/// Descriptors are keyed by the artifact's POM coordinate, so a feature set
/// registered as `jar` is found when read as `zip`. Artifacts missing from
/// the file map fail resolution; artifacts mapped to `None` resolve without
/// a file.
#[derive(Debug, Default)]
pub struct FakeRepository {
    descriptors: HashMap<ArtifactCoordinate, Vec<DependencyDeclaration>>,
    files: HashMap<ArtifactCoordinate, Option<PathBuf>>,
    descriptor_reads: Mutex<Vec<ArtifactCoordinate>>,
    resolve_calls: Mutex<Vec<Vec<ArtifactRequest>>>,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_descriptor(mut self, artifact: &ArtifactCoordinate, declared: Vec<DependencyDeclaration>) -> Self {
        self.descriptors.insert(artifact.pom(), declared);
        self
    }

    pub fn with_file(mut self, artifact: &ArtifactCoordinate, file: impl Into<PathBuf>) -> Self {
        self.files.insert(artifact.clone(), Some(file.into()));
        self
    }

    /// Resolves `artifact` without a file.
    pub fn with_unresolved_file(mut self, artifact: &ArtifactCoordinate) -> Self {
        self.files.insert(artifact.clone(), None);
        self
    }

    /// Every coordinate passed to `read_dependency_descriptor`, in call order.
    pub fn descriptor_reads(&self) -> Vec<ArtifactCoordinate> {
        self.descriptor_reads.lock().map(|reads| reads.clone()).unwrap_or_default()
    }

    /// Every batch passed to `resolve_artifacts`, in call order.
    pub fn resolve_calls(&self) -> Vec<Vec<ArtifactRequest>> {
        self.resolve_calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

impl RepositoryService for FakeRepository {
    async fn read_dependency_descriptor(
        &self,
        artifact: &ArtifactCoordinate,
    ) -> Result<Vec<DependencyDeclaration>, StageError> {
        if let Ok(mut reads) = self.descriptor_reads.lock() {
            reads.push(artifact.clone());
        }
        self.descriptors.get(&artifact.pom()).cloned().ok_or_else(|| StageError::DescriptorRead {
            artifact: artifact.to_string(),
            reason: "no descriptor registered".to_string(),
        })
    }

    async fn resolve_artifacts(
        &self,
        requests: &[ArtifactRequest],
    ) -> Result<Vec<ResolvedDependency>, StageError> {
        if let Ok(mut calls) = self.resolve_calls.lock() {
            calls.push(requests.to_vec());
        }

        let missing: Vec<String> = requests
            .iter()
            .filter(|r| !self.files.contains_key(&r.artifact))
            .map(|r| r.artifact.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(StageError::Resolution {
                artifacts: missing,
                reason: "not registered".to_string(),
            });
        }

        Ok(requests
            .iter()
            .map(|r| {
                let file = self.files.get(&r.artifact).cloned().flatten();
                ResolvedDependency::new(r.artifact.clone(), file, r.scope.clone())
            })
            .collect())
    }
}

/// How a [`RecordingArchiver`] answers `extract`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArchiverBehavior {
    /// Record the call and report zero files.
    #[default]
    Succeed,
    /// Report an unknown archive format.
    UnknownFormat,
    /// Report an I/O failure.
    Fail,
}

/// One recorded `extract` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractCall {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub selector: String,
}

/// Archive service that records calls instead of extracting.
#[derive(Debug, Default)]
pub struct RecordingArchiver {
    behavior: ArchiverBehavior,
    calls: Mutex<Vec<ExtractCall>>,
}

impl RecordingArchiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: ArchiverBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::default(),
        }
    }

    pub fn calls(&self) -> Vec<ExtractCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

impl ArchiveService for RecordingArchiver {
    fn extract(&self, source: &Path, dest: &Path, selector: &EntrySelector) -> Result<usize, ArchiveError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(ExtractCall {
                source: source.to_path_buf(),
                dest: dest.to_path_buf(),
                selector: selector.to_string(),
            });
        }

        match self.behavior {
            ArchiverBehavior::Succeed => Ok(0),
            ArchiverBehavior::UnknownFormat => Err(ArchiveError::UnknownFormat {
                path: source.to_path_buf(),
            }),
            ArchiverBehavior::Fail => Err(ArchiveError::Io(std::io::Error::other("simulated failure"))),
        }
    }
}
