//! Artifact coordinates and the dependency records built from them.
//!
//! An [`ArtifactCoordinate`] identifies one file in a repository. The other
//! types wrap a coordinate with the information each stage of a run needs:
//!
//! - [`DependencyDeclaration`] - a dependency as written in a POM
//! - [`ArtifactRequest`] - a coordinate queued for batch resolution
//! - [`ResolvedDependency`] - a resolved coordinate with its local file
//!
//! Coordinates order by `groupId`, `artifactId`, `version`, `classifier` and
//! `extension`, which is the order resolved dependencies are staged in.

use crate::constants::scope;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Immutable `{groupId, artifactId, version, classifier, extension}` tuple.
///
/// An empty classifier means "no classifier".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub classifier: String,
    pub extension: String,
}

impl ArtifactCoordinate {
    /// Creates a `jar` coordinate without classifier.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifier: String::new(),
            extension: "jar".to_string(),
        }
    }

    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = classifier.into();
        self
    }

    /// The coordinate of this artifact's POM.
    #[must_use]
    pub fn pom(&self) -> Self {
        Self {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            version: self.version.clone(),
            classifier: String::new(),
            extension: "pom".to_string(),
        }
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.extension)?;
        if !self.classifier.is_empty() {
            write!(f, ":{}", self.classifier)?;
        }
        write!(f, ":{}", self.version)
    }
}

/// A dependency as declared in a POM, after type handling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DependencyDeclaration {
    pub artifact: ArtifactCoordinate,
    /// The declared packaging type, e.g. `test-jar` for a `jar` with classifier `tests`.
    #[serde(rename = "type")]
    pub type_name: String,
    pub scope: String,
    pub optional: bool,
}

impl DependencyDeclaration {
    /// A `compile` scoped, non-optional declaration of `artifact`.
    pub fn new(artifact: ArtifactCoordinate) -> Self {
        let type_name = artifact.extension.clone();
        Self {
            artifact,
            type_name,
            scope: scope::COMPILE.to_string(),
            optional: false,
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    #[must_use]
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }
}

/// A coordinate queued for resolution, with the scope it was requested under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactRequest {
    pub artifact: ArtifactCoordinate,
    pub scope: String,
}

impl ArtifactRequest {
    pub fn new(artifact: ArtifactCoordinate, scope: impl Into<String>) -> Self {
        Self {
            artifact,
            scope: scope.into(),
        }
    }
}

impl From<&DependencyDeclaration> for ArtifactRequest {
    fn from(declaration: &DependencyDeclaration) -> Self {
        Self::new(declaration.artifact.clone(), declaration.scope.clone())
    }
}

/// A coordinate after resolution.
///
/// `file` is `None` when resolution produced no file; the stager skips such
/// dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResolvedDependency {
    pub artifact: ArtifactCoordinate,
    pub file: Option<PathBuf>,
    pub scope: String,
}

impl ResolvedDependency {
    pub fn new(artifact: ArtifactCoordinate, file: Option<PathBuf>, scope: impl Into<String>) -> Self {
        Self {
            artifact,
            file,
            scope: scope.into(),
        }
    }

    /// File name of the resolved file, `None` when there is no file.
    pub fn file_name(&self) -> Option<String> {
        self.file.as_ref().map(|file| {
            file.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
        })
    }
}
