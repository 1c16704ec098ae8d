//! The project being staged.
//!
//! A [`ProjectModel`] carries what the resolution driver needs from the
//! project: its coordinate and base directory, the dependencies declared
//! directly in its POM, and the project artifacts, which are the
//! compile-resolution closure of those declarations.
//!
//! The closure follows Maven's compile resolution scope:
//!
//! - direct `compile`, `provided` and `system` dependencies are included,
//!   optional ones too
//! - transitively only `compile` dependencies are followed, and optional
//!   transitive dependencies are dropped
//! - a transitive dependency inherits the scope of the direct dependency it
//!   was reached through
//! - the declaration nearest to the project wins for each
//!   `groupId:artifactId:classifier:extension`
//!
//! Artifacts without a readable POM are kept without dependencies and a
//! warning is logged.

use crate::constants::scope;
use crate::coordinate::{ArtifactCoordinate, DependencyDeclaration};
use crate::core::StageError;
use crate::repository::{MavenRepository, RepositoryService};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Direct scopes taking part in compile resolution.
const COMPILE_RESOLUTION_SCOPES: &[&str] = &[scope::COMPILE, scope::PROVIDED, scope::SYSTEM];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectModel {
    pub coordinate: ArtifactCoordinate,
    /// Directory holding the project POM; log paths are relative to it.
    pub base_dir: PathBuf,
    /// Dependencies declared in the POM, in declaration order.
    pub dependencies: Vec<DependencyDeclaration>,
    /// Resolved project artifacts.
    pub artifacts: Vec<DependencyDeclaration>,
}

impl ProjectModel {
    pub fn new(coordinate: ArtifactCoordinate, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            coordinate,
            base_dir: base_dir.into(),
            dependencies: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_dependency(mut self, dependency: DependencyDeclaration) -> Self {
        self.dependencies.push(dependency);
        self
    }

    #[must_use]
    pub fn with_artifact(mut self, artifact: DependencyDeclaration) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// Loads the project from its POM.
    ///
    /// # Errors
    ///
    /// Fails when the POM or one of its parents cannot be read or is invalid.
    pub async fn load(pom_path: &Path, repository: &MavenRepository) -> Result<Self, StageError> {
        let effective = repository.read_project(pom_path).await?;
        let base_dir = pom_path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let mut project = Self::new(effective.coordinate, base_dir);
        project.dependencies = effective.dependencies;
        project.artifacts = compile_closure(&project.dependencies, repository).await;

        debug!(
            "Loaded project {} with {} declared dependencies and {} artifacts",
            project.coordinate,
            project.dependencies.len(),
            project.artifacts.len()
        );
        Ok(project)
    }
}

fn closure_key(artifact: &ArtifactCoordinate) -> String {
    format!(
        "{}:{}:{}:{}",
        artifact.group_id, artifact.artifact_id, artifact.classifier, artifact.extension
    )
}

/// Breadth-first compile-resolution closure of `direct`.
pub async fn compile_closure<R: RepositoryService>(
    direct: &[DependencyDeclaration],
    repository: &R,
) -> Vec<DependencyDeclaration> {
    let mut queue: VecDeque<DependencyDeclaration> = direct
        .iter()
        .filter(|dep| COMPILE_RESOLUTION_SCOPES.contains(&dep.scope.as_str()))
        .cloned()
        .collect();
    let mut seen = HashSet::new();
    let mut artifacts = Vec::new();

    while let Some(dependency) = queue.pop_front() {
        if !seen.insert(closure_key(&dependency.artifact)) {
            continue;
        }

        if dependency.scope != scope::SYSTEM {
            match repository.read_dependency_descriptor(&dependency.artifact).await {
                Ok(declared) => {
                    for child in declared {
                        if child.optional || child.scope != scope::COMPILE {
                            continue;
                        }
                        queue.push_back(child.with_scope(dependency.scope.clone()));
                    }
                }
                Err(e) => {
                    warn!("No dependency information for {}: {}", dependency.artifact, e);
                }
            }
        }

        artifacts.push(dependency);
    }

    artifacts
}
