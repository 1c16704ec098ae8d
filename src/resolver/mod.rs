//! Dependency resolution for a staging run.
//!
//! The [`ResolutionDriver`] turns a [`ProjectModel`] into the list of
//! artifacts to stage. Feature sets are aggregator artifacts whose own direct
//! dependencies are staged as if the project declared them itself, so the
//! driver looks one level past what the project's own resolution computed.
//!
//! # Algorithm
//!
//! 1. For every project artifact whose groupId is a feature-set group, read
//!    its dependency descriptor from the repository.
//! 2. Union the declarations; a declaration seen twice counts once.
//! 3. Keep the declarations whose scope passes the [`ScopeFilter`]; they
//!    become artifact requests.
//! 4. Walk the project's directly declared dependencies, skipping feature-set
//!    groups and scopes the filter rejects; the rest become requests too.
//! 5. Resolve every request in one batched repository call.
//!
//! Requests are deduplicated by coordinate; the scope of the first request
//! for a coordinate is kept. The resolved list is sorted by coordinate so that
//! staging and its log output are deterministic.
//!
//! # Errors
//!
//! There is no partial success: a failed descriptor read
//! ([`StageError::DescriptorRead`]) or a failed batch
//! ([`StageError::Resolution`]) fails the whole run.
//!
//! # Example
//!
//! ```rust,no_run
//! use depstage::filter::{EmptyIncludeScope, ScopeFilter};
//! use depstage::project::ProjectModel;
//! use depstage::repository::MavenRepository;
//! use depstage::resolver::ResolutionDriver;
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repository = MavenRepository::new("/home/me/.m2/repository", vec![], true);
//! let project = ProjectModel::load(Path::new("pom.xml"), &repository).await?;
//!
//! let scopes = ScopeFilter::from_config("compile", "test,system", EmptyIncludeScope::None);
//! let driver = ResolutionDriver::new(&repository, vec!["org.glassfish.main".to_string()], scopes);
//! let resolved = driver.resolve(&project).await?;
//! # Ok(())
//! # }
//! ```

use crate::coordinate::{ArtifactCoordinate, ArtifactRequest, DependencyDeclaration, ResolvedDependency};
use crate::core::StageError;
use crate::filter::ScopeFilter;
use crate::project::ProjectModel;
use crate::repository::RepositoryService;
use std::collections::HashSet;
use tracing::{debug, info};

/// Collects and resolves the artifacts of a staging run.
#[derive(Debug)]
pub struct ResolutionDriver<'a, R: RepositoryService> {
    repository: &'a R,
    feature_set_group_ids: Vec<String>,
    scope_filter: ScopeFilter,
}

impl<'a, R: RepositoryService> ResolutionDriver<'a, R> {
    pub fn new(repository: &'a R, feature_set_group_ids: Vec<String>, scope_filter: ScopeFilter) -> Self {
        Self {
            repository,
            feature_set_group_ids,
            scope_filter,
        }
    }

    fn is_feature_set_group(&self, group_id: &str) -> bool {
        self.feature_set_group_ids.iter().any(|g| g == group_id)
    }

    /// Resolves the artifacts to stage, sorted by coordinate.
    ///
    /// # Errors
    ///
    /// Any descriptor or resolution failure.
    pub async fn resolve(&self, project: &ProjectModel) -> Result<Vec<ResolvedDependency>, StageError> {
        let requests = self.collect_requests(project).await?;
        if requests.is_empty() {
            info!("No dependencies to resolve");
            return Ok(Vec::new());
        }

        info!("Resolving {} artifact(s)", requests.len());
        let mut resolved = self.repository.resolve_artifacts(&requests).await?;
        resolved.sort_by(|a, b| a.artifact.cmp(&b.artifact));
        Ok(resolved)
    }

    /// Builds the batch of artifact requests without resolving it.
    ///
    /// # Errors
    ///
    /// [`StageError::DescriptorRead`] when a feature set's descriptor cannot
    /// be read.
    pub async fn collect_requests(&self, project: &ProjectModel) -> Result<Vec<ArtifactRequest>, StageError> {
        let declarations = self.feature_set_declarations(project).await?;

        let mut requests = RequestSet::default();
        for declaration in &declarations {
            if self.scope_filter.is_included(&declaration.scope) {
                requests.add(ArtifactRequest::from(declaration));
            } else {
                debug!("Skipping {} in scope {}", declaration.artifact, declaration.scope);
            }
        }

        for dependency in &project.dependencies {
            if self.is_feature_set_group(&dependency.artifact.group_id)
                || !self.scope_filter.is_included(&dependency.scope)
            {
                continue;
            }
            requests.add(ArtifactRequest::from(dependency));
        }

        Ok(requests.into_vec())
    }

    /// Direct dependencies of every feature-set artifact of the project.
    async fn feature_set_declarations(
        &self,
        project: &ProjectModel,
    ) -> Result<Vec<DependencyDeclaration>, StageError> {
        let mut seen = HashSet::new();
        let mut declarations = Vec::new();

        for artifact in &project.artifacts {
            if !self.is_feature_set_group(&artifact.artifact.group_id) {
                continue;
            }

            debug!("Reading dependencies of feature set {}", artifact.artifact);
            let declared = self.repository.read_dependency_descriptor(&artifact.artifact).await?;
            for declaration in declared {
                if seen.insert(declaration.clone()) {
                    declarations.push(declaration);
                }
            }
        }

        Ok(declarations)
    }
}

/// Insertion-ordered requests, unique by coordinate.
#[derive(Debug, Default)]
struct RequestSet {
    seen: HashSet<ArtifactCoordinate>,
    requests: Vec<ArtifactRequest>,
}

impl RequestSet {
    fn add(&mut self, request: ArtifactRequest) {
        if self.seen.insert(request.artifact.clone()) {
            self.requests.push(request);
        }
    }

    fn into_vec(self) -> Vec<ArtifactRequest> {
        self.requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::EmptyIncludeScope;
    use crate::test_utils::FakeRepository;

    const FEATURE_GROUP: &str = "org.glassfish.main.featuresets";

    fn coord(group_id: &str, artifact_id: &str) -> ArtifactCoordinate {
        ArtifactCoordinate::new(group_id, artifact_id, "1.0")
    }

    fn declared(group_id: &str, artifact_id: &str, scope: &str) -> DependencyDeclaration {
        DependencyDeclaration::new(coord(group_id, artifact_id)).with_scope(scope)
    }

    fn default_scopes() -> ScopeFilter {
        ScopeFilter::from_config("compile", "test,system", EmptyIncludeScope::None)
    }

    fn feature_set() -> ArtifactCoordinate {
        coord(FEATURE_GROUP, "web").with_extension("zip")
    }

    fn project() -> ProjectModel {
        ProjectModel::new(coord("org.example", "server"), "/project")
            .with_dependency(DependencyDeclaration::new(feature_set()))
            .with_dependency(declared("org.example", "direct", "compile"))
            .with_dependency(declared("org.example", "direct-test", "test"))
            .with_artifact(DependencyDeclaration::new(feature_set()))
            .with_artifact(declared("org.example", "direct", "compile"))
    }

    fn repository() -> FakeRepository {
        FakeRepository::new()
            .with_descriptor(
                &feature_set(),
                vec![
                    declared("org.glassfish", "web-core", "compile"),
                    declared("org.glassfish", "web-test", "test"),
                    declared("org.glassfish", "a-first", "compile"),
                    declared("org.glassfish", "web-core", "compile"),
                ],
            )
            .with_file(&coord("org.glassfish", "web-core"), "/repo/web-core-1.0.jar")
            .with_file(&coord("org.glassfish", "a-first"), "/repo/a-first-1.0.jar")
            .with_file(&coord("org.example", "direct"), "/repo/direct-1.0.jar")
    }

    fn request_ids(requests: &[ArtifactRequest]) -> Vec<String> {
        requests.iter().map(|r| r.artifact.to_string()).collect()
    }

    #[tokio::test]
    async fn test_collects_feature_set_and_direct_requests() {
        let repo = repository();
        let driver = ResolutionDriver::new(&repo, vec![FEATURE_GROUP.to_string()], default_scopes());

        let requests = driver.collect_requests(&project()).await.unwrap();

        assert_eq!(
            request_ids(&requests),
            vec![
                "org.glassfish:web-core:jar:1.0",
                "org.glassfish:a-first:jar:1.0",
                "org.example:direct:jar:1.0"
            ]
        );
        assert_eq!(repo.descriptor_reads(), vec![feature_set()]);
    }

    #[tokio::test]
    async fn test_resolve_is_one_batch_sorted_by_coordinate() {
        let repo = repository();
        let driver = ResolutionDriver::new(&repo, vec![FEATURE_GROUP.to_string()], default_scopes());

        let resolved = driver.resolve(&project()).await.unwrap();

        assert_eq!(repo.resolve_calls().len(), 1);
        let ids: Vec<String> = resolved.iter().map(|r| r.artifact.artifact_id.clone()).collect();
        assert_eq!(ids, vec!["direct", "a-first", "web-core"]);
    }

    #[tokio::test]
    async fn test_without_feature_set_groups_only_direct_dependencies() {
        let repo = repository();
        let driver = ResolutionDriver::new(&repo, vec![], default_scopes());

        let requests = driver.collect_requests(&project()).await.unwrap();

        // The feature set itself is a direct compile dependency now
        assert_eq!(
            request_ids(&requests),
            vec!["org.glassfish.main.featuresets:web:zip:1.0", "org.example:direct:jar:1.0"]
        );
        assert!(repo.descriptor_reads().is_empty());
    }

    #[tokio::test]
    async fn test_descriptor_failure_is_fatal() {
        let repo = FakeRepository::new();
        let driver = ResolutionDriver::new(&repo, vec![FEATURE_GROUP.to_string()], default_scopes());

        let err = driver.resolve(&project()).await.unwrap_err();

        assert!(matches!(err, StageError::DescriptorRead { .. }));
        assert!(repo.resolve_calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolution_failure_is_fatal() {
        let repo = FakeRepository::new().with_descriptor(&feature_set(), vec![]);
        let driver = ResolutionDriver::new(&repo, vec![FEATURE_GROUP.to_string()], default_scopes());

        let err = driver.resolve(&project()).await.unwrap_err();

        match err {
            StageError::Resolution { artifacts, .. } => {
                assert_eq!(artifacts, vec!["org.example:direct:jar:1.0"]);
            }
            other => panic!("expected Resolution, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_include_scope_policies() {
        let repo = repository();

        let none = ScopeFilter::from_config("", "test,system", EmptyIncludeScope::None);
        let driver = ResolutionDriver::new(&repo, vec![FEATURE_GROUP.to_string()], none);
        assert!(driver.collect_requests(&project()).await.unwrap().is_empty());

        let all = ScopeFilter::from_config("", "system", EmptyIncludeScope::All);
        let driver = ResolutionDriver::new(&repo, vec![FEATURE_GROUP.to_string()], all);
        let requests = driver.collect_requests(&project()).await.unwrap();
        assert_eq!(
            request_ids(&requests),
            vec![
                "org.glassfish:web-core:jar:1.0",
                "org.glassfish:web-test:jar:1.0",
                "org.glassfish:a-first:jar:1.0",
                "org.example:direct:jar:1.0",
                "org.example:direct-test:jar:1.0"
            ]
        );
    }

    #[tokio::test]
    async fn test_first_scope_wins_for_duplicate_coordinates() {
        let repo = FakeRepository::new().with_descriptor(
            &feature_set(),
            vec![declared("org.example", "shared", "provided")],
        );
        let scopes = ScopeFilter::from_config("compile,provided", "", EmptyIncludeScope::None);
        let driver = ResolutionDriver::new(&repo, vec![FEATURE_GROUP.to_string()], scopes);
        let project = ProjectModel::new(coord("org.example", "server"), "/project")
            .with_artifact(DependencyDeclaration::new(feature_set()))
            .with_dependency(declared("org.example", "shared", "compile"));

        let requests = driver.collect_requests(&project).await.unwrap();

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].scope, "provided");
    }

    #[tokio::test]
    async fn test_artifact_without_file_is_passed_through() {
        let repo = FakeRepository::new().with_unresolved_file(&coord("org.example", "direct"));
        let driver = ResolutionDriver::new(&repo, vec![], default_scopes());
        let project = ProjectModel::new(coord("org.example", "server"), "/project")
            .with_dependency(declared("org.example", "direct", "compile"));

        let resolved = driver.resolve(&project).await.unwrap();

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].file, None);
    }

    #[tokio::test]
    async fn test_no_requests_skips_resolution() {
        let repo = FakeRepository::new();
        let driver = ResolutionDriver::new(&repo, vec![], default_scopes());
        let project = ProjectModel::new(coord("org.example", "empty"), "/project");

        assert!(driver.resolve(&project).await.unwrap().is_empty());
        assert!(repo.resolve_calls().is_empty());
    }
}
