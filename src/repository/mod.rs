//! Artifact repository access.
//!
//! The resolution driver talks to repositories through [`RepositoryService`],
//! which offers the two operations a staging run needs: reading the dependency
//! descriptor (POM) of an artifact, and resolving a batch of artifacts to
//! files on disk.
//!
//! [`MavenRepository`] is the production implementation. It looks artifacts up
//! in a local repository laid out the Maven way and, unless offline, downloads
//! missing ones from the configured remotes in order. Downloads are written
//! atomically so an interrupted run never leaves a truncated artifact behind.
//!
//! # Example
//!
//! ```rust,no_run
//! use depstage::coordinate::ArtifactCoordinate;
//! use depstage::repository::{MavenRepository, RemoteRepository, RepositoryService};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repo = MavenRepository::new("/home/me/.m2/repository", vec![RemoteRepository::central()], false);
//! let feature_set = ArtifactCoordinate::new("org.glassfish.main", "nucleus-web", "7.0.0");
//! let declared = repo.read_dependency_descriptor(&feature_set).await?;
//! println!("{} declared dependencies", declared.len());
//! # Ok(())
//! # }
//! ```

pub mod layout;
pub mod pom;

use crate::constants::{MAVEN_CENTRAL_ID, MAVEN_CENTRAL_URL, MAX_PARENT_DEPTH, PROJECT_FILE_NAME};
use crate::coordinate::{ArtifactCoordinate, ArtifactRequest, DependencyDeclaration, ResolvedDependency};
use crate::core::StageError;
use crate::utils::atomic_write;
use pom::{EffectivePom, RawPom};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Repository operations used by a staging run.
pub trait RepositoryService {
    /// Reads the dependencies declared by `artifact`'s POM.
    ///
    /// Only direct declarations are returned, in declaration order, without
    /// filtering by scope or optionality.
    ///
    /// # Errors
    ///
    /// [`StageError::DescriptorRead`] when the POM is missing or invalid.
    fn read_dependency_descriptor(
        &self,
        artifact: &ArtifactCoordinate,
    ) -> impl Future<Output = Result<Vec<DependencyDeclaration>, StageError>> + Send;

    /// Resolves every request to a local file.
    ///
    /// The result holds one entry per request, in request order, carrying the
    /// request's scope.
    ///
    /// # Errors
    ///
    /// [`StageError::Resolution`] naming every artifact that could not be
    /// found; nothing is returned when any request fails.
    fn resolve_artifacts(
        &self,
        requests: &[ArtifactRequest],
    ) -> impl Future<Output = Result<Vec<ResolvedDependency>, StageError>> + Send;
}

/// A remote repository in the Maven layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepository {
    pub id: String,
    pub url: String,
}

impl RemoteRepository {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }

    /// Maven Central.
    pub fn central() -> Self {
        Self::new(MAVEN_CENTRAL_ID, MAVEN_CENTRAL_URL)
    }

    fn artifact_url(&self, artifact: &ArtifactCoordinate) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), layout::url_path(artifact))
    }
}

/// Local Maven repository backed by zero or more remotes.
#[derive(Debug)]
pub struct MavenRepository {
    local: PathBuf,
    remotes: Vec<RemoteRepository>,
    offline: bool,
    client: reqwest::Client,
    descriptors: Mutex<HashMap<ArtifactCoordinate, EffectivePom>>,
}

impl MavenRepository {
    pub fn new(local: impl Into<PathBuf>, remotes: Vec<RemoteRepository>, offline: bool) -> Self {
        Self {
            local: local.into(),
            remotes,
            offline,
            client: reqwest::Client::new(),
            descriptors: Mutex::new(HashMap::new()),
        }
    }

    pub fn local(&self) -> &Path {
        &self.local
    }

    pub const fn is_offline(&self) -> bool {
        self.offline
    }

    /// Where `artifact` lives in the local repository.
    pub fn local_path(&self, artifact: &ArtifactCoordinate) -> PathBuf {
        self.local.join(layout::relative_path(artifact))
    }

    /// Returns the local file of `artifact`, downloading it first when it is
    /// missing. `Ok(None)` means no repository has it.
    ///
    /// # Errors
    ///
    /// [`StageError::Network`] when a remote answers with anything but the
    /// file or a 404, or when the download cannot be stored.
    pub async fn ensure_local(
        &self,
        artifact: &ArtifactCoordinate,
    ) -> Result<Option<PathBuf>, StageError> {
        let path = self.local_path(artifact);
        if path.is_file() {
            return Ok(Some(path));
        }
        if self.offline {
            debug!("Offline, not downloading {}", artifact);
            return Ok(None);
        }

        for remote in &self.remotes {
            let url = remote.artifact_url(artifact);
            if let Some(bytes) = self.fetch(&url).await? {
                info!("Downloaded {} from {}", artifact, remote.id);
                atomic_write(&path, &bytes).map_err(|e| StageError::Network {
                    url: url.clone(),
                    reason: e.user_message(),
                })?;
                return Ok(Some(path));
            }
        }

        Ok(None)
    }

    async fn fetch(&self, url: &str) -> Result<Option<Vec<u8>>, StageError> {
        let network_error = |reason: String| StageError::Network {
            url: url.to_string(),
            reason,
        };

        debug!("Fetching {}", url);
        let response = self.client.get(url).send().await.map_err(|e| network_error(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(network_error(format!("HTTP {status}")));
        }

        let bytes = response.bytes().await.map_err(|e| network_error(e.to_string()))?;
        Ok(Some(bytes.to_vec()))
    }

    /// Loads the POM of `artifact` from the repository and walks its parents.
    async fn load_effective(&self, artifact: &ArtifactCoordinate) -> Result<EffectivePom, StageError> {
        let pom = artifact.pom();
        let cached = self.descriptors.lock().ok().and_then(|cache| cache.get(&pom).cloned());
        if let Some(effective) = cached {
            return Ok(effective);
        }

        let path = self.ensure_local(&pom).await?.ok_or_else(|| StageError::Resolution {
            artifacts: vec![pom.to_string()],
            reason: "POM not found".to_string(),
        })?;
        let raw = RawPom::read(&path)?;
        let chain = self.parent_chain(raw, None).await?;
        let effective = EffectivePom::build(&chain)?;

        if let Ok(mut cache) = self.descriptors.lock() {
            cache.insert(pom, effective.clone());
        }
        Ok(effective)
    }

    /// Reads a project POM from disk, resolving parents through
    /// `<relativePath>` first and the repository second.
    ///
    /// # Errors
    ///
    /// [`StageError::PomParse`] for an unreadable or invalid POM, or any error
    /// from fetching a parent.
    pub async fn read_project(&self, pom_path: &Path) -> Result<EffectivePom, StageError> {
        let raw = RawPom::read(pom_path)?;
        let chain = self.parent_chain(raw, pom_path.parent()).await?;
        EffectivePom::build(&chain)
    }

    async fn parent_chain(&self, pom: RawPom, base_dir: Option<&Path>) -> Result<Vec<RawPom>, StageError> {
        let mut base_dir = base_dir.map(Path::to_path_buf);
        let mut chain = vec![pom];

        while let Some(parent) = chain.last().and_then(|p| p.parent.clone()) {
            if chain.len() > MAX_PARENT_DEPTH {
                return Err(StageError::PomParse {
                    path: chain[0].source.clone(),
                    reason: format!("parent chain deeper than {MAX_PARENT_DEPTH}"),
                });
            }

            let on_disk = base_dir
                .as_deref()
                .zip(parent.relative_path.as_deref())
                .map(|(dir, relative)| relative_parent_path(dir, relative))
                .filter(|path| path.is_file())
                .and_then(|path| RawPom::read(&path).ok())
                .filter(|raw| raw.artifact_id == parent.artifact_id);

            let raw = match on_disk {
                Some(raw) => {
                    base_dir = raw.source.parent().map(Path::to_path_buf);
                    raw
                }
                None => {
                    base_dir = None;
                    let coordinate = parent.coordinate();
                    let path = self.ensure_local(&coordinate).await?.ok_or_else(|| {
                        StageError::Resolution {
                            artifacts: vec![coordinate.to_string()],
                            reason: "parent POM not found".to_string(),
                        }
                    })?;
                    RawPom::read(&path)?
                }
            };
            chain.push(raw);
        }

        Ok(chain)
    }

    fn describe_remotes(&self) -> String {
        if self.offline {
            format!("not found in {} (offline)", self.local.display())
        } else if self.remotes.is_empty() {
            format!("not found in {}", self.local.display())
        } else {
            let ids: Vec<&str> = self.remotes.iter().map(|r| r.id.as_str()).collect();
            format!("not found in {} or remotes [{}]", self.local.display(), ids.join(", "))
        }
    }
}

fn relative_parent_path(base_dir: &Path, relative_path: &str) -> PathBuf {
    let path = base_dir.join(relative_path);
    if path.is_dir() { path.join(PROJECT_FILE_NAME) } else { path }
}

impl RepositoryService for MavenRepository {
    async fn read_dependency_descriptor(
        &self,
        artifact: &ArtifactCoordinate,
    ) -> Result<Vec<DependencyDeclaration>, StageError> {
        self.load_effective(artifact)
            .await
            .map(|effective| effective.dependencies)
            .map_err(|e| StageError::DescriptorRead {
                artifact: artifact.to_string(),
                reason: e.to_string(),
            })
    }

    async fn resolve_artifacts(
        &self,
        requests: &[ArtifactRequest],
    ) -> Result<Vec<ResolvedDependency>, StageError> {
        let mut resolved = Vec::with_capacity(requests.len());
        let mut missing = Vec::new();

        for request in requests {
            match self.ensure_local(&request.artifact).await {
                Ok(Some(file)) => resolved.push(ResolvedDependency::new(
                    request.artifact.clone(),
                    Some(file),
                    request.scope.clone(),
                )),
                Ok(None) => missing.push(request.artifact.to_string()),
                Err(e) => {
                    return Err(StageError::Resolution {
                        artifacts: vec![request.artifact.to_string()],
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !missing.is_empty() {
            return Err(StageError::Resolution {
                artifacts: missing,
                reason: self.describe_remotes(),
            });
        }

        debug!("Resolved {} artifact(s)", resolved.len());
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::LocalRepositoryBuilder;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_resolve_from_local_repository() {
        let temp = TempDir::new().unwrap();
        let local = LocalRepositoryBuilder::new(temp.path())
            .artifact("org.example", "lib-a", "1.0", "jar", "A")
            .artifact("org.example", "dist", "1.0", "zip", "Z");
        let repo = MavenRepository::new(local.root(), vec![], true);

        let requests = vec![
            ArtifactRequest::new(ArtifactCoordinate::new("org.example", "lib-a", "1.0"), "compile"),
            ArtifactRequest::new(
                ArtifactCoordinate::new("org.example", "dist", "1.0").with_extension("zip"),
                "provided",
            ),
        ];
        let resolved = repo.resolve_artifacts(&requests).await.unwrap();

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].file_name().as_deref(), Some("lib-a-1.0.jar"));
        assert_eq!(resolved[1].scope, "provided");
        assert!(resolved[1].file.as_ref().unwrap().is_file());
    }

    #[tokio::test]
    async fn test_resolve_reports_all_missing_artifacts() {
        let temp = TempDir::new().unwrap();
        let local = LocalRepositoryBuilder::new(temp.path()).artifact("g", "present", "1", "jar", "x");
        let repo = MavenRepository::new(local.root(), vec![RemoteRepository::central()], true);

        let requests = vec![
            ArtifactRequest::new(ArtifactCoordinate::new("g", "missing-one", "1"), "compile"),
            ArtifactRequest::new(ArtifactCoordinate::new("g", "present", "1"), "compile"),
            ArtifactRequest::new(ArtifactCoordinate::new("g", "missing-two", "1"), "compile"),
        ];
        let err = repo.resolve_artifacts(&requests).await.unwrap_err();

        match err {
            StageError::Resolution { artifacts, reason } => {
                assert_eq!(artifacts, vec!["g:missing-one:jar:1", "g:missing-two:jar:1"]);
                assert!(reason.contains("offline"));
            }
            other => panic!("expected Resolution, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_dependency_descriptor_with_parent() {
        let temp = TempDir::new().unwrap();
        let local = LocalRepositoryBuilder::new(temp.path())
            .pom(
                "org.example",
                "parent",
                "2.0",
                r"<project>
  <groupId>org.example</groupId><artifactId>parent</artifactId><version>2.0</version>
  <packaging>pom</packaging>
  <properties><lib.version>3.1</lib.version></properties>
</project>",
            )
            .pom(
                "org.example",
                "feature",
                "2.0",
                r"<project>
  <parent><groupId>org.example</groupId><artifactId>parent</artifactId><version>2.0</version></parent>
  <artifactId>feature</artifactId>
  <dependencies>
    <dependency><groupId>org.example</groupId><artifactId>lib</artifactId><version>${lib.version}</version></dependency>
  </dependencies>
</project>",
            );
        let repo = MavenRepository::new(local.root(), vec![], true);

        let declared = repo
            .read_dependency_descriptor(&ArtifactCoordinate::new("org.example", "feature", "2.0"))
            .await
            .unwrap();

        assert_eq!(declared.len(), 1);
        assert_eq!(declared[0].artifact.to_string(), "org.example:lib:jar:3.1");
    }

    #[tokio::test]
    async fn test_missing_descriptor_is_descriptor_read_error() {
        let temp = TempDir::new().unwrap();
        let repo = MavenRepository::new(temp.path(), vec![], true);

        let err = repo
            .read_dependency_descriptor(&ArtifactCoordinate::new("g", "nope", "1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::DescriptorRead { .. }));
        assert!(err.to_string().contains("g:nope"));
    }

    #[tokio::test]
    async fn test_read_project_uses_relative_parent() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("pom.xml"),
            r"<project>
  <groupId>org.example</groupId><artifactId>root</artifactId><version>5</version>
  <packaging>pom</packaging>
</project>",
        )
        .unwrap();
        let module = temp.path().join("module");
        std::fs::create_dir_all(&module).unwrap();
        std::fs::write(
            module.join("pom.xml"),
            r"<project>
  <parent><groupId>org.example</groupId><artifactId>root</artifactId><version>5</version></parent>
  <artifactId>module</artifactId>
</project>",
        )
        .unwrap();

        let repo = MavenRepository::new(temp.path().join("empty-repo"), vec![], true);
        let effective = repo.read_project(&module.join("pom.xml")).await.unwrap();

        assert_eq!(effective.coordinate.to_string(), "org.example:module:jar:5");
    }

    #[tokio::test]
    async fn test_read_project_with_empty_relative_path_skips_disk() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("pom.xml"),
            r"<project>
  <groupId>org.example</groupId><artifactId>root</artifactId><version>5</version>
  <packaging>pom</packaging>
</project>",
        )
        .unwrap();
        let module = temp.path().join("module");
        std::fs::create_dir_all(&module).unwrap();
        std::fs::write(
            module.join("pom.xml"),
            r"<project>
  <parent>
    <groupId>org.example</groupId><artifactId>root</artifactId><version>5</version>
    <relativePath/>
  </parent>
  <artifactId>module</artifactId>
</project>",
        )
        .unwrap();

        let repo = MavenRepository::new(temp.path().join("empty-repo"), vec![], true);
        let err = repo.read_project(&module.join("pom.xml")).await.unwrap_err();

        match err {
            StageError::Resolution { artifacts, .. } => {
                assert_eq!(artifacts, vec!["org.example:root:pom:5"]);
            }
            other => panic!("expected Resolution, got {other:?}"),
        }
    }

    #[test]
    fn test_artifact_url() {
        let remote = RemoteRepository::new("mirror", "https://repo.example.com/maven2/");
        let coord = ArtifactCoordinate::new("org.example", "a", "1");
        assert_eq!(
            remote.artifact_url(&coord),
            "https://repo.example.com/maven2/org/example/a/1/a-1.jar"
        );
    }
}
