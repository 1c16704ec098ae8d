//! Shared plumbing for the CLI commands.

use crate::cli::CliConfig;
use crate::config::Config;
use crate::constants::PROJECT_FILE_NAME;
use crate::coordinate::ResolvedDependency;
use crate::project::ProjectModel;
use crate::repository::MavenRepository;
use crate::resolver::ResolutionDriver;
use crate::stager::StageSettings;
use crate::utils::find_project_root;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Common trait for CLI commands.
///
/// `execute` finds the project and loads its configuration, then hands the
/// prepared [`CommandContext`] to `execute_with_context`.
pub trait CommandExecutor: Sized {
    /// Executes the command for the project selected by `config`.
    fn execute(self, config: CliConfig) -> impl std::future::Future<Output = Result<()>> + Send
    where
        Self: Send,
    {
        async move {
            let pom_path = locate_pom(config.project.as_deref())?;
            let context = CommandContext::load(&pom_path, config.config_path.as_deref(), &config.properties)?;
            self.execute_with_context(context).await
        }
    }

    /// Executes the command with a prepared context.
    fn execute_with_context(self, context: CommandContext)
    -> impl std::future::Future<Output = Result<()>> + Send;
}

/// The project and configuration a command works on.
#[derive(Debug)]
pub struct CommandContext {
    /// The project `pom.xml`.
    pub pom_path: PathBuf,

    /// Directory containing the project `pom.xml`.
    pub project_dir: PathBuf,

    /// Configuration with command-line overrides applied.
    pub config: Config,
}

impl CommandContext {
    /// Loads the configuration for the project at `pom_path`.
    ///
    /// # Errors
    ///
    /// Fails when the POM does not exist, the configuration file cannot be
    /// loaded, or an override is invalid.
    pub fn load(pom_path: &Path, config_path: Option<&Path>, properties: &[String]) -> Result<Self> {
        if !pom_path.is_file() {
            return Err(anyhow::anyhow!("Project file {} not found", pom_path.display()));
        }

        let project_dir = pom_path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Invalid project path {}", pom_path.display()))?
            .to_path_buf();

        let mut config = Config::load_with_optional(config_path, &project_dir)?;
        config.apply_properties(properties)?;

        Ok(Self {
            pom_path: pom_path.to_path_buf(),
            project_dir,
            config,
        })
    }

    /// Validated stager settings.
    ///
    /// # Errors
    ///
    /// Any configuration error of [`Config::to_settings`].
    pub fn settings(&self) -> Result<StageSettings> {
        Ok(self.config.to_settings(&self.project_dir)?)
    }

    pub fn repository(&self) -> MavenRepository {
        self.config.repository()
    }

    /// Loads the project model and resolves the artifacts to stage.
    ///
    /// # Errors
    ///
    /// Fails when the project cannot be loaded or resolution fails.
    pub async fn resolve(&self, repository: &MavenRepository) -> Result<(ProjectModel, Vec<ResolvedDependency>)> {
        let project = ProjectModel::load(&self.pom_path, repository)
            .await
            .with_context(|| format!("Failed to load project {}", self.pom_path.display()))?;
        debug!(
            "Local repository {}{}",
            repository.local().display(),
            if repository.is_offline() { " (offline)" } else { "" }
        );

        let driver = ResolutionDriver::new(
            repository,
            self.config.stage.featureset_groupids.clone(),
            self.config.scope_filter(),
        );
        let resolved = driver.resolve(&project).await?;
        Ok((project, resolved))
    }
}

/// Finds the project `pom.xml`.
///
/// `project` may name the POM or its directory. Without it the nearest
/// directory from the current one upwards holding a `pom.xml` is used.
///
/// # Errors
///
/// Fails when no project file can be found.
pub fn locate_pom(project: Option<&Path>) -> Result<PathBuf> {
    match project {
        Some(path) if path.is_dir() => Ok(path.join(PROJECT_FILE_NAME)),
        Some(path) => Ok(path.to_path_buf()),
        None => {
            let cwd = std::env::current_dir().context("Failed to determine the current directory")?;
            Ok(find_project_root(&cwd)?.join(PROJECT_FILE_NAME))
        }
    }
}
