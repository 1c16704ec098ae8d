//! Configuration of a staging run.
//!
//! Settings come from a TOML file with two tables:
//!
//! ```toml
//! [stage]
//! copy-types = "jar,war,rar"
//! unpack-types = "zip"
//! unpack-excludes = ["org.glassfish.main.admingui:console-plugins"]
//! includes = "glassfish7/**"
//! featureset-groupids = ["org.glassfish.main.featuresets"]
//! mappings = [{ artifact-id = "nucleus-web", name = "nucleus" }]
//!
//! [repository]
//! local = "~/.m2/repository"
//! offline = true
//! remotes = [{ id = "central", url = "https://repo.maven.apache.org/maven2" }]
//! ```
//!
//! # File location
//!
//! The first of these is used:
//!
//! 1. the path given with `--config`
//! 2. the path in the `DEPSTAGE_CONFIG` environment variable
//! 3. `depstage.toml` next to the project `pom.xml`
//!
//! An explicitly named file must exist. Without any file every key takes its
//! default.
//!
//! # Command-line overrides
//!
//! [`Config::apply_property`] sets one `[stage]` key from a `key=value` pair.
//! Keys are accepted in TOML form (`copy-types`), in camel case (`copyTypes`)
//! and with the `gfbuild.featuresets.dependencies.` prefix. List keys take
//! comma-separated values.

pub mod parser;

pub use parser::parse_config;

use crate::constants::{
    CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_BUILD_DIRECTORY, DEFAULT_COPY_TYPES, DEFAULT_EXCLUDE_SCOPE,
    DEFAULT_INCLUDE_SCOPE, DEFAULT_LOCAL_REPOSITORY, DEFAULT_STAGE_DIRECTORY_NAME, DEFAULT_UNPACK_TYPES,
    PROPERTY_PREFIX,
};
use crate::core::StageError;
use crate::exclusion::ExclusionPattern;
use crate::filter::{EmptyIncludeScope, ScopeFilter, split_list};
use crate::mapping::{NameMapper, NameMapping};
use crate::pattern::EntrySelector;
use crate::repository::{MavenRepository, RemoteRepository};
use crate::stager::StageSettings;
use crate::utils::expand_home;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Property alias kept from the plugin's `featureset.groupid.includes`.
const FEATURESET_GROUPIDS_ALIAS: &str = "featureset.groupid.includes";

/// Complete configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub stage: StageConfig,
    pub repository: RepositoryConfig,
}

/// The `[stage]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct StageConfig {
    /// Staging root; defaults to `<build-directory>/stage`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_directory: Option<String>,
    pub build_directory: String,
    pub copy_types: String,
    pub copy_excludes: Vec<String>,
    pub unpack_types: String,
    pub unpack_excludes: Vec<String>,
    pub includes: String,
    pub excludes: String,
    pub include_scope: String,
    pub exclude_scope: String,
    pub empty_include_scope: EmptyIncludeScope,
    pub featureset_groupids: Vec<String>,
    pub mappings: Vec<NameMapping>,
    pub skip: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            stage_directory: None,
            build_directory: DEFAULT_BUILD_DIRECTORY.to_string(),
            copy_types: DEFAULT_COPY_TYPES.to_string(),
            copy_excludes: Vec::new(),
            unpack_types: DEFAULT_UNPACK_TYPES.to_string(),
            unpack_excludes: Vec::new(),
            includes: String::new(),
            excludes: String::new(),
            include_scope: DEFAULT_INCLUDE_SCOPE.to_string(),
            exclude_scope: DEFAULT_EXCLUDE_SCOPE.to_string(),
            empty_include_scope: EmptyIncludeScope::default(),
            featureset_groupids: Vec::new(),
            mappings: Vec::new(),
            skip: false,
        }
    }
}

/// The `[repository]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Local repository root; defaults to `~/.m2/repository`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<String>,
    pub remotes: Vec<RemoteRepository>,
    pub offline: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            local: None,
            remotes: vec![RemoteRepository::central()],
            offline: false,
        }
    }
}

impl Config {
    /// Path of the configuration file to load, if any.
    ///
    /// `explicit` wins over the environment variable, which wins over the
    /// file next to the project. The project file is only returned when it
    /// exists.
    pub fn locate(explicit: Option<&Path>, project_dir: &Path) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(expand_home(&path));
            }
        }
        let default = project_dir.join(CONFIG_FILE_NAME);
        default.is_file().then_some(default)
    }

    /// Loads the configuration for the project in `project_dir`.
    ///
    /// # Errors
    ///
    /// Fails when an explicitly named file is missing or any file found is
    /// not a valid configuration.
    pub fn load_with_optional(explicit: Option<&Path>, project_dir: &Path) -> Result<Self> {
        match Self::locate(explicit, project_dir) {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                Ok(Self::default())
            }
        }
    }

    /// Loads the configuration from `path`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        parse_config(path)
    }

    /// Overrides one `[stage]` key.
    ///
    /// # Errors
    ///
    /// [`StageError::ConfigError`] for an unknown key, a key that cannot be
    /// set from the command line, or a value of the wrong kind.
    pub fn apply_property(&mut self, key: &str, value: &str) -> Result<(), StageError> {
        let name = normalize_key(key);
        let stage = &mut self.stage;
        match name.as_str() {
            "stage-directory" => stage.stage_directory = Some(value.to_string()),
            "build-directory" => stage.build_directory = value.to_string(),
            "copy-types" => stage.copy_types = value.to_string(),
            "copy-excludes" => stage.copy_excludes = split_list(value),
            "unpack-types" => stage.unpack_types = value.to_string(),
            "unpack-excludes" => stage.unpack_excludes = split_list(value),
            "includes" => stage.includes = value.to_string(),
            "excludes" => stage.excludes = value.to_string(),
            "include-scope" => stage.include_scope = value.to_string(),
            "exclude-scope" => stage.exclude_scope = value.to_string(),
            "empty-include-scope" => {
                stage.empty_include_scope = value
                    .parse::<EmptyIncludeScope>()
                    .map_err(|reason| StageError::config(format!("Invalid value for {key}: {reason}")))?;
            }
            "featureset-groupids" => stage.featureset_groupids = split_list(value),
            "skip" => stage.skip = parse_bool(key, value)?,
            "mappings" => {
                return Err(StageError::config("mappings can only be set in the configuration file"));
            }
            _ => return Err(StageError::config(format!("Unknown property '{key}'"))),
        }
        debug!("Property {} set to '{}'", name, value);
        Ok(())
    }

    /// Applies `key=value` pairs in order.
    ///
    /// # Errors
    ///
    /// [`StageError::ConfigError`] for a pair without `=` or any error of
    /// [`Config::apply_property`].
    pub fn apply_properties<S: AsRef<str>>(&mut self, pairs: &[S]) -> Result<(), StageError> {
        for pair in pairs {
            let pair = pair.as_ref();
            let Some((key, value)) = pair.split_once('=') else {
                return Err(StageError::config(format!("Expected key=value, got '{pair}'")));
            };
            self.apply_property(key.trim(), value.trim())?;
        }
        Ok(())
    }

    /// The scope filter of the resolution driver.
    pub fn scope_filter(&self) -> ScopeFilter {
        ScopeFilter::from_config(
            &self.stage.include_scope,
            &self.stage.exclude_scope,
            self.stage.empty_include_scope,
        )
    }

    /// Staging root for a project in `base_dir`.
    pub fn stage_dir(&self, base_dir: &Path) -> PathBuf {
        match self.stage.stage_directory.as_deref() {
            Some(dir) if !dir.trim().is_empty() => base_dir.join(expand_home(dir)),
            _ => base_dir
                .join(&self.stage.build_directory)
                .join(DEFAULT_STAGE_DIRECTORY_NAME),
        }
    }

    /// Validates the `[stage]` table and builds the stager's settings.
    ///
    /// # Errors
    ///
    /// [`StageError::InvalidExcludeEntry`] for a malformed exclusion,
    /// [`StageError::InvalidPattern`] for a bad entry pattern and
    /// [`StageError::ConfigError`] for a mapping without artifactId.
    pub fn to_settings(&self, base_dir: &Path) -> Result<StageSettings, StageError> {
        let stage = &self.stage;
        Ok(StageSettings {
            stage_dir: self.stage_dir(base_dir),
            base_dir: base_dir.to_path_buf(),
            copy_types: split_list(&stage.copy_types),
            copy_excludes: ExclusionPattern::parse_all(&stage.copy_excludes)?,
            unpack_types: split_list(&stage.unpack_types),
            unpack_excludes: ExclusionPattern::parse_all(&stage.unpack_excludes)?,
            selector: EntrySelector::new(&stage.includes, &stage.excludes)?,
            mapper: NameMapper::new(stage.mappings.clone())?,
            skip: stage.skip,
        })
    }

    /// Root of the local repository, with `~` and `$VAR` expanded.
    pub fn local_repository(&self) -> PathBuf {
        match self.repository.local.as_deref() {
            Some(local) if !local.trim().is_empty() => expand_home(local),
            _ => default_local_repository(),
        }
    }

    /// The Maven repository described by `[repository]`.
    pub fn repository(&self) -> MavenRepository {
        MavenRepository::new(
            self.local_repository(),
            self.repository.remotes.clone(),
            self.repository.offline,
        )
    }
}

/// `~/.m2/repository` of the current user.
fn default_local_repository() -> PathBuf {
    dirs::home_dir().map_or_else(
        || expand_home(DEFAULT_LOCAL_REPOSITORY),
        |home| home.join(".m2").join("repository"),
    )
}

/// Maps every accepted spelling of a key to its TOML name.
fn normalize_key(key: &str) -> String {
    let key = key.trim();
    let key = key.strip_prefix(PROPERTY_PREFIX).unwrap_or(key);
    if key == FEATURESET_GROUPIDS_ALIAS {
        return "featureset-groupids".to_string();
    }

    let mut name = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            if !name.is_empty() {
                name.push('-');
            }
            name.push(ch.to_ascii_lowercase());
        } else if ch == '_' {
            name.push('-');
        } else {
            name.push(ch);
        }
    }
    name
}

fn parse_bool(key: &str, value: &str) -> Result<bool, StageError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "true" => Ok(true),
        "false" => Ok(false),
        other => Err(StageError::config(format!("Invalid value for {key}: expected true or false, got '{other}'"))),
    }
}
