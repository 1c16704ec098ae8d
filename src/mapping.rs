//! Destination name overrides for staged artifacts.
//!
//! By default an artifact is staged under its artifactId. A [`NameMapping`]
//! replaces that name for one artifactId, optionally restricted to a groupId.
//! Mappings are consulted in declaration order and the first match wins.

use crate::coordinate::ArtifactCoordinate;
use crate::core::StageError;
use serde::{Deserialize, Serialize};

/// One `{groupId?, artifactId, name}` override entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NameMapping {
    /// Restricts the mapping to one groupId; empty or absent matches any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub name: String,
}

impl NameMapping {
    pub fn new(artifact_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group_id: None,
            artifact_id: artifact_id.into(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    fn group_matches(&self, artifact: &ArtifactCoordinate) -> bool {
        match self.group_id.as_deref() {
            Some(group_id) if !group_id.is_empty() => group_id == artifact.group_id,
            _ => true,
        }
    }
}

/// Ordered table of [`NameMapping`]s.
#[derive(Debug, Clone, Default)]
pub struct NameMapper {
    mappings: Vec<NameMapping>,
}

impl NameMapper {
    /// Builds the table, rejecting entries without an artifactId and names
    /// that are not a single path component.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::ConfigError`] for an entry whose artifactId is
    /// empty, or whose name contains a path separator or is `.` or `..`.
    pub fn new(mappings: Vec<NameMapping>) -> Result<Self, StageError> {
        if let Some(index) = mappings.iter().position(|m| m.artifact_id.trim().is_empty()) {
            return Err(StageError::config(format!(
                "mapping #{} has no artifact-id",
                index + 1
            )));
        }
        if let Some(mapping) = mappings.iter().find(|m| !is_plain_name(&m.name)) {
            return Err(StageError::config(format!(
                "mapping name '{}' for {} must be a plain file name",
                mapping.name, mapping.artifact_id
            )));
        }
        Ok(Self {
            mappings,
        })
    }

    /// The destination base name of `artifact`.
    ///
    /// Entries with a different non-empty groupId are skipped; the first
    /// entry with the same artifactId and a non-empty name wins. Falls back to
    /// the artifactId.
    pub fn map_name<'a>(&'a self, artifact: &'a ArtifactCoordinate) -> &'a str {
        self.mappings
            .iter()
            .filter(|mapping| mapping.group_matches(artifact))
            .find(|mapping| mapping.artifact_id == artifact.artifact_id && !mapping.name.is_empty())
            .map_or(artifact.artifact_id.as_str(), |mapping| mapping.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Staged names land directly below the stage directory. An empty name is
/// allowed; it falls back to the artifactId.
fn is_plain_name(name: &str) -> bool {
    !name.contains(['/', '\\']) && name != "." && name != ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> ArtifactCoordinate {
        ArtifactCoordinate::new("org.glassfish.main", "glassfish-api", "7.0.0")
    }

    #[test]
    fn test_no_mappings_uses_artifact_id() {
        let mapper = NameMapper::default();
        assert_eq!(mapper.map_name(&artifact()), "glassfish-api");
    }

    #[test]
    fn test_mapping_without_group_matches_any_group() {
        let mapper = NameMapper::new(vec![NameMapping::new("glassfish-api", "api")]).unwrap();
        assert_eq!(mapper.map_name(&artifact()), "api");
    }

    #[test]
    fn test_empty_group_matches_any_group() {
        let mapper =
            NameMapper::new(vec![NameMapping::new("glassfish-api", "api").with_group_id("")])
                .unwrap();
        assert_eq!(mapper.map_name(&artifact()), "api");
    }

    #[test]
    fn test_mapping_with_other_group_is_skipped() {
        let mapper = NameMapper::new(vec![
            NameMapping::new("glassfish-api", "api").with_group_id("org.other"),
        ])
        .unwrap();
        assert_eq!(mapper.map_name(&artifact()), "glassfish-api");
    }

    #[test]
    fn test_first_match_wins_over_more_specific_later_entry() {
        // The later entry is more specific, but the earlier one matches first
        let mapper = NameMapper::new(vec![
            NameMapping::new("glassfish-api", "generic"),
            NameMapping::new("glassfish-api", "specific").with_group_id("org.glassfish.main"),
        ])
        .unwrap();
        assert_eq!(mapper.map_name(&artifact()), "generic");
    }

    #[test]
    fn test_non_matching_group_entry_does_not_shadow_later_entry() {
        let mapper = NameMapper::new(vec![
            NameMapping::new("glassfish-api", "wrong").with_group_id("org.other"),
            NameMapping::new("glassfish-api", "right").with_group_id("org.glassfish.main"),
            NameMapping::new("glassfish-api", "fallback"),
        ])
        .unwrap();
        assert_eq!(mapper.map_name(&artifact()), "right");
    }

    #[test]
    fn test_empty_name_is_ignored() {
        let mapper = NameMapper::new(vec![
            NameMapping::new("glassfish-api", ""),
            NameMapping::new("glassfish-api", "api"),
        ])
        .unwrap();
        assert_eq!(mapper.map_name(&artifact()), "api");
    }

    #[test]
    fn test_name_must_stay_in_stage_directory() {
        for name in ["../outside", "sub/dir", "sub\\dir", "..", "."] {
            let err = NameMapper::new(vec![NameMapping::new("glassfish-api", name)]).unwrap_err();
            assert!(err.is_configuration_error(), "expected rejection of {name:?}");
        }
        assert!(NameMapper::new(vec![NameMapping::new("glassfish-api", "glassfish..api")]).is_ok());
    }

    #[test]
    fn test_missing_artifact_id_is_configuration_error() {
        let err = NameMapper::new(vec![NameMapping::new("", "name")]).unwrap_err();
        assert!(err.is_configuration_error());
    }
}
