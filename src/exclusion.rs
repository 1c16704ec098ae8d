//! Coordinate-based exclusion patterns.
//!
//! An exclusion pattern names artifacts by position:
//!
//! | pattern | matches |
//! |---------|---------|
//! | `artifactId` | any artifact with that artifactId |
//! | `groupId:artifactId` | that groupId and artifactId |
//! | `groupId:artifactId:version` | that exact groupId, artifactId and version |
//!
//! Anything with more segments is a configuration error. Patterns are parsed
//! when the configuration is validated, so a single malformed entry aborts a
//! run before anything is resolved or staged.
//!
//! # Examples
//!
//! ```rust
//! use depstage::coordinate::ArtifactCoordinate;
//! use depstage::exclusion::{ExclusionPattern, is_excluded};
//!
//! # fn example() -> Result<(), depstage::core::StageError> {
//! let patterns = vec![
//!     ExclusionPattern::parse("javax.inject")?,
//!     ExclusionPattern::parse("org.glassfish.main:nucleus-common")?,
//! ];
//!
//! let artifact = ArtifactCoordinate::new("org.glassfish.main", "nucleus-common", "7.0.0");
//! assert!(is_excluded(&patterns, &artifact));
//! # Ok(())
//! # }
//! ```

use crate::coordinate::ArtifactCoordinate;
use crate::core::StageError;
use std::fmt;

/// A parsed exclusion pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionPattern {
    /// `artifactId`
    ArtifactId(String),
    /// `groupId:artifactId`
    GroupArtifact {
        group_id: String,
        artifact_id: String,
    },
    /// `groupId:artifactId:version`
    GroupArtifactVersion {
        group_id: String,
        artifact_id: String,
        version: String,
    },
}

impl ExclusionPattern {
    /// Parses a pattern string.
    ///
    /// Segments are compared literally; an empty segment only matches an
    /// empty field. Trailing empty segments count, so `g:a:1:` has four
    /// segments and is rejected rather than read as `g:a:1`.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::InvalidExcludeEntry`] when the pattern has more
    /// than three colon-separated segments.
    pub fn parse(entry: &str) -> Result<Self, StageError> {
        let segments: Vec<&str> = entry.split(':').collect();
        match segments.as_slice() {
            [artifact_id] => Ok(Self::ArtifactId((*artifact_id).to_string())),
            [group_id, artifact_id] => Ok(Self::GroupArtifact {
                group_id: (*group_id).to_string(),
                artifact_id: (*artifact_id).to_string(),
            }),
            [group_id, artifact_id, version] => Ok(Self::GroupArtifactVersion {
                group_id: (*group_id).to_string(),
                artifact_id: (*artifact_id).to_string(),
                version: (*version).to_string(),
            }),
            _ => Err(StageError::InvalidExcludeEntry {
                entry: entry.to_string(),
                segments: segments.len(),
            }),
        }
    }

    /// Parses every entry of a configured list, failing on the first bad one.
    pub fn parse_all<S: AsRef<str>>(entries: &[S]) -> Result<Vec<Self>, StageError> {
        entries.iter().map(|entry| Self::parse(entry.as_ref())).collect()
    }

    /// Whether the positional fields of this pattern equal the artifact's.
    pub fn matches(&self, artifact: &ArtifactCoordinate) -> bool {
        match self {
            Self::ArtifactId(artifact_id) => artifact.artifact_id == *artifact_id,
            Self::GroupArtifact {
                group_id,
                artifact_id,
            } => artifact.group_id == *group_id && artifact.artifact_id == *artifact_id,
            Self::GroupArtifactVersion {
                group_id,
                artifact_id,
                version,
            } => {
                artifact.group_id == *group_id
                    && artifact.artifact_id == *artifact_id
                    && artifact.version == *version
            }
        }
    }
}

impl fmt::Display for ExclusionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArtifactId(artifact_id) => write!(f, "{artifact_id}"),
            Self::GroupArtifact {
                group_id,
                artifact_id,
            } => write!(f, "{group_id}:{artifact_id}"),
            Self::GroupArtifactVersion {
                group_id,
                artifact_id,
                version,
            } => write!(f, "{group_id}:{artifact_id}:{version}"),
        }
    }
}

impl std::str::FromStr for ExclusionPattern {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// `true` if any pattern matches the artifact.
pub fn is_excluded(patterns: &[ExclusionPattern], artifact: &ArtifactCoordinate) -> bool {
    patterns.iter().any(|pattern| pattern.matches(artifact))
}
