//! Scope and type filtering of dependencies.
//!
//! Two independent decisions are made per dependency:
//!
//! - **scope**: [`ScopeFilter`] decides whether a declared dependency takes
//!   part in the run at all, from the `include-scope`/`exclude-scope` lists;
//! - **action**: [`is_actionable`] decides whether a resolved dependency
//!   falls into an action category (copy or unpack) from that category's
//!   extension list and exclusion patterns.
//!
//! Configured lists are comma-separated strings; [`split_list`] turns them into
//! vectors the same way for every key.

use crate::coordinate::ResolvedDependency;
use crate::exclusion::{ExclusionPattern, is_excluded};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Splits a comma-separated configuration value.
///
/// Whitespace around commas and at both ends is dropped. An empty (or
/// all-blank) string yields an empty list.
///
/// ```rust
/// use depstage::filter::split_list;
///
/// assert_eq!(split_list(" jar , war,rar "), vec!["jar", "war", "rar"]);
/// assert!(split_list("").is_empty());
/// ```
pub fn split_list(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split(',').map(|item| item.trim().to_string()).collect()
}

/// How an empty `include-scope` list is interpreted.
///
/// The historical filter implementation treated an empty include list as
/// matching nothing while its documentation claimed it matched every scope.
/// The choice is explicit configuration here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyIncludeScope {
    /// An empty include list includes no scope.
    #[default]
    None,
    /// An empty include list includes every scope.
    All,
}

impl std::str::FromStr for EmptyIncludeScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "none" => Ok(Self::None),
            "all" => Ok(Self::All),
            other => Err(format!("expected 'none' or 'all', got '{other}'")),
        }
    }
}

/// Include/exclude scope lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeFilter {
    include: Vec<String>,
    exclude: Vec<String>,
    empty_include: EmptyIncludeScope,
}

impl ScopeFilter {
    pub fn new(include: Vec<String>, exclude: Vec<String>, empty_include: EmptyIncludeScope) -> Self {
        Self {
            include,
            exclude,
            empty_include,
        }
    }

    /// Builds the filter from the comma-separated configuration values.
    pub fn from_config(include: &str, exclude: &str, empty_include: EmptyIncludeScope) -> Self {
        Self::new(split_list(include), split_list(exclude), empty_include)
    }

    /// `true` iff `scope` is in the include list and not in the exclude list.
    pub fn is_included(&self, scope: &str) -> bool {
        let included = if self.include.is_empty() {
            self.empty_include == EmptyIncludeScope::All
        } else {
            self.include.iter().any(|s| s == scope)
        };
        included && !self.exclude.iter().any(|s| s == scope)
    }
}

/// `true` iff the dependency's extension is one of `action_types` and no
/// pattern of `action_excludes` matches it.
///
/// A matching exclusion is logged at info level whether or not the type
/// matched.
pub fn is_actionable(
    dependency: &ResolvedDependency,
    action_types: &[String],
    action_excludes: &[ExclusionPattern],
) -> bool {
    let type_included = action_types.iter().any(|t| *t == dependency.artifact.extension);
    let excluded = is_excluded(action_excludes, &dependency.artifact);

    if excluded {
        info!("Excluded: {}", dependency.artifact);
    }

    type_included && !excluded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::ArtifactCoordinate;
    use std::path::PathBuf;

    fn war_dependency() -> ResolvedDependency {
        let artifact =
            ArtifactCoordinate::new("org.glassfish.build.test", "war", "1.2.3").with_extension("war");
        ResolvedDependency::new(artifact, Some(PathBuf::from("/repo/war-1.2.3.war")), "compile")
    }

    fn types(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("jar,war,rar"), types(&["jar", "war", "rar"]));
        assert_eq!(split_list(" test , system "), types(&["test", "system"]));
        assert!(split_list("").is_empty());
        assert!(split_list("   ").is_empty());
        assert_eq!(split_list("zip"), types(&["zip"]));
    }

    #[test]
    fn test_scope_included_and_not_excluded() {
        let filter = ScopeFilter::from_config("compile,runtime", "test,system", EmptyIncludeScope::None);
        assert!(filter.is_included("compile"));
        assert!(filter.is_included("runtime"));
        assert!(!filter.is_included("test"));
        assert!(!filter.is_included("provided"));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let filter = ScopeFilter::from_config("compile", "compile", EmptyIncludeScope::All);
        assert!(!filter.is_included("compile"));
    }

    #[test]
    fn test_scope_membership_is_exact() {
        // "compile" as a raw string contains "pile"; list membership must not
        let filter = ScopeFilter::from_config("compile", "", EmptyIncludeScope::None);
        assert!(!filter.is_included("pile"));
        assert!(!filter.is_included(""));
    }

    #[test]
    fn test_empty_include_scope_none_matches_nothing() {
        let filter = ScopeFilter::from_config("", "test", EmptyIncludeScope::None);
        assert!(!filter.is_included("compile"));
        assert!(!filter.is_included("runtime"));
    }

    #[test]
    fn test_empty_include_scope_all_matches_everything_not_excluded() {
        let filter = ScopeFilter::from_config("", "test", EmptyIncludeScope::All);
        assert!(filter.is_included("compile"));
        assert!(filter.is_included("runtime"));
        assert!(filter.is_included("featureset-internal"));
        assert!(!filter.is_included("test"));
    }

    #[test]
    fn test_empty_include_scope_from_str() {
        assert_eq!("none".parse::<EmptyIncludeScope>().unwrap(), EmptyIncludeScope::None);
        assert_eq!("all".parse::<EmptyIncludeScope>().unwrap(), EmptyIncludeScope::All);
        assert!("some".parse::<EmptyIncludeScope>().is_err());
    }

    #[test]
    fn test_not_included_war_type() {
        let actionable = is_actionable(&war_dependency(), &types(&["jar", "rar"]), &[]);
        assert!(!actionable, "war not in [jar, rar] should not be actionable");
    }

    #[test]
    fn test_excluded_war() {
        let excludes = ExclusionPattern::parse_all(&["war"]).unwrap();
        let actionable = is_actionable(&war_dependency(), &types(&["jar", "war"]), &excludes);
        assert!(!actionable, "war in [jar, war] but excluded should not be actionable");
    }

    #[test]
    fn test_not_excluded_war() {
        let actionable = is_actionable(&war_dependency(), &types(&["jar", "war"]), &[]);
        assert!(actionable, "war in [jar, war] and not excluded should be actionable");
    }

    #[test]
    fn test_excluded_and_not_included() {
        let excludes = ExclusionPattern::parse_all(&["org.glassfish.build.test:war"]).unwrap();
        let actionable = is_actionable(&war_dependency(), &types(&["jar"]), &excludes);
        assert!(!actionable);
    }
}
