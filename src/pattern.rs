//! Include/exclude selection of archive entries.
//!
//! When a dependency is unpacked, the `includes` and `excludes` settings
//! restrict which archive entries are written. Both are comma-separated lists
//! of ant-style patterns matched against the entry path inside the archive:
//!
//! - `*` matches any sequence of characters within a single path segment
//! - `**` matches any number of path segments, including none
//! - `?` matches any single character
//! - `[abc]` / `[a-z]` match a character set or range
//! - a pattern ending with `/` matches everything below that directory
//!
//! An entry is selected when it matches at least one include pattern (or no
//! include pattern is configured) and matches no exclude pattern.
//!
//! # Examples
//!
//! ```rust
//! use depstage::pattern::EntrySelector;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), depstage::core::StageError> {
//! let selector = EntrySelector::new("**/*.txt", "legal/**")?;
//!
//! assert!(selector.is_selected(Path::new("docs/readme.txt")));
//! assert!(selector.is_selected(Path::new("readme.txt")));
//! assert!(!selector.is_selected(Path::new("legal/license.txt")));
//! assert!(!selector.is_selected(Path::new("docs/readme.md")));
//! # Ok(())
//! # }
//! ```

use crate::core::StageError;
use crate::filter::split_list;
use glob::{MatchOptions, Pattern};
use std::fmt;
use std::path::Path;
use tracing::trace;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled include/exclude pattern lists.
#[derive(Debug, Clone, Default)]
pub struct EntrySelector {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl EntrySelector {
    /// Compiles the comma-separated `includes` and `excludes` values.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::InvalidPattern`] if a pattern has invalid glob
    /// syntax.
    pub fn new(includes: &str, excludes: &str) -> Result<Self, StageError> {
        Ok(Self {
            includes: compile_all(includes)?,
            excludes: compile_all(excludes)?,
        })
    }

    /// A selector that selects every entry.
    pub const fn all() -> Self {
        Self {
            includes: Vec::new(),
            excludes: Vec::new(),
        }
    }

    /// `true` when neither includes nor excludes are configured.
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }

    /// Whether an archive entry at `path` should be extracted.
    pub fn is_selected(&self, path: &Path) -> bool {
        let path_str = normalize_entry(&path.to_string_lossy());

        let included = self.includes.is_empty()
            || self.includes.iter().any(|p| p.matches_with(&path_str, MATCH_OPTIONS));
        let excluded = self.excludes.iter().any(|p| p.matches_with(&path_str, MATCH_OPTIONS));

        trace!("Entry '{}' included={} excluded={}", path_str, included, excluded);
        included && !excluded
    }
}

impl fmt::Display for EntrySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |patterns: &[Pattern]| {
            patterns.iter().map(Pattern::as_str).collect::<Vec<_>>().join(",")
        };
        match (self.includes.is_empty(), self.excludes.is_empty()) {
            (true, true) => write!(f, "all entries"),
            (false, true) => write!(f, "includes \"{}\"", join(&self.includes)),
            (true, false) => write!(f, "excludes \"{}\"", join(&self.excludes)),
            (false, false) => write!(
                f,
                "includes \"{}\" and excludes \"{}\"",
                join(&self.includes),
                join(&self.excludes)
            ),
        }
    }
}

fn compile_all(value: &str) -> Result<Vec<Pattern>, StageError> {
    split_list(value)
        .into_iter()
        .filter(|pattern| !pattern.is_empty())
        .map(|pattern| {
            let normalized = normalize_pattern(&pattern);
            Pattern::new(&normalized).map_err(|e| StageError::InvalidPattern {
                pattern,
                reason: e.msg.to_string(),
            })
        })
        .collect()
}

/// Ant conventions: `\` separators, and a trailing `/` meaning `/**`.
fn normalize_pattern(pattern: &str) -> String {
    let pattern = pattern.replace('\\', "/");
    if pattern.ends_with('/') { format!("{pattern}**") } else { pattern }
}

/// Archive entry names use `/`; directory entries carry a trailing one.
fn normalize_entry(entry: &str) -> String {
    entry.replace('\\', "/").trim_end_matches('/').to_string()
}
