//! Error handling for depstage
//!
//! This module provides the error types and user-friendly error reporting for the
//! staging engine. The error system is designed around two core principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`StageError`] - Enumerated error types for all fatal failure cases
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Error Categories
//!
//! - **Configuration**: [`StageError::InvalidExcludeEntry`], [`StageError::InvalidPattern`],
//!   [`StageError::ConfigError`]
//! - **Resolution**: [`StageError::DescriptorRead`], [`StageError::Resolution`],
//!   [`StageError::PomParse`], [`StageError::Network`]
//! - **Staging**: [`StageError::UnknownArchiveFormat`], [`StageError::Extraction`],
//!   [`StageError::FileOperation`]
//!
//! Copy failures and missing artifact files are not errors: the stager logs
//! them and moves on to the next dependency.
//!
//! # Examples
//!
//! ```rust,no_run
//! use depstage::core::{StageError, user_friendly_error};
//!
//! fn parse() -> Result<(), StageError> {
//!     Err(StageError::InvalidExcludeEntry {
//!         entry: "a:b:c:d".to_string(),
//!         segments: 4,
//!     })
//! }
//!
//! if let Err(e) = parse() {
//!     let ctx = user_friendly_error(anyhow::Error::from(e));
//!     ctx.display();
//! }
//! ```

use crate::archive::ArchiveError;
use crate::core::FileOperationError;
use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for staging runs.
///
/// Every variant is fatal for the run that produced it. Errors raised after
/// staging started leave already staged files in place.
#[derive(Error, Debug)]
pub enum StageError {
    /// An exclusion pattern did not have 1 to 3 colon-separated segments.
    #[error("invalid exclude entry '{entry}': expected artifactId, groupId:artifactId or groupId:artifactId:version, got {segments} segments")]
    InvalidExcludeEntry {
        /// The raw pattern as configured
        entry: String,
        /// Number of segments found
        segments: usize,
    },

    /// An include/exclude glob used during unpacking could not be compiled.
    #[error("invalid file pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Why the glob compiler rejected it
        reason: String,
    },

    /// Any other configuration problem.
    #[error("configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// Reading a feature set's dependency descriptor failed.
    #[error("failed to read dependency descriptor of {artifact}: {reason}")]
    DescriptorRead {
        /// Coordinate of the feature set
        artifact: String,
        /// Underlying failure
        reason: String,
    },

    /// The batch resolution left artifacts unresolved.
    #[error("failed to resolve {} artifact(s): {}", artifacts.len(), artifacts.join(", "))]
    Resolution {
        /// Coordinates that could not be resolved
        artifacts: Vec<String>,
        /// Underlying failure
        reason: String,
    },

    /// A POM file could not be parsed into a descriptor.
    #[error("invalid POM {path}: {reason}")]
    PomParse {
        /// Path of the POM file
        path: PathBuf,
        /// Parse or interpolation problem
        reason: String,
    },

    /// A remote repository request failed.
    #[error("network error fetching {url}: {reason}")]
    Network {
        /// Requested URL
        url: String,
        /// Transport or status failure
        reason: String,
    },

    /// No extractor is known for the artifact's file name.
    #[error("unknown archive format: {}", file.display())]
    UnknownArchiveFormat {
        /// File that was to be unpacked
        file: PathBuf,
    },

    /// Extraction started but failed.
    #[error("error unpacking file: {} to: {}", file.display(), dest.display())]
    Extraction {
        /// Archive being unpacked
        file: PathBuf,
        /// Destination directory
        dest: PathBuf,
        /// Underlying extraction failure
        #[source]
        source: ArchiveError,
    },

    /// A file system operation outside the per-dependency copy path failed.
    #[error(transparent)]
    FileOperation(#[from] FileOperationError),
}

impl StageError {
    /// Returns `true` for errors caused by invalid configuration rather than
    /// by the repository or the file system.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidExcludeEntry { .. }
                | Self::InvalidPattern { .. }
                | Self::ConfigError { .. }
        )
    }

    /// Shorthand for [`StageError::ConfigError`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

/// An error paired with a suggestion and details for terminal display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error message
    pub message: String,
    /// Optional hint for the user
    pub suggestion: Option<String>,
    /// Optional explanation of the failure
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub fn new(error: impl fmt::Display) -> Self {
        Self {
            message: error.to_string(),
            suggestion: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Prints the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Converts any error into an [`ErrorContext`] with suggestions where the
/// failure is one we know about.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let chain = format_chain(&error);

    match error.downcast::<StageError>() {
        Ok(stage_error) => create_error_context(&stage_error, chain),
        Err(error) => {
            let mut message = error.to_string();
            if let Some(chain) = chain {
                message.push_str(&chain);
            }
            ErrorContext::new(message)
        }
    }
}

fn format_chain(error: &anyhow::Error) -> Option<String> {
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if chain.is_empty() {
        return None;
    }

    let mut message = String::from("\n\nCaused by:");
    for (i, cause) in chain.iter().enumerate() {
        message.push_str(&format!("\n  {}: {}", i + 1, cause));
    }
    Some(message)
}

fn create_error_context(error: &StageError, chain: Option<String>) -> ErrorContext {
    let ctx = ErrorContext::new(error);
    let ctx = match error {
        StageError::InvalidExcludeEntry { .. } => ctx
            .with_suggestion("Use 'artifactId', 'groupId:artifactId' or 'groupId:artifactId:version' in copy-excludes and unpack-excludes")
            .with_details("Exclusion patterns are validated before anything is resolved; a single bad entry aborts the run"),

        StageError::InvalidPattern { .. } => ctx
            .with_suggestion("Check the 'includes' and 'excludes' values: comma-separated patterns such as '**/*.txt,META-INF/'")
            .with_details("Patterns use '*' within one path segment and '**' across segments"),

        StageError::ConfigError { .. } => ctx
            .with_suggestion("Check depstage.toml and any -D overrides passed on the command line"),

        StageError::DescriptorRead { artifact, .. } => ctx
            .with_suggestion(format!(
                "Verify that the POM of {artifact} exists in the local repository or on one of the configured remotes"
            ))
            .with_details("Feature set dependencies are read from the aggregator's own POM"),

        StageError::Resolution { reason, .. } => ctx
            .with_suggestion("Check the [repository] section: remote URLs, the offline flag and the local repository path")
            .with_details(reason.clone()),

        StageError::PomParse { path, .. } => ctx
            .with_suggestion(format!("Check that {} is a well-formed POM", path.display())),

        StageError::Network { .. } => ctx
            .with_suggestion("Check your internet connection, or run with offline = true against a populated local repository"),

        StageError::UnknownArchiveFormat { file } => ctx
            .with_suggestion(format!(
                "Remove the extension of {} from unpack-types or add its coordinates to unpack-excludes",
                file.display()
            ))
            .with_details("Supported archives: zip, jar, war, ear, rar, sar, har, tar, tar.gz, tgz"),

        StageError::Extraction { source, .. } => ctx
            .with_details(source.to_string())
            .with_suggestion("The archive may be corrupt; delete it from the local repository to force a fresh download"),

        StageError::FileOperation(e) => ctx.with_details(e.user_message()),
    };

    match chain {
        Some(chain) if ctx.details.is_none() => {
            let details = chain.trim_start().to_string();
            ctx.with_details(details)
        }
        _ => ctx,
    }
}
