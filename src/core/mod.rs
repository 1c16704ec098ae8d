//! Core types for depstage
//!
//! This module holds the error handling shared by every other module:
//! - [`StageError`] - the fatal error taxonomy of a staging run
//! - [`ErrorContext`] - user-facing error wrapper with suggestions and details
//! - [`user_friendly_error`] - convert any error to the user-facing format
//! - [`file_error`] - IO errors annotated with the failing operation and path
//!
//! # Error propagation
//!
//! Configuration and resolution errors propagate to the caller and abort the
//! run. Per-dependency copy failures are logged as [`FileOperationError`]s
//! and the run continues. Extraction failures abort the run.

pub mod error;
pub mod file_error;

pub use error::{ErrorContext, StageError, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileResultExt};
