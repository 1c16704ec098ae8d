//! File system utilities.
//!
//! # Key Features
//!
//! - **Idempotent directories**: [`ensure_dir`] succeeds when the directory
//!   already exists and leaves its content alone
//! - **Overwriting copies**: [`copy_file`] replaces the destination, it never
//!   merges or compares
//! - **Atomic writes**: downloaded files are written next to their final
//!   location and renamed into place
//!
//! # Examples
//!
//! ```rust,no_run
//! use depstage::utils::fs::{ensure_dir, relative_display};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("target/stage"))?;
//! ensure_dir(Path::new("target/stage"))?; // no-op the second time
//!
//! let shown = relative_display(Path::new("/proj/target/stage/a.jar"), Path::new("/proj"));
//! assert_eq!(shown, "target/stage/a.jar");
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod dirs;
pub mod paths;

pub use atomic::atomic_write;
pub use dirs::{copy_file, ensure_dir};
pub use paths::{expand_home, find_project_root, relative_display};
