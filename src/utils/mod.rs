//! Cross-platform utilities used by the staging engine.
//!
//! - [`fs`] - idempotent directory creation, overwriting copies, atomic
//!   writes and path helpers

pub mod fs;

pub use fs::{atomic_write, copy_file, ensure_dir, expand_home, find_project_root, relative_display};
