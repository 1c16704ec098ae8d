//! Test utilities for depstage
//!
//! This module provides the building blocks used by unit and integration
//! tests:
//! - [`fixtures`] - on-disk fixtures: local Maven repositories, POMs and
//!   archives
//! - [`fakes`] - in-memory [`RepositoryService`](crate::repository::RepositoryService)
//!   and [`ArchiveService`](crate::archive::ArchiveService) implementations
//!   that record how they were called
//!
//! # Example
//!
//! ```rust,no_run
//! use depstage::test_utils::fixtures::{LocalRepositoryBuilder, PomFixture};
//!
//! let temp = tempfile::TempDir::new().unwrap();
//! let repo = LocalRepositoryBuilder::new(temp.path())
//!     .artifact("org.example", "lib", "1.0", "jar", "jar bytes")
//!     .pom_fixture(&PomFixture::new("org.example", "lib", "1.0"));
//! assert!(repo.root().join("org/example/lib/1.0/lib-1.0.jar").exists());
//! ```

pub mod fakes;
pub mod fixtures;

pub use fakes::{FakeRepository, RecordingArchiver};
pub use fixtures::{LocalRepositoryBuilder, PomFixture};

use std::io;
use std::sync::{Arc, Mutex, Once};
use tracing::Level;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Installs a tracing subscriber writing through the test harness, once per
/// process. Uses `level` when given, otherwise `RUST_LOG`; with neither,
/// logging stays off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// Log output collected by [`capture_logs`].
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Everything logged so far, without ANSI colors.
    pub fn contents(&self) -> String {
        self.0.lock().map(|buf| String::from_utf8_lossy(&buf).into_owned()).unwrap_or_default()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if let Ok(mut buf) = self.0.lock() {
            buf.extend_from_slice(data);
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Routes log events at `level` and above on the current thread into a
/// buffer until the guard is dropped.
///
/// Use from `#[test]` or the default current-thread `#[tokio::test]`.
pub fn capture_logs(level: Level) -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level.to_string()))
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_target(false)
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}
