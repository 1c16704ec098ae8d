//! Common test utilities for depstage integration tests
//!
//! [`TestProject`] lays out a temporary project directory with a `pom.xml`
//! and a `depstage.toml` pointing at an offline local repository, so every
//! test runs the real binary without network access.

// Allow dead code because these utilities are used across different test files
// and not all utilities are used in every test file
#![allow(dead_code)]

use assert_cmd::Command;
use depstage::test_utils::fixtures::{LocalRepositoryBuilder, PomDependency, PomFixture};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const FEATURESET_GROUP: &str = "org.glassfish.main.featuresets";
pub const VERSION: &str = "7.0.0";

/// A project directory plus an offline local repository.
pub struct TestProject {
    _temp_dir: TempDir,
    pub project_dir: PathBuf,
    pub repo_dir: PathBuf,
}

impl TestProject {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let project_dir = temp_dir.path().join("project");
        let repo_dir = temp_dir.path().join("repository");
        fs::create_dir_all(&project_dir).expect("create project dir");
        fs::create_dir_all(&repo_dir).expect("create repository dir");

        Self {
            _temp_dir: temp_dir,
            project_dir,
            repo_dir,
        }
    }

    /// A project depending on one feature set with a jar, a war, a zip and
    /// a test-scoped artifact, plus one direct jar dependency.
    pub fn glassfish() -> Self {
        let project = Self::new();

        let featureset = PomFixture::new(FEATURESET_GROUP, "glassfish", VERSION)
            .packaging("pom")
            .dependency(PomDependency::new("org.glassfish.main.core", "kernel", VERSION))
            .dependency(
                PomDependency::new("org.glassfish.main.admingui", "console-war", VERSION).with_type("war"),
            )
            .dependency(
                PomDependency::new("org.glassfish.main.distributions", "nucleus-web", VERSION)
                    .with_type("zip"),
            )
            .dependency(PomDependency::new("junit", "junit", "4.13").with_scope("test"));

        project
            .repository()
            .pom_fixture(&featureset)
            .artifact("org.glassfish.main.core", "kernel", VERSION, "jar", "kernel classes")
            .artifact("org.glassfish.main.admingui", "console-war", VERSION, "war", "console web app")
            .zip_artifact(
                "org.glassfish.main.distributions",
                "nucleus-web",
                VERSION,
                &[
                    ("bin/asadmin", "#!/bin/sh"),
                    ("config/domain.xml", "<domain/>"),
                    ("docs/README.txt", "read me"),
                ],
            )
            .artifact("org.example", "extra-lib", "1.0", "jar", "extra classes");

        project.write_pom(
            &PomFixture::new("org.example", "server", "1.0")
                .packaging("pom")
                .dependency(PomDependency::new(FEATURESET_GROUP, "glassfish", VERSION).with_type("pom"))
                .dependency(PomDependency::new("org.example", "extra-lib", "1.0")),
        );
        project.write_config("");
        project
    }

    pub fn repository(&self) -> LocalRepositoryBuilder {
        LocalRepositoryBuilder::new(&self.repo_dir)
    }

    pub fn write_pom(&self, pom: &PomFixture) -> PathBuf {
        pom.write_project(&self.project_dir)
    }

    /// Writes `depstage.toml` with `stage_table` as the `[stage]` body and
    /// an offline `[repository]` pointing at the test repository.
    pub fn write_config(&self, stage_table: &str) {
        let content = format!(
            "[stage]\nfeatureset-groupids = [\"{FEATURESET_GROUP}\"]\n{stage_table}\n\n[repository]\nlocal = {:?}\noffline = true\nremotes = []\n",
            self.repo_dir.display().to_string()
        );
        fs::write(self.project_dir.join("depstage.toml"), content).expect("write depstage.toml");
    }

    pub fn stage_dir(&self) -> PathBuf {
        self.project_dir.join("target").join("stage")
    }

    pub fn staged(&self, relative: &str) -> PathBuf {
        self.stage_dir().join(relative)
    }

    /// The depstage binary, run in the project directory.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("depstage").expect("depstage binary");
        cmd.current_dir(&self.project_dir)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("DEPSTAGE_CONFIG");
        cmd
    }

    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
    }
}
