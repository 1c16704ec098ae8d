use crate::common::{FEATURESET_GROUP, TestProject, VERSION};
use depstage::test_utils::fixtures::{PomDependency, PomFixture};
use predicates::prelude::*;

/// Every missing artifact is named, and nothing is staged
#[test]
fn test_missing_artifacts_fail_resolution() {
    let project = TestProject::glassfish();
    std::fs::remove_file(project.repo_dir.join("org/glassfish/main/core/kernel/7.0.0/kernel-7.0.0.jar")).unwrap();
    std::fs::remove_file(project.repo_dir.join("org/example/extra-lib/1.0/extra-lib-1.0.jar")).unwrap();

    project
        .command()
        .arg("stage")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to resolve 2 artifact(s)"))
        .stderr(predicate::str::contains("org.glassfish.main.core:kernel:jar:7.0.0"))
        .stderr(predicate::str::contains("org.example:extra-lib:jar:1.0"));

    assert!(!project.stage_dir().exists());
}

#[test]
fn test_missing_feature_set_descriptor() {
    let project = TestProject::new();
    project.write_pom(
        &PomFixture::new("org.example", "server", "1.0")
            .dependency(PomDependency::new(FEATURESET_GROUP, "absent", VERSION).with_type("pom")),
    );
    project.write_config("");

    project
        .command()
        .arg("stage")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read dependency descriptor"))
        .stderr(predicate::str::contains("absent"));
}

#[test]
fn test_corrupt_archive_aborts() {
    let project = TestProject::glassfish();
    project.repository().artifact(
        "org.glassfish.main.distributions",
        "nucleus-web",
        VERSION,
        "zip",
        "this is not a zip file",
    );

    project
        .command()
        .arg("stage")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error unpacking file"));
}

#[test]
fn test_invalid_config_file() {
    let project = TestProject::glassfish();
    std::fs::write(project.project_dir.join("depstage.toml"), "[stage\n").unwrap();

    project
        .command()
        .arg("stage")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}
