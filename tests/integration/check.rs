use crate::common::TestProject;
use predicates::prelude::*;

#[test]
fn test_check_valid() {
    let project = TestProject::glassfish();
    project.write_config("unpack-excludes = [\"org.glassfish.main.admingui:console-war\"]\nincludes = \"bin/\"");

    project
        .command()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Feature set groups: org.glassfish.main.featuresets"))
        .stdout(predicate::str::contains("Unpacked entries: includes \"bin/**\""));
}

/// check validates configuration only; a broken repository does not matter
#[test]
fn test_check_does_not_resolve() {
    let project = TestProject::new();
    project.write_pom(&depstage::test_utils::PomFixture::new("org.example", "empty", "1.0"));
    project.write_config("");

    project.command().arg("check").assert().success();
}

#[test]
fn test_check_rejects_bad_exclude() {
    let project = TestProject::glassfish();

    project
        .command()
        .args(["-D", "unpackExcludes=a:b:c:d", "check"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid exclude entry 'a:b:c:d'"));
}

#[test]
fn test_check_rejects_bad_pattern() {
    let project = TestProject::glassfish();
    project.write_config("includes = \"[unclosed\"");

    project
        .command()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid file pattern '[unclosed'"));
}

#[test]
fn test_check_rejects_mapping_without_artifact_id() {
    let project = TestProject::glassfish();
    project.write_config("mappings = [{ artifact-id = \"\", name = \"x\" }]");

    project
        .command()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn test_check_rejects_mapping_name_with_path() {
    let project = TestProject::glassfish();
    project.write_config("mappings = [{ artifact-id = \"kernel\", name = \"../kernel\" }]");

    project
        .command()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("mapping name '../kernel' for kernel must be a plain file name"));
}

#[test]
fn test_check_rejects_unknown_property() {
    let project = TestProject::glassfish();

    project
        .command()
        .args(["-D", "copyTypos=jar", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown property 'copyTypos'"));
}

#[test]
fn test_check_with_explicit_config() {
    let project = TestProject::glassfish();
    let config = project.project_dir.join("ci.toml");
    std::fs::write(&config, "[stage]\nskip = true\n").unwrap();

    project
        .command()
        .arg("--config")
        .arg(&config)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Staging is disabled"));
}

#[test]
fn test_check_missing_explicit_config() {
    let project = TestProject::glassfish();

    project
        .command()
        .args(["--config", "missing.toml", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_check_without_project() {
    let project = TestProject::new();

    project
        .command()
        .args(["--project", "nowhere/pom.xml", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
