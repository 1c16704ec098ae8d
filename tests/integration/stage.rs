use crate::common::TestProject;
use predicates::prelude::*;

/// Feature-set jars and wars are copied, zips unpacked, test scope ignored
#[test]
fn test_stage_copies_and_unpacks() {
    let project = TestProject::glassfish();

    project.command().arg("stage").assert().success();

    assert_eq!(project.read(&project.staged("kernel.jar")), "kernel classes");
    assert_eq!(project.read(&project.staged("console-war.war")), "console web app");
    assert_eq!(project.read(&project.staged("extra-lib.jar")), "extra classes");
    assert_eq!(project.read(&project.staged("nucleus-web/config/domain.xml")), "<domain/>");
    assert!(project.staged("nucleus-web/bin/asadmin").is_file());
    assert!(!project.staged("junit.jar").exists());
    assert!(!project.staged("glassfish.pom").exists());
}

#[test]
fn test_stage_logs_actions() {
    let project = TestProject::glassfish();

    project
        .command()
        .arg("stage")
        .assert()
        .success()
        .stderr(predicate::str::contains("Copying org.glassfish.main.core:kernel:jar:7.0.0"))
        .stderr(predicate::str::contains("Unpacking org.glassfish.main.distributions:nucleus-web:zip:7.0.0"));
}

#[test]
fn test_stage_quiet_prints_nothing() {
    let project = TestProject::glassfish();

    project.command().args(["-q", "stage"]).assert().success().stderr(predicate::str::is_empty());
    assert!(project.staged("kernel.jar").is_file());
}

/// Name mappings rename both copied files and unpack directories
#[test]
fn test_stage_with_mappings() {
    let project = TestProject::glassfish();
    project.write_config(
        "mappings = [\n  { artifact-id = \"nucleus-web\", name = \"glassfish7\" },\n  { group-id = \"org.glassfish.main.core\", artifact-id = \"kernel\", name = \"glassfish-kernel\" },\n]",
    );

    project.command().arg("stage").assert().success();

    assert!(project.staged("glassfish7/bin/asadmin").is_file());
    assert!(project.staged("glassfish-kernel.jar").is_file());
    assert!(!project.staged("nucleus-web").exists());
    assert!(!project.staged("kernel.jar").exists());
}

/// Entry patterns restrict what is extracted from archives
#[test]
fn test_stage_entry_patterns() {
    let project = TestProject::glassfish();
    project.write_config("includes = \"bin/**,config/**\"\nexcludes = \"**/*.xml\"");

    project.command().arg("stage").assert().success();

    assert!(project.staged("nucleus-web/bin/asadmin").is_file());
    assert!(!project.staged("nucleus-web/config/domain.xml").exists());
    assert!(!project.staged("nucleus-web/docs/README.txt").exists());
}

#[test]
fn test_stage_excludes() {
    let project = TestProject::glassfish();
    project.write_config(
        "copy-excludes = [\"console-war\"]\nunpack-excludes = [\"org.glassfish.main.distributions:nucleus-web:7.0.0\"]",
    );

    project
        .command()
        .arg("stage")
        .assert()
        .success()
        .stderr(predicate::str::contains("Excluded: org.glassfish.main.admingui:console-war:war:7.0.0"))
        .stderr(predicate::str::contains("Excluded: org.glassfish.main.distributions:nucleus-web:zip:7.0.0"));

    assert!(project.staged("kernel.jar").is_file());
    assert!(!project.staged("console-war.war").exists());
    assert!(!project.staged("nucleus-web").exists());
}

#[test]
fn test_stage_skip_flag() {
    let project = TestProject::glassfish();

    project.command().args(["stage", "--skip"]).assert().success();

    assert!(!project.stage_dir().exists());
}

#[test]
fn test_stage_skip_property() {
    let project = TestProject::glassfish();

    project
        .command()
        .args(["-D", "gfbuild.featuresets.dependencies.skip=true", "stage"])
        .assert()
        .success();

    assert!(!project.stage_dir().exists());
}

/// Files from earlier runs stay in the stage directory
#[test]
fn test_stage_keeps_existing_files() {
    let project = TestProject::glassfish();
    std::fs::create_dir_all(project.stage_dir()).unwrap();
    std::fs::write(project.staged("previous.txt"), "earlier").unwrap();

    project.command().arg("stage").assert().success();

    assert_eq!(project.read(&project.staged("previous.txt")), "earlier");
    assert!(project.staged("kernel.jar").is_file());
}

#[test]
fn test_stage_custom_stage_directory() {
    let project = TestProject::glassfish();
    project.write_config("stage-directory = \"dist\"");

    project.command().arg("stage").assert().success();

    assert!(project.project_dir.join("dist/kernel.jar").is_file());
    assert!(!project.stage_dir().exists());
}

#[test]
fn test_stage_project_option() {
    let project = TestProject::glassfish();
    let elsewhere = tempfile::TempDir::new().unwrap();

    project
        .command()
        .current_dir(elsewhere.path())
        .arg("--project")
        .arg(project.project_dir.join("pom.xml"))
        .arg("stage")
        .assert()
        .success();

    assert!(project.staged("kernel.jar").is_file());
}
