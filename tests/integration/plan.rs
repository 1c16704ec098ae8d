use crate::common::TestProject;
use predicates::prelude::*;

#[test]
fn test_plan_text() {
    let project = TestProject::glassfish();

    project
        .command()
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Staging plan for org.example:server:pom:1.0"))
        .stdout(predicate::str::contains("copy   org.glassfish.main.core:kernel:jar:7.0.0 [compile]"))
        .stdout(predicate::str::contains("unpack org.glassfish.main.distributions:nucleus-web:zip:7.0.0 [compile]"))
        .stdout(predicate::str::contains("junit").not());

    assert!(!project.stage_dir().exists(), "plan must not write the stage directory");
}

#[test]
fn test_plan_json() {
    let project = TestProject::glassfish();

    let output = project.command().args(["plan", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["project"]["artifactId"], "server");
    assert_eq!(plan["skip"], false);

    let actions = plan["actions"].as_array().unwrap();
    let kinds: Vec<(String, String)> = actions
        .iter()
        .map(|a| {
            (
                a["artifact"]["artifactId"].as_str().unwrap().to_string(),
                a["action"]["kind"].as_str().unwrap().to_string(),
            )
        })
        .collect();

    assert_eq!(
        kinds,
        vec![
            ("extra-lib".to_string(), "copy".to_string()),
            ("console-war".to_string(), "copy".to_string()),
            ("kernel".to_string(), "copy".to_string()),
            ("nucleus-web".to_string(), "unpack".to_string()),
        ]
    );
}

/// Command-line overrides win over the configuration file
#[test]
fn test_plan_with_override() {
    let project = TestProject::glassfish();
    project.write_config("copy-types = \"jar,war\"");

    project
        .command()
        .args(["-D", "copyTypes=jar", "plan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skip   org.glassfish.main.admingui:console-war:war:7.0.0"));
}

/// An empty include scope stages nothing unless the policy says otherwise
#[test]
fn test_plan_empty_include_scope() {
    let project = TestProject::glassfish();
    project.write_config("include-scope = \"\"");

    project
        .command()
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("No dependencies to stage"));

    project.write_config("include-scope = \"\"\nempty-include-scope = \"all\"");

    project
        .command()
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("kernel"))
        .stdout(predicate::str::contains("junit").not());
}
