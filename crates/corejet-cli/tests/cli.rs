//! Smoke tests for the `corejet` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::str;

use assert_cmd::Command;
use rstest::{fixture, rstest};
use tempfile::TempDir;

const FIRST_STORY: &str = "\
As a user I want a first story

Scenario: First scenario
Given one
When two
Then three
";

const FINNISH_STORY: &str = "\
Suomenkielinen tarina

Tapaus: Ensimmäinen
Oletetaan, että yksi
Kun kaksi
Niin kolme
";

#[fixture]
fn workspace() -> TempDir {
    TempDir::new().unwrap_or_else(|error| panic!("temporary directory: {error}"))
}

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap_or_else(|error| panic!("write {name}: {error}"));
    path
}

fn corejet() -> Command {
    let mut command =
        Command::cargo_bin("corejet").unwrap_or_else(|error| panic!("binary exists: {error}"));
    command
        .env_remove("COREJET_LOG_LEVEL")
        .env_remove("COREJET_LANGUAGE");
    command
}

fn extract_args(files: &[&Path]) -> Vec<String> {
    let mut args = vec![
        "extract".to_string(),
        "--project".into(),
        "Test project".into(),
        "--epic-id".into(),
        "E1".into(),
        "--epic-title".into(),
        "First epic".into(),
    ];
    args.extend(files.iter().map(|path| path.display().to_string()));
    args
}

fn stdout_of(output: &std::process::Output) -> &str {
    str::from_utf8(&output.stdout).unwrap_or_else(|error| panic!("utf8 stdout: {error}"))
}

#[rstest]
fn extract_writes_report_to_stdout(workspace: TempDir) {
    let story = write(workspace.path(), "S1.txt", FIRST_STORY);
    let output = corejet()
        .args(extract_args(&[&story]))
        .output()
        .unwrap_or_else(|error| panic!("runs: {error}"));
    assert!(output.status.success());

    let report = stdout_of(&output);
    assert!(report.starts_with("<requirementscatalogue project=\"Test project\" extractTime=\""));
    assert!(report.contains("<epic id=\"E1\" title=\"First epic\">"));
    assert!(report.contains("<story id=\"S1\" title=\"As a user I want a first story\">"));
    assert!(report.contains("<given>one</given>"));
    assert!(report.ends_with("</requirementscatalogue>\n"));
}

#[rstest]
fn extract_then_summarise(workspace: TempDir) {
    let story = write(workspace.path(), "S1.txt", FIRST_STORY);
    let report = workspace.path().join("report.xml");
    let mut args = extract_args(&[&story]);
    args.extend(["--output".to_string(), report.display().to_string()]);
    corejet().args(args).assert().success();
    assert!(report.exists());

    let output = corejet()
        .arg("summary")
        .arg(&report)
        .output()
        .unwrap_or_else(|error| panic!("runs: {error}"));
    assert!(output.status.success());
    let summary = stdout_of(&output);
    assert!(summary.contains("project: Test project"));
    assert!(summary.contains(
        "E1/S1 As a user I want a first story: 1 scenarios (pass 0, fail 0, pending 0, mismatch 0, superfluous 0, untested 1)"
    ));
}

#[rstest]
fn summary_as_json(workspace: TempDir) {
    let report = write(
        workspace.path(),
        "report.xml",
        "<requirementscatalogue project=\"P\" testTime=\"2011-01-02T12:05:00\">\n\
         <epic id=\"E1\" title=\"Epic\">\n\
         <story id=\"S1\" title=\"Story\">\n\
         <scenario name=\"A\" testStatus=\"pass\"/>\n\
         <scenario name=\"B\" testStatus=\"fail\"/>\n\
         </story>\n\
         </epic>\n\
         </requirementscatalogue>\n",
    );
    let output = corejet()
        .args(["summary", "--format", "json"])
        .arg(&report)
        .output()
        .unwrap_or_else(|error| panic!("runs: {error}"));
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(stdout_of(&output))
        .unwrap_or_else(|error| panic!("valid json: {error}"));
    assert_eq!(value.pointer("/project"), Some(&"P".into()));
    assert_eq!(value.pointer("/stories/0/pass"), Some(&1.into()));
    assert_eq!(value.pointer("/stories/0/fail"), Some(&1.into()));
}

#[rstest]
#[case::flag(true)]
#[case::environment(false)]
fn language_selects_keywords(workspace: TempDir, #[case] as_flag: bool) {
    let story = write(workspace.path(), "S2.txt", FINNISH_STORY);
    let mut command = corejet();
    let mut args = extract_args(&[&story]);
    if as_flag {
        args.extend(["--language".to_string(), "fi".to_string()]);
    } else {
        command.env("COREJET_LANGUAGE", "fi");
    }
    let output = command
        .args(args)
        .output()
        .unwrap_or_else(|error| panic!("runs: {error}"));
    assert!(output.status.success());
    let report = stdout_of(&output);
    assert!(report.contains("<scenario name=\"Ensimmäinen\">"));
    assert!(report.contains("<given>yksi</given>"));
}

#[rstest]
fn unsupported_language_is_a_configuration_error(workspace: TempDir) {
    let story = write(workspace.path(), "S1.txt", FIRST_STORY);
    corejet()
        .env("COREJET_LANGUAGE", "xx")
        .args(extract_args(&[&story]))
        .assert()
        .code(2);
}

#[rstest]
fn malformed_criteria_fail_with_the_file_name(workspace: TempDir) {
    let story = write(
        workspace.path(),
        "broken.txt",
        "Scenario: A\nGiven one\nThen three\nWhen two\n",
    );
    let output = corejet()
        .args(extract_args(&[&story]))
        .output()
        .unwrap_or_else(|error| panic!("runs: {error}"));
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.txt"));
    assert!(stderr.contains("line 4"));
}

#[test]
fn extract_requires_files() {
    corejet()
        .args(["extract", "--project", "P", "--epic-id", "E", "--epic-title", "T"])
        .assert()
        .failure();
}
