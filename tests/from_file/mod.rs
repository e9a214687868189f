//! Integration tests running the crate binary against the fixture records: Test the full E2E path.

use std::path::Path;
use std::process::{Command, Output};

use crate::data_dir;

const AS_OF: &str = "2021-10-01T12:00:00";

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_testcase-gen-rs"))
        .args(args)
        .arg("--data-dir")
        .arg(data_dir())
        .args(["--as-of", AS_OF])
        .env_remove("TESTCASE_SUITES_DIR")
        .output()
        .expect("failed to execute binary")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "binary exited with non-zero status.\nstderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn prints_document_to_stdout() {
    let output = run(&["AccountCheckTest", "--stdout"]);
    assert_success(&output);

    let stdout = String::from_utf8(output.stdout).expect("binary output was not valid UTF-8");
    assert!(stdout.starts_with("<?xml"));
    assert!(stdout.contains("<dd>2021-10-01</dd>"));
    for id in ["ACCT-CHECK-10", "ACCT-CHECK-13"] {
        assert!(stdout.contains(&format!("<td>{id}</td>")), "missing {id}");
    }
    assert!(!stdout.contains("ACCT-CHECK-14"));
}

#[test]
fn writes_numbered_file_into_suite_directory() {
    let suites = tempfile::tempdir().unwrap();
    let suite_dir = suites.path().join("BC/BillingCenterProject/AccountCheck");
    std::fs::create_dir_all(&suite_dir).unwrap();

    let output = run(&[
        "AccountCheckTest",
        "--suites-dir",
        path_arg(suites.path()),
        "--number",
        "3",
    ]);
    assert_success(&output);

    let written = std::fs::read_to_string(suite_dir.join("0003_ACCOUNT_CHECK.html"))
        .expect("test case file was not written");
    let printed = run(&["AccountCheckTest", "--stdout"]);
    assert_eq!(written, String::from_utf8(printed.stdout).unwrap());
}

#[test]
fn missing_suite_directory_fails_without_writing() {
    let suites = tempfile::tempdir().unwrap();

    let output = run(&["AccountCheckTest", "--suites-dir", path_arg(suites.path())]);

    assert!(!output.status.success());
    assert!(std::fs::read_dir(suites.path()).unwrap().next().is_none());
}

#[test]
fn unknown_spec_fails() {
    let output = run(&["NoSuchTest", "--stdout"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("NoSuchTest"));
}

#[test]
fn suites_dir_is_required_without_stdout() {
    let output = run(&["AccountCheckTest"]);
    assert!(!output.status.success());
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temporary path is not valid UTF-8")
}
