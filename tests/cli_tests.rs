//! CLI tests: replaying event scripts through the calltrace binary
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

const SHAPES: &str = "tests/fixtures/shapes.json";

fn calltrace() -> Command {
    let mut cmd = Command::cargo_bin("calltrace").unwrap();
    cmd.arg("--color").arg("never");
    cmd
}

#[test]
fn test_text_trace() {
    calltrace()
        .arg(SHAPES)
        .assert()
        .success()
        .stdout(predicate::str::contains("CALL   (/home/dev/proj/app/main.py line 1) main => <root>"))
        .stdout(predicate::str::contains("Square.area"))
        .stdout(predicate::str::contains("[parent call]"))
        .stdout(predicate::str::contains("RETURN"))
        .stdout(predicate::str::contains("_find_and_load").not());
}

#[test]
fn test_gap_marker_for_filtered_call() {
    let output = calltrace().arg(SHAPES).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let gaps = stdout.lines().filter(|line| *line == "  ...").count();
    assert_eq!(gaps, 1);
}

#[test]
fn test_max_depth_flag() {
    calltrace()
        .arg("--max-depth")
        .arg("1")
        .arg(SHAPES)
        .assert()
        .success()
        .stdout(predicate::str::contains("Square.area"))
        .stdout(predicate::str::contains(" mul ").not())
        .stdout(predicate::str::contains(" pow ").not());
}

#[test]
fn test_show_args_flag() {
    calltrace()
        .arg("--show-args")
        .arg(SHAPES)
        .assert()
        .success()
        .stdout(predicate::str::contains("side = 3"))
        .stdout(predicate::str::contains("base = 3"))
        .stdout(predicate::str::contains("exp = 2"))
        .stdout(predicate::str::contains("self =").not())
        .stdout(predicate::str::contains("kind =").not());
}

#[test]
fn test_no_args_without_flag() {
    calltrace()
        .arg(SHAPES)
        .assert()
        .success()
        .stdout(predicate::str::contains("side = 3").not());
}

#[test]
fn test_path_cut_and_filter_flags() {
    calltrace()
        .arg("--path-cut")
        .arg("proj")
        .arg("--path-filter")
        .arg("mathutil")
        .arg(SHAPES)
        .assert()
        .success()
        .stdout(predicate::str::contains("(app/shapes.py line 15) Square.area"))
        .stdout(predicate::str::contains("/home/dev").not())
        .stdout(predicate::str::contains(" pow ").not());
}

#[test]
fn test_json_format() {
    let output = calltrace()
        .arg("--format")
        .arg("json")
        .arg(SHAPES)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["event_count"], 10);
    assert_eq!(json["gap_count"], 1);
    assert_eq!(json["events"][0]["callee"]["qualified_name"], "main");
    assert!(json["events"][0]["caller"].is_null());
    assert_eq!(json["events"][3]["is_parent_call"], true);
}

#[test]
fn test_config_file() {
    calltrace()
        .arg("--config")
        .arg("tests/fixtures/calltrace.toml")
        .arg(SHAPES)
        .assert()
        .success()
        .stdout(predicate::str::contains("(app/main.py line 1) main"))
        .stdout(predicate::str::contains(" mul ").not());
}

#[test]
fn test_flags_override_config_file() {
    calltrace()
        .arg("--config")
        .arg("tests/fixtures/calltrace.toml")
        .arg("--max-depth")
        .arg("4")
        .arg(SHAPES)
        .assert()
        .success()
        .stdout(predicate::str::contains(" mul "));
}

#[test]
fn test_invalid_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_depth = -3").unwrap();
    calltrace()
        .arg("--config")
        .arg(file.path())
        .arg(SHAPES)
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_depth"));
}

#[test]
fn test_unbalanced_script_rejected() {
    calltrace()
        .arg("tests/fixtures/unbalanced.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("return without an open call"));
}

#[test]
fn test_missing_script() {
    calltrace()
        .arg("tests/fixtures/does_not_exist.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read event script"));
}

#[test]
fn test_missing_script_argument() {
    Command::cargo_bin("calltrace").unwrap().assert().failure();
}

#[test]
fn test_forced_color() {
    Command::cargo_bin("calltrace")
        .unwrap()
        .arg("--color")
        .arg("always")
        .arg(SHAPES)
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{1b}["));
}
