//! End-to-end tests for the `grade` binary

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

const SAMPLE: &str = "?   \tpkg/a\t[no test files]
PASS
ok  \tpkg/b\t0.015s
BenchmarkParse-4\t  200000\t      5324 ns/op\t    1680 B/op\t      32 allocs/op
ok  \tpkg/c\t1.152s
";

fn grade() -> Command {
    let mut cmd = Command::cargo_bin("grade").unwrap();
    for var in [
        "GRADE_DATABASE",
        "GRADE_GO_VERSION",
        "GRADE_TIMESTAMP",
        "GRADE_REVISION",
        "GRADE_HARDWARE_ID",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn parse_cmd() -> Command {
    let mut cmd = grade();
    cmd.args([
        "parse",
        "--go-version",
        "go1.21.4",
        "--timestamp",
        "1700000000",
        "--revision",
        "4f2c9e1",
        "--hardware-id",
        "ci-8c",
    ]);
    cmd
}

#[test]
fn test_parse_stdin_report() {
    let output = parse_cmd().write_stdin(SAMPLE).output().unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["run"]["database"], "benchmarks");
    assert_eq!(report["run"]["go_version"], "go1.21.4");
    assert_eq!(report["run"]["timestamp"], 1700000000);

    let input = &report["inputs"][0];
    assert_eq!(input["source"], "-");
    assert_eq!(input["sha256"].as_str().unwrap().len(), 64);

    let packages = input["packages"].as_object().unwrap();
    assert_eq!(packages.len(), 2);
    assert_eq!(packages["pkg/b"], serde_json::json!([]));

    let parse = &packages["pkg/c"][0];
    assert_eq!(parse["name"], "Parse");
    assert_eq!(parse["procs"], 4);
    assert_eq!(parse["n"], 200000);
    assert_eq!(parse["alloced_bytes_per_op"], 1680);
    assert!(parse.get("mb_per_s").is_none());
}

#[test]
fn test_missing_metadata_is_rejected() {
    grade()
        .arg("parse")
        .write_stdin(SAMPLE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Go version cannot be empty"))
        .stderr(predicate::str::contains("Hardware ID cannot be empty"));
}

#[test]
fn test_metadata_from_environment() {
    let output = grade()
        .arg("parse")
        .env("GRADE_GO_VERSION", "go1.22.0")
        .env("GRADE_TIMESTAMP", "1700000001")
        .env("GRADE_REVISION", "main")
        .env("GRADE_HARDWARE_ID", "laptop")
        .write_stdin(SAMPLE)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["run"]["go_version"], "go1.22.0");
    assert_eq!(report["run"]["hardware_id"], "laptop");
}

#[test]
fn test_malformed_input_fails() {
    parse_cmd()
        .write_stdin("BenchmarkBad-4\tmany\t1 ns/op\nok  \tpkg/x\t1s\n")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("line 1"));
}

#[test]
fn test_parse_directory_to_file() {
    let dir = tempdir().unwrap();
    let logs = dir.path().join("logs");
    fs::create_dir_all(logs.join("nested")).unwrap();
    fs::write(logs.join("a.txt"), SAMPLE).unwrap();
    fs::write(
        logs.join("nested").join("b.txt"),
        "BenchmarkOther\t10\t3 ns/op\nok  \tpkg/d\t0.1s\n",
    )
    .unwrap();
    let out = dir.path().join("report.json");

    parse_cmd()
        .arg(&logs)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let report: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let inputs = report["inputs"].as_array().unwrap();
    assert_eq!(inputs.len(), 2);
    assert!(inputs[0]["source"].as_str().unwrap().ends_with("a.txt"));
    assert!(inputs[1]["packages"]["pkg/d"].is_array());
}

#[test]
fn test_missing_input_path_fails() {
    parse_cmd()
        .arg("/nonexistent/bench.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("input not found"));
}

#[test]
fn test_generate_then_parse() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("synthetic.txt");

    grade()
        .args(["generate", "--packages", "12", "--seed", "3", "--out"])
        .arg(&out)
        .assert()
        .success();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("ok  \texample.com/synth/pkg000\t") || text.contains("pkg000\t[no test files]"));

    parse_cmd().arg(&out).assert().success();
}
