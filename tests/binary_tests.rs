//! Integration tests for the sql-select-converter binary.

use std::io::Write;

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn cmd() -> Command {
    cargo_bin_cmd!("sql-select-converter")
}

#[test]
fn test_convert_inline_query() {
    cmd()
        .args([
            "convert",
            "-q",
            "SELECT NVL(name, 'Unknown') FROM employees",
            "--no-color"
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("ISNULL(name, 'Unknown')"));
}

#[test]
fn test_convert_rownum_to_top() {
    cmd()
        .args([
            "convert",
            "-q",
            "SELECT * FROM orders WHERE ROWNUM <= 10",
            "--no-color"
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("SELECT TOP 10 *"));
}

#[test]
fn test_convert_with_warnings_exits_one() {
    cmd()
        .args([
            "convert",
            "-q",
            "SELECT * FROM emp START WITH mgr IS NULL CONNECT BY PRIOR id = mgr",
            "--no-color"
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("CONVERSION WARNINGS"));
}

#[test]
fn test_convert_file_input() {
    let mut input = NamedTempFile::new().unwrap();
    writeln!(input, "SELECT SYSDATE FROM DUAL").unwrap();

    cmd()
        .args([
            "convert",
            "-i",
            input.path().to_str().unwrap(),
            "--no-color"
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("GETDATE()"));
}

#[test]
fn test_convert_stdin() {
    cmd()
        .args(["convert", "-i", "-", "--no-color"])
        .write_stdin("SELECT LENGTH(name) FROM t")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("LEN(name)"));
}

#[test]
fn test_convert_output_file() {
    let mut input = NamedTempFile::new().unwrap();
    writeln!(input, "SELECT NVL(a, 0) FROM t").unwrap();
    let output = NamedTempFile::new().unwrap();

    cmd()
        .args([
            "convert",
            "-i",
            input.path().to_str().unwrap(),
            "-o",
            output.path().to_str().unwrap(),
            "--no-color"
        ])
        .assert()
        .code(0);

    let written = std::fs::read_to_string(output.path()).unwrap();
    assert!(written.contains("ISNULL(a, 0)"));
}

#[test]
fn test_convert_file_not_found() {
    cmd()
        .args(["convert", "-i", "/nonexistent/query.sql"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_convert_missing_input() {
    cmd()
        .args(["convert", "--no-color"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No query given"));
}

#[test]
fn test_convert_reverse_direction() {
    cmd()
        .args([
            "convert",
            "-d",
            "azure-to-oracle",
            "-q",
            "SELECT ISNULL(a, b), GETDATE() FROM t",
            "--no-color"
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("NVL(a, b)").and(predicate::str::contains("SYSDATE")));
}

#[test]
fn test_convert_json_format() {
    cmd()
        .args([
            "convert",
            "-q",
            "SELECT NVL(a, b) FROM t",
            "-f",
            "json",
            "--no-color"
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"sql\""));
}

#[test]
fn test_convert_yaml_format() {
    cmd()
        .args([
            "convert",
            "-q",
            "SELECT NVL(a, b) FROM t",
            "-f",
            "yaml",
            "--no-color"
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("sql:"));
}

#[test]
fn test_check_clean_query() {
    cmd()
        .args([
            "check",
            "-q",
            "SELECT NVL(a, b) FROM t WHERE ROWNUM <= 5",
            "--no-color"
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("QA CHECKLIST REPORT"));
}

#[test]
fn test_check_unconvertible_listagg_distinct() {
    cmd()
        .args([
            "check",
            "-q",
            "SELECT LISTAGG(DISTINCT code, ',') WITHIN GROUP (ORDER BY code) FROM t",
            "--no-color"
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("manual"));
}

#[test]
fn test_invalid_statement_warns() {
    cmd()
        .args(["convert", "-q", "DELETE FROM t", "--no-color"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("unsupported-statement-type"));
}

#[test]
fn test_help() {
    cmd().arg("--help").assert().success();
}

#[test]
fn test_version() {
    cmd().arg("--version").assert().success();
}
