//! One test per documented exit code, driving the real binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn run_merge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_zeromerge"))
        .args(args)
        .output()
        .unwrap_or_else(|error| panic!("failed to run zeromerge: {error}"))
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("scratch paths are UTF-8")
}

fn scratch_pair(dir: &TempDir, left: &[u8], right: &[u8]) -> (PathBuf, PathBuf) {
    let left_path = dir.path().join("left");
    let right_path = dir.path().join("right");
    fs::write(&left_path, left).expect("seed left");
    fs::write(&right_path, right).expect("seed right");
    (left_path, right_path)
}

#[test]
fn code_0_for_identical_files() {
    let dir = TempDir::new().expect("tempdir");
    let (left, right) = scratch_pair(&dir, &[1, 2, 3], &[1, 2, 3]);
    let output = run_merge(&[path_arg(&left), path_arg(&right)]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
    assert!(stdout.contains("files are identical"));
}

#[test]
fn code_1_for_help() {
    let output = run_merge(&["-h"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn code_2_for_conflicting_options() {
    let output = run_merge(&["-s", "-e", "a", "b"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).expect("stderr is UTF-8");
    assert!(stderr.contains("mutually exclusive"));
}

#[test]
fn code_3_for_three_operands() {
    let dir = TempDir::new().expect("tempdir");
    let (left, right) = scratch_pair(&dir, &[1], &[1]);
    let output = run_merge(&[path_arg(&left), path_arg(&right), path_arg(&left)]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr).expect("stderr is UTF-8");
    assert!(stderr.contains("found 3"));
}

#[test]
fn code_4_for_missing_file() {
    let dir = TempDir::new().expect("tempdir");
    let (left, _) = scratch_pair(&dir, &[1], &[1]);
    let missing = dir.path().join("does-not-exist");
    let output = run_merge(&[path_arg(&left), path_arg(&missing)]);
    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8(output.stderr).expect("stderr is UTF-8");
    assert!(stderr.contains("does-not-exist"));
}

#[test]
fn code_5_for_directory_operand() {
    let dir = TempDir::new().expect("tempdir");
    let (left, _) = scratch_pair(&dir, &[1], &[1]);
    let output = run_merge(&[path_arg(&left), path_arg(dir.path())]);
    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8(output.stderr).expect("stderr is UTF-8");
    assert!(stderr.contains("not a regular file"));
}

#[cfg(unix)]
#[test]
fn code_6_for_hard_linked_files() {
    let dir = TempDir::new().expect("tempdir");
    let original = dir.path().join("original");
    let link = dir.path().join("link");
    fs::write(&original, [1, 2, 3]).expect("seed file");
    fs::hard_link(&original, &link).expect("create hard link");
    let output = run_merge(&[path_arg(&original), path_arg(&link)]);
    assert_eq!(output.status.code(), Some(6));
}

#[test]
fn code_7_for_length_mismatch_with_same_size() {
    let dir = TempDir::new().expect("tempdir");
    let (left, right) = scratch_pair(&dir, &[1, 2, 3], &[1, 2]);
    let output = run_merge(&["--same-size", path_arg(&left), path_arg(&right)]);
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn code_8_for_empty_file() {
    let dir = TempDir::new().expect("tempdir");
    let (left, right) = scratch_pair(&dir, &[], &[1, 2]);
    let output = run_merge(&[path_arg(&left), path_arg(&right)]);
    assert_eq!(output.status.code(), Some(8));
}

#[test]
fn code_9_for_conflicting_data() {
    let dir = TempDir::new().expect("tempdir");
    let (left, right) = scratch_pair(&dir, &[5], &[7]);
    let output = run_merge(&[path_arg(&left), path_arg(&right)]);
    assert_eq!(output.status.code(), Some(9));
    let stderr = String::from_utf8(output.stderr).expect("stderr is UTF-8");
    assert!(stderr.contains("offset 1"));
}

#[test]
fn quiet_changes_output_but_never_exit_codes() {
    let dir = TempDir::new().expect("tempdir");
    let (left, right) = scratch_pair(&dir, &[5], &[7]);
    let output = run_merge(&["-q", path_arg(&left), path_arg(&right)]);
    assert_eq!(output.status.code(), Some(9));
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
}
