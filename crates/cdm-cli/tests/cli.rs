//! Integration test: run the `cdscdm` binary end to end and check its exit
//! codes and stdout.

use std::path::PathBuf;
use std::process::Command;

fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn cdscdm(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_cdscdm"))
        .args(args)
        .current_dir(repo_root())
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run cdscdm")
}

#[test]
fn test_check_file_compliant() {
    let out = cdscdm(&["check-file", "testdata/cdm_grid.json"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
}

#[test]
fn test_check_file_with_errors() {
    let out = cdscdm(&["check-file", "--format", "json", "testdata/bad_grid.json"]);
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 15);
    for line in stdout.lines() {
        let event: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(event["level"] == "warning" || event["level"] == "error");
    }
}

#[test]
fn test_check_file_fatal() {
    let out = cdscdm(&["check-file", "testdata/bad_wrong-file-format.json"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("cannot decode dataset"), "{stderr}");
}

#[test]
fn test_cmor_to_cdm_stdout() {
    let out = cdscdm(&["cmor-to-cdm", "testdata/cmor"]);
    assert_eq!(out.status.code(), Some(0));
    let schema: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(schema["coords"]["leadtime"], serde_json::json!({"units": "hours"}));
    assert!(out.stdout.ends_with(b"\n"));
}

#[test]
fn test_compiled_schema_drives_the_checker() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("cdm.json");
    let schema_arg = schema_path.to_str().unwrap();

    let out = cdscdm(&["cmor-to-cdm", "testdata/cmor", "--out", schema_arg]);
    assert_eq!(out.status.code(), Some(0));

    // The tiny testdata schema has no `tas`, `plev` or `lat`/`lon`.
    let out = cdscdm(&[
        "--schema",
        schema_arg,
        "check-file",
        "--format",
        "json",
        "testdata/cdm_grid.json",
    ]);
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("unexpected name"));
    assert!(stdout.contains("unknown dimension"));
}
