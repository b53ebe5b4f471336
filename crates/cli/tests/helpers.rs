use std::fs;
use std::path::Path;

use rackdiff::canonicalize_or_current;
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_returns_cwd_for_dot() {
    let result = canonicalize_or_current(Path::new(".")).expect("canonicalize");
    assert_eq!(result, std::env::current_dir().expect("cwd"));
}

#[test]
fn canonicalize_or_current_resolves_existing_path() {
    let tmp = tempdir().expect("tempdir");
    let nested = tmp.path().join("nested");
    fs::create_dir_all(&nested).expect("create nested");

    let result = canonicalize_or_current(&nested).expect("canonicalize nested");
    assert_eq!(result, nested.canonicalize().expect("canonicalize nested"));
}

#[test]
fn canonicalize_or_current_keeps_missing_absolute_path() {
    let tmp = tempdir().expect("tempdir");
    let missing = tmp.path().join("missing.json");
    assert_eq!(canonicalize_or_current(&missing).expect("resolve"), missing);
}

#[test]
fn canonicalize_or_current_joins_missing_relative_path_onto_cwd() {
    let result = canonicalize_or_current(Path::new("does/not/exist.json")).expect("resolve");
    assert!(result.is_absolute());
    assert!(result.ends_with("does/not/exist.json"));
}
