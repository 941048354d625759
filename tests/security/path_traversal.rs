//! Path traversal through entry names.

use std::fs;

use goreleases_core::FetchError;
use goreleases_core::test_utils::TarTestBuilder;
use tempfile::TempDir;

use crate::support::assert_traversal;
use crate::support::fetch_rejected;

#[test]
fn test_parent_dir_escapes_rejected() {
    for name in [
        "../etc/passwd",
        "../../etc/passwd",
        "go/../../etc/passwd",
        "go/bin/../../../etc/passwd",
    ] {
        let temp = TempDir::new().unwrap();
        let archive = TarTestBuilder::new()
            .add_directory("go/")
            .add_raw_file(name, b"root:x:0:0")
            .build_gz();

        let err = fetch_rejected(archive, temp.path());
        assert!(
            matches!(err, FetchError::PathTraversal { .. }),
            "{name} should be rejected, got {err}"
        );
        assert!(!temp.path().join("etc").exists());
    }
}

#[test]
fn test_sibling_of_root_rejected() {
    // Resolves inside the destination but outside the extraction root.
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new()
        .add_directory("go/")
        .add_raw_file("go/../escape", b"payload")
        .build_gz();

    let err = fetch_rejected(archive, temp.path());
    assert_traversal(&err);
    assert!(!temp.path().join("escape").exists());
}

#[test]
fn test_entry_outside_release_root_rejected() {
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new()
        .add_directory("go/")
        .add_file("go/VERSION", b"go1.21.0")
        .add_file("README", b"outside the go/ tree")
        .build_gz();

    let err = fetch_rejected(archive, temp.path());
    assert_traversal(&err);
    assert!(!temp.path().join("README").exists());
}

#[cfg(unix)]
#[test]
fn test_absolute_paths_rejected() {
    for name in ["/etc/passwd", "/tmp/malicious"] {
        let temp = TempDir::new().unwrap();
        let archive = TarTestBuilder::new()
            .add_directory("go/")
            .add_raw_file(name, b"payload")
            .build_gz();

        let err = fetch_rejected(archive, temp.path());
        assert_traversal(&err);
    }
}

#[test]
fn test_nested_destination_escape() {
    // The payload would land next to the destination, not just next to
    // the root.
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("sdk").join("current");
    fs::create_dir_all(&dest).unwrap();

    let archive = TarTestBuilder::new()
        .add_directory("go/")
        .add_raw_file("go/../../escape", b"payload")
        .build_gz();

    let err = fetch_rejected(archive, &dest);
    assert_traversal(&err);
    assert!(!temp.path().join("sdk").join("escape").exists());
    assert!(dest.exists(), "destination itself must survive rollback");
}

#[test]
fn test_directory_escape_rejected() {
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new()
        .add_directory("go/")
        .add_raw_directory("go/../../outside/")
        .build_gz();

    let err = fetch_rejected(archive, temp.path());
    assert_traversal(&err);
    assert!(!temp.path().parent().unwrap().join("outside").exists());
}

#[test]
fn test_earlier_entries_rolled_back() {
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new()
        .add_directory("go/")
        .add_directory("go/bin/")
        .add_file("go/bin/go", b"#!/bin/sh\n")
        .add_file("go/VERSION", b"go1.21.0")
        .add_raw_file("go/../../../etc/cron.d/evil", b"* * * * * root sh")
        .build_gz();

    let err = fetch_rejected(archive, temp.path());
    assert!(matches!(err, FetchError::PathTraversal { .. }));
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_error_reports_declared_and_resolved_paths() {
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new()
        .add_raw_file("go/../../etc/passwd", b"x")
        .build_gz();

    match fetch_rejected(archive, temp.path()) {
        FetchError::PathTraversal { path, resolved } => {
            assert_eq!(path.to_str(), Some("go/../../etc/passwd"));
            assert!(resolved.ends_with("etc/passwd"));
            assert!(!resolved.starts_with(temp.path().canonicalize().unwrap()));
        }
        other => panic!("expected PathTraversal, got {other}"),
    }
}
