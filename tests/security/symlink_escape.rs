//! Symlink escape attacks.

use std::fs;

use goreleases_core::FetchError;
use goreleases_core::test_utils::TarTestBuilder;
use tempfile::TempDir;

use crate::support::assert_traversal;
use crate::support::fetch_rejected;

#[test]
fn test_absolute_target_rejected() {
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new()
        .add_directory("go/")
        .add_symlink("go/passwd", "/etc/passwd")
        .build_gz();

    let err = fetch_rejected(archive, temp.path());
    assert!(matches!(err, FetchError::LinkTraversal { .. }), "got {err}");
}

#[test]
fn test_parent_traversal_target_rejected() {
    for target in ["../../etc/passwd", "../../../tmp", ".."] {
        let temp = TempDir::new().unwrap();
        let archive = TarTestBuilder::new()
            .add_directory("go/")
            .add_directory("go/bin/")
            .add_symlink("go/bin/escape", target)
            .build_gz();

        let err = fetch_rejected(archive, temp.path());
        assert!(
            matches!(err, FetchError::LinkTraversal { .. }),
            "{target} should be rejected, got {err}"
        );
    }
}

#[test]
fn test_inner_parent_dir_rejected() {
    // Lexically inside the root, but `lib/..` depends on what `lib` is.
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new()
        .add_directory("go/")
        .add_directory("go/bin/")
        .add_symlink("go/bin/tool", "lib/../gofmt")
        .build_gz();

    let err = fetch_rejected(archive, temp.path());
    assert_traversal(&err);
}

#[cfg(unix)]
#[test]
fn test_chained_symlinks_cannot_reach_outside() {
    // `go/a/up` points at `go/`, so `go/a/up/x -> ..` would physically be
    // `<dest>/go/..`, the destination itself.
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new()
        .add_directory("go/")
        .add_directory("go/a/")
        .add_symlink("go/a/up", "..")
        .add_symlink("go/a/up/x", "..")
        .build_gz();

    let err = fetch_rejected(archive, temp.path());
    assert_traversal(&err);
}

#[cfg(unix)]
#[test]
fn test_write_through_symlinked_directory_rejected() {
    let temp = TempDir::new().unwrap();
    let outside = temp.path().join("outside");
    fs::create_dir(&outside).unwrap();

    let archive = TarTestBuilder::new()
        .add_directory("go/")
        .add_symlink("go/dir", "../../outside")
        .add_file("go/dir/payload", b"payload")
        .build_gz();

    let err = fetch_rejected(archive, temp.path());
    assert_traversal(&err);
    assert!(!outside.join("payload").exists());
    assert!(outside.exists(), "files outside the root are never removed");
}

#[test]
fn test_link_at_root_path_rejected() {
    // A link entry may never replace the root directory.
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new()
        .add_symlink("go", "../../")
        .build_gz();

    let err = fetch_rejected(archive, temp.path());
    assert_traversal(&err);
}
