//! Hard link attacks.

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
        .add_hardlink("go/passwd", "/etc/passwd")
        .build_gz();

    let err = fetch_rejected(archive, temp.path());
    assert!(matches!(err, FetchError::PathTraversal { .. }), "got {err}");
}

#[test]
fn test_parent_traversal_target_rejected() {
    for target in ["../../etc/passwd", "go/../../etc/passwd", "go/bin/../../x"] {
        let temp = TempDir::new().unwrap();
        let archive = TarTestBuilder::new()
            .add_directory("go/")
            .add_hardlink("go/link", target)
            .build_gz();

        let err = fetch_rejected(archive, temp.path());
        assert_traversal(&err);
    }
}

#[cfg(unix)]
#[test]
fn test_existing_file_outside_root_not_linked() {
    use std::os::unix::fs::MetadataExt;

    let temp = TempDir::new().unwrap();
    let secret = temp.path().join("secret");
    fs::write(&secret, b"do not touch").unwrap();

    let archive = TarTestBuilder::new()
        .add_directory("go/")
        .add_hardlink("go/stolen", "secret")
        .build_gz();

    let err = fetch_rejected(archive, temp.path());
    assert_traversal(&err);
    let meta = fs::metadata(&secret).unwrap();
    assert_eq!(meta.nlink(), 1);
    assert_eq!(fs::read(&secret).unwrap(), b"do not touch");
}

#[test]
fn test_target_must_be_regular_file() {
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new()
        .add_directory("go/")
        .add_directory("go/lib/")
        .add_hardlink("go/lib-link", "go/lib")
        .build_gz();

    let err = fetch_rejected(archive, temp.path());
    assert!(
        matches!(err, FetchError::MissingLinkTarget { .. }),
        "got {err}"
    );
}

#[cfg(unix)]
#[test]
fn test_target_through_symlink_rejected() {
    // Hard-linking a symlink would pin whatever it points to.
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new()
        .add_directory("go/")
        .add_file("go/VERSION", b"go1.21.0")
        .add_symlink("go/alias", "VERSION")
        .add_hardlink("go/pinned", "go/alias")
        .build_gz();

    let err = fetch_rejected(archive, temp.path());
    assert!(
        matches!(err, FetchError::MissingLinkTarget { .. }),
        "got {err}"
    );
}

#[test]
fn test_forward_reference_rejected() {
    let temp = TempDir::new().unwrap();
    let archive = TarTestBuilder::new()
        .add_directory("go/")
        .add_hardlink("go/bin/gofmt", "go/pkg/tool/gofmt")
        .add_file("go/pkg/tool/gofmt", b"binary")
        .build_gz();

    let err = fetch_rejected(archive, temp.path());
    match err {
        FetchError::MissingLinkTarget { path, target } => {
            assert_eq!(path.to_str(), Some("go/bin/gofmt"));
            assert_eq!(target.to_str(), Some("go/pkg/tool/gofmt"));
        }
        other => panic!("expected MissingLinkTarget, got {other}"),
    }
}
