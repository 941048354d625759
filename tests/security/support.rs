//! Shared fixtures for the security tests.

use std::io::Cursor;
use std::path::Path;

use goreleases_core::Download;
use goreleases_core::ErrorClass;
use goreleases_core::FetchConfig;
use goreleases_core::FetchError;
use goreleases_core::FileKind;
use goreleases_core::Fetcher;
use goreleases_core::NoopProgress;
use goreleases_core::ReleaseFile;
use goreleases_core::Result;
use goreleases_core::Stage;
use goreleases_core::Transport;
use goreleases_core::test_utils::sha256_hex;

/// Serves one archive from memory.
pub struct MemoryTransport(pub Vec<u8>);

impl Transport for MemoryTransport {
    fn open(&self, _name: &str) -> Result<Download> {
        Ok(Download::new(Cursor::new(self.0.clone())))
    }
}

/// Fetches a gzip-compressed tar into `dest` with the correct digest and
/// returns the error it must fail with.
///
/// Checks that the fetch ended rolled back and that `<dest>/go` is gone.
pub fn fetch_rejected(archive: Vec<u8>, dest: &Path) -> FetchError {
    let file = ReleaseFile {
        filename: "go1.21.0.linux-amd64.tar.gz".into(),
        os: "linux".into(),
        arch: "amd64".into(),
        version: "go1.21.0".into(),
        sha256: sha256_hex(&archive),
        size: archive.len() as u64,
        kind: FileKind::Archive,
    };
    let transport = MemoryTransport(archive);
    let config = FetchConfig::default();
    let mut fetcher = Fetcher::new(&transport, &config);

    let err = fetcher
        .fetch(&file, dest, &mut NoopProgress)
        .expect_err("hostile archive must be rejected");

    assert_eq!(fetcher.stage(), Stage::RolledBack);
    assert!(
        !dest.join("go").exists(),
        "extraction root must be removed after {err}"
    );
    err
}

/// Asserts that `err` is a containment violation.
pub fn assert_traversal(err: &FetchError) {
    assert_eq!(err.class(), ErrorClass::PathTraversal, "unexpected error: {err}");
    assert!(err.is_security_violation());
}
