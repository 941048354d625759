//! High-level public API for fetching releases.

use std::path::Path;

use crate::FetchConfig;
use crate::FetchReport;
use crate::Result;
use crate::catalog::Release;
use crate::catalog::ReleaseFile;
use crate::extraction::Fetcher;
use crate::report::NoopProgress;
use crate::report::ProgressCallback;
use crate::transport::HttpTransport;

/// Fetches `file` from the official download server into `dest`.
///
/// Creates `dest/go`, which must not exist yet.
///
/// # Errors
///
/// See [`Fetcher::fetch`].
///
/// # Examples
///
/// ```no_run
/// use goreleases_core::catalog::{FileKind, ReleaseFile};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let file = ReleaseFile {
///     filename: "go1.21.0.linux-amd64.tar.gz".into(),
///     os: "linux".into(),
///     arch: "amd64".into(),
///     version: "go1.21.0".into(),
///     sha256: "d0398903a16ba2232b389fb31032ddf57cac34efda306a0eebac34f0965a0742".into(),
///     size: 66_655_878,
///     kind: FileKind::Archive,
/// };
/// let report = goreleases_core::fetch(&file, "/usr/local")?;
/// println!("extracted {} files", report.files);
/// # Ok(())
/// # }
/// ```
pub fn fetch<P: AsRef<Path>>(file: &ReleaseFile, dest: P) -> Result<FetchReport> {
    fetch_with_config(file, dest, &FetchConfig::default(), &mut NoopProgress)
}

/// Fetches `file` into `dest` using `config`, reporting progress.
///
/// # Errors
///
/// See [`Fetcher::fetch`].
pub fn fetch_with_config<P: AsRef<Path>>(
    file: &ReleaseFile,
    dest: P,
    config: &FetchConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<FetchReport> {
    let transport = HttpTransport::new(config)?;
    Fetcher::new(&transport, config).fetch(file, dest, progress)
}

/// Lists releases from the server configured in `config`.
///
/// With `include_all`, archived releases are listed too.
///
/// # Errors
///
/// Returns a network error if the catalog cannot be downloaded and a
/// catalog error if it cannot be decoded.
pub fn list_releases(config: &FetchConfig, include_all: bool) -> Result<Vec<Release>> {
    let transport = HttpTransport::new(config)?;
    if include_all {
        crate::catalog::list_all(&transport)
    } else {
        crate::catalog::list_supported(&transport)
    }
}
