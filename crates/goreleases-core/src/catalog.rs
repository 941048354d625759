//! Release catalog: available releases and the files they ship.
//!
//! The download server publishes its catalog as JSON under `?mode=json`
//! (supported releases) and `?mode=json&include=all` (every release ever
//! published). Both decode into [`Release`] records.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::FetchError;
use crate::Result;
use crate::transport::Transport;

/// Catalog query for supported releases.
const SUPPORTED_QUERY: &str = "?mode=json";

/// Catalog query for all releases.
const ALL_QUERY: &str = "?mode=json&include=all";

/// Kind of a release file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Binary distribution as an archive (`.tar.gz`, `.zip`).
    Archive,
    /// Platform installer (`.msi`, `.pkg`).
    Installer,
    /// Source distribution.
    Source,
}

impl FileKind {
    /// Returns the name used in the catalog.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Installer => "installer",
            Self::Source => "source",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "archive" => Ok(Self::Archive),
            "installer" => Ok(Self::Installer),
            "source" => Ok(Self::Source),
            other => Err(format!(
                "unknown file kind {other:?}, expected archive, installer or source"
            )),
        }
    }
}

/// A single downloadable file of a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseFile {
    /// File name, relative to the download base URL.
    pub filename: String,
    /// Operating system in Go naming (`linux`, `darwin`, ...). Empty for source.
    #[serde(default)]
    pub os: String,
    /// Architecture in Go naming (`amd64`, `arm64`, ...). Empty for source.
    #[serde(default)]
    pub arch: String,
    /// Release version, e.g. `go1.21.0`.
    #[serde(default)]
    pub version: String,
    /// Expected SHA-256 of the file, lowercase hex.
    pub sha256: String,
    /// File size in bytes.
    #[serde(default)]
    pub size: u64,
    /// File kind.
    pub kind: FileKind,
}

/// A published release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Version, e.g. `go1.21.0`.
    pub version: String,
    /// Whether this is a stable release.
    pub stable: bool,
    /// Files of this release.
    #[serde(default)]
    pub files: Vec<ReleaseFile>,
}

/// Lists currently supported releases, newest first.
pub fn list_supported(transport: &dyn Transport) -> Result<Vec<Release>> {
    list(transport, SUPPORTED_QUERY)
}

/// Lists all published releases, newest first.
pub fn list_all(transport: &dyn Transport) -> Result<Vec<Release>> {
    list(transport, ALL_QUERY)
}

fn list(transport: &dyn Transport, query: &str) -> Result<Vec<Release>> {
    let download = transport.open(query)?;
    let releases = parse_releases(download.body)?;
    debug!(query, count = releases.len(), "decoded release catalog");
    Ok(releases)
}

/// Decodes a JSON release catalog.
pub fn parse_releases(reader: impl std::io::Read) -> Result<Vec<Release>> {
    serde_json::from_reader(reader).map_err(|source| {
        if source.is_io() {
            FetchError::Interrupted {
                source: source.into(),
            }
        } else {
            FetchError::InvalidCatalog { source }
        }
    })
}

/// Finds the file of `release` for the given platform and kind.
///
/// # Errors
///
/// Returns [`FetchError::FileNotFound`] if the release has no such file.
///
/// # Examples
///
/// ```
/// use goreleases_core::catalog::{FileKind, Release, ReleaseFile, find_file};
///
/// let release = Release {
///     version: "go1.21.0".into(),
///     stable: true,
///     files: vec![ReleaseFile {
///         filename: "go1.21.0.linux-amd64.tar.gz".into(),
///         os: "linux".into(),
///         arch: "amd64".into(),
///         version: "go1.21.0".into(),
///         sha256: "d0398903a16ba2232b389fb31032ddf57cac34efda306a0eebac34f0965a0742".into(),
///         size: 66_655_878,
///         kind: FileKind::Archive,
///     }],
/// };
///
/// let file = find_file(&release, "linux", "amd64", FileKind::Archive).unwrap();
/// assert_eq!(file.filename, "go1.21.0.linux-amd64.tar.gz");
/// assert!(find_file(&release, "darwin", "arm64", FileKind::Archive).is_err());
/// ```
pub fn find_file<'a>(
    release: &'a Release,
    os: &str,
    arch: &str,
    kind: FileKind,
) -> Result<&'a ReleaseFile> {
    release
        .files
        .iter()
        .find(|f| f.os == os && f.arch == arch && f.kind == kind)
        .ok_or_else(|| FetchError::FileNotFound {
            version: release.version.clone(),
            os: os.to_string(),
            arch: arch.to_string(),
            kind,
        })
}

/// Returns the first stable release of a newest-first listing.
pub fn latest_stable(releases: &[Release]) -> Option<&Release> {
    releases.iter().find(|r| r.stable)
}

/// Returns the release with the given version.
///
/// Accepts both `go1.21.0` and `1.21.0`.
pub fn find_release<'a>(releases: &'a [Release], version: &str) -> Option<&'a Release> {
    let wanted = version.strip_prefix("go").unwrap_or(version);
    releases
        .iter()
        .find(|r| r.version.strip_prefix("go").unwrap_or(&r.version) == wanted)
}

/// Operating system of this host in Go naming.
#[must_use]
pub fn host_os() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

/// Architecture of this host in Go naming.
#[must_use]
pub fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "arm" => "armv6l",
        "powerpc64" => "ppc64",
        "powerpc64le" => "ppc64le",
        other => other,
    }
}
