//! Container format detection.

use crate::FetchError;
use crate::Result;

/// Container formats release files come in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// Gzip-compressed tar archive.
    TarGz,
}

impl ContainerFormat {
    /// Returns the filename suffix of this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::TarGz => ".tar.gz",
        }
    }
}

/// Detects the container format from a release filename.
///
/// Only gzip-compressed tar archives can be extracted; `.zip`, `.msi` and
/// `.pkg` release files are rejected.
///
/// # Errors
///
/// Returns [`FetchError::UnsupportedExtension`] for anything else.
///
/// # Examples
///
/// ```
/// use goreleases_core::formats::detect::{ContainerFormat, detect_format};
///
/// assert_eq!(
///     detect_format("go1.21.0.linux-amd64.tar.gz").unwrap(),
///     ContainerFormat::TarGz
/// );
/// assert!(detect_format("go1.21.0.windows-amd64.zip").is_err());
/// ```
pub fn detect_format(filename: &str) -> Result<ContainerFormat> {
    let format = ContainerFormat::TarGz;
    if filename.len() > format.extension().len() && filename.ends_with(format.extension()) {
        Ok(format)
    } else {
        Err(FetchError::UnsupportedExtension {
            filename: filename.to_string(),
        })
    }
}
