//! Error conversion utilities for CLI.
//!
//! Converts goreleases-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use goreleases_core::FetchError;

/// Converts a `FetchError` into an anyhow error with a HINT where one helps.
///
/// `subject` names what was being fetched or listed.
pub fn convert_fetch_error(err: FetchError, subject: &str) -> anyhow::Error {
    match err {
        FetchError::PathTraversal { path, resolved } => anyhow!(
            "Security violation: {subject} contains entry '{}' resolving to '{}' outside the extraction root\n\
             HINT: The archive may be malicious. Nothing was left on disk.",
            path.display(),
            resolved.display()
        ),
        FetchError::LinkTraversal { link, target } => anyhow!(
            "Security violation: {subject} contains link '{}' pointing to '{}' outside the extraction root\n\
             HINT: The archive may be malicious. Nothing was left on disk.",
            link.display(),
            target.display()
        ),
        FetchError::DigestMismatch { expected, actual } => anyhow!(
            "Checksum mismatch for {subject}\n\
             Expected: {expected}\n\
             Actual:   {actual}\n\
             HINT: The download may be corrupted or tampered with. The extracted files were removed."
        ),
        FetchError::AlreadyExists { path } => anyhow!(
            "Directory '{}' already exists\n\
             HINT: Remove it or choose another destination.",
            path.display()
        ),
        FetchError::DestinationMissing { path } => anyhow!(
            "Destination '{}' does not exist\n\
             HINT: Create the directory first.",
            path.display()
        ),
        FetchError::UnsupportedExtension { filename } => anyhow!(
            "Cannot fetch '{filename}': only .tar.gz release files can be unpacked\n\
             HINT: Use --os/--arch to pick a platform with a .tar.gz archive."
        ),
        FetchError::HttpStatus { url, status: 404 } => anyhow!(
            "Not found: {url}\n\
             HINT: Run `goreleases list --all --long` to see available files."
        ),
        FetchError::FileNotFound {
            version, os, arch, ..
        } => anyhow!(
            "Release {version} has no archive for {os}/{arch}\n\
             HINT: Run `goreleases list --long` to see available platforms."
        ),
        err @ (FetchError::Request { .. } | FetchError::Interrupted { .. }) => {
            anyhow::Error::from(err).context(format!(
                "Network error while fetching {subject}\n\
                 HINT: Check your connection, or point --base-url at a mirror."
            ))
        }
        FetchError::Cancelled => anyhow!("Fetch of {subject} cancelled; partial files were removed"),
        _ => anyhow::Error::from(err).context(format!("Error fetching {subject}")),
    }
}
