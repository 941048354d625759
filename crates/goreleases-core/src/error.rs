//! Error types for release fetching and extraction.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::FileKind;

/// Result type alias using `FetchError`.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Broad class of a [`FetchError`].
///
/// Callers usually only need to know which part of the pipeline failed,
/// not the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Bad destination, unsupported file, malformed expected digest.
    /// Reported before any network request or filesystem mutation.
    Precondition,
    /// Connection failure, non-success HTTP status, broken download stream.
    Network,
    /// Malformed compression or archive structure.
    Format,
    /// An entry or link target escapes the extraction root.
    PathTraversal,
    /// The downloaded bytes do not match the expected digest.
    Integrity,
    /// Filesystem failure while materializing an entry.
    Filesystem,
    /// Release catalog could not be decoded or has no matching file.
    Catalog,
    /// The caller cancelled the operation.
    Cancelled,
}

/// Errors that can occur while fetching a release.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Destination directory does not exist.
    #[error("destination does not exist: {path}")]
    DestinationMissing {
        /// The destination that was given.
        path: PathBuf,
    },

    /// Destination exists but is not a directory.
    #[error("destination is not a directory: {path}")]
    NotADirectory {
        /// The destination that was given.
        path: PathBuf,
    },

    /// Destination directory is not writable by this process.
    #[error("destination is not writable: {path}")]
    DestinationNotWritable {
        /// The canonical destination.
        path: PathBuf,
    },

    /// Destination could not be inspected.
    #[error("cannot inspect destination {path}: {source}")]
    Destination {
        /// The destination that was given.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The reserved extraction root already exists in the destination.
    #[error("directory {path} already exists")]
    AlreadyExists {
        /// The existing extraction root.
        path: PathBuf,
    },

    /// The release file is not a gzip-compressed tar archive.
    #[error("file extension not supported, only .tar.gz is supported: {filename}")]
    UnsupportedExtension {
        /// The rejected filename.
        filename: String,
    },

    /// The expected digest is not a SHA-256 hex string.
    #[error("invalid sha256 digest {digest:?}: expected 64 hexadecimal characters")]
    InvalidDigest {
        /// The rejected digest.
        digest: String,
    },

    /// HTTP request could not be performed.
    #[error("downloading {url}: {source}")]
    Request {
        /// Requested URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status.
    #[error("downloading {url}: status {status}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The download stream broke while it was being read.
    #[error("download interrupted: {source}")]
    Interrupted {
        /// Error reported by the download stream.
        #[source]
        source: std::io::Error,
    },

    /// Compressed or archive data is malformed.
    #[error("corrupt archive: {source}")]
    CorruptArchive {
        /// Error reported by the decoder or tar parser.
        #[source]
        source: std::io::Error,
    },

    /// Stream ended before the archive was complete.
    #[error("unexpected end of archive stream: {source}")]
    TruncatedArchive {
        /// Error reported by the decoder or tar parser.
        #[source]
        source: std::io::Error,
    },

    /// An entry header carries an unusable field.
    #[error("invalid archive entry {path}: {reason}")]
    InvalidEntry {
        /// Path of the entry, as declared.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// Regular file content did not match the declared size.
    #[error("extracting {path}: copied {actual} bytes, expected {expected}")]
    SizeMismatch {
        /// Path of the entry, as declared.
        path: PathBuf,
        /// Size declared in the header.
        expected: u64,
        /// Bytes actually copied.
        actual: u64,
    },

    /// Entry type is neither file, directory, link, nor skippable.
    #[error("unsupported tar entry type {entry_type:?} for {path}")]
    UnsupportedEntryType {
        /// Path of the entry, as declared.
        path: PathBuf,
        /// Raw type flag.
        entry_type: char,
    },

    /// Hard link refers to a file not extracted earlier in the archive.
    #[error("hard link {path} refers to missing file {target}")]
    MissingLinkTarget {
        /// Path of the link, as declared.
        path: PathBuf,
        /// Declared link target.
        target: PathBuf,
    },

    /// Entry path resolves outside the extraction root.
    #[error("bad path {path:?} in archive, resulting in path {resolved:?} outside extraction root")]
    PathTraversal {
        /// Path as declared in the archive.
        path: PathBuf,
        /// Normalized absolute path.
        resolved: PathBuf,
    },

    /// Link target resolves outside the extraction root.
    #[error("link {link:?} in archive points to {target:?}, outside extraction root")]
    LinkTraversal {
        /// Path of the link, as declared.
        link: PathBuf,
        /// Link target, as declared.
        target: PathBuf,
    },

    /// Downloaded bytes do not match the expected digest.
    #[error("checksum mismatch, got {actual}, expected {expected}")]
    DigestMismatch {
        /// Digest from the release descriptor.
        expected: String,
        /// Digest of the downloaded bytes.
        actual: String,
    },

    /// Filesystem operation failed while materializing an entry.
    #[error("{path}: {source}")]
    Filesystem {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Release catalog could not be decoded.
    #[error("invalid release catalog: {source}")]
    InvalidCatalog {
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// No file in the release matches the requested platform and kind.
    #[error("no {kind} file for {os}/{arch} in release {version}")]
    FileNotFound {
        /// Release version searched.
        version: String,
        /// Requested operating system.
        os: String,
        /// Requested architecture.
        arch: String,
        /// Requested kind.
        kind: FileKind,
    },

    /// Operation was cancelled.
    #[error("fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// Wraps an I/O error from the decoder or tar parser.
    ///
    /// Truncation is reported separately from other corruption.
    pub(crate) fn from_stream(source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::TruncatedArchive { source }
        } else {
            Self::CorruptArchive { source }
        }
    }

    /// Wraps a filesystem error with the path being written.
    pub(crate) fn filesystem(path: &Path, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns the class of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use goreleases_core::ErrorClass;
    /// use goreleases_core::FetchError;
    ///
    /// let err = FetchError::DigestMismatch {
    ///     expected: "aa".into(),
    ///     actual: "bb".into(),
    /// };
    /// assert_eq!(err.class(), ErrorClass::Integrity);
    /// ```
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::DestinationMissing { .. }
            | Self::NotADirectory { .. }
            | Self::DestinationNotWritable { .. }
            | Self::Destination { .. }
            | Self::AlreadyExists { .. }
            | Self::UnsupportedExtension { .. }
            | Self::InvalidDigest { .. } => ErrorClass::Precondition,
            Self::Request { .. } | Self::HttpStatus { .. } | Self::Interrupted { .. } => {
                ErrorClass::Network
            }
            Self::CorruptArchive { .. }
            | Self::TruncatedArchive { .. }
            | Self::InvalidEntry { .. }
            | Self::SizeMismatch { .. }
            | Self::UnsupportedEntryType { .. }
            | Self::MissingLinkTarget { .. } => ErrorClass::Format,
            Self::PathTraversal { .. } | Self::LinkTraversal { .. } => ErrorClass::PathTraversal,
            Self::DigestMismatch { .. } => ErrorClass::Integrity,
            Self::Filesystem { .. } => ErrorClass::Filesystem,
            Self::InvalidCatalog { .. } | Self::FileNotFound { .. } => ErrorClass::Catalog,
            Self::Cancelled => ErrorClass::Cancelled,
        }
    }

    /// Returns `true` if the archive tried to escape the extraction root or
    /// its content did not match the expected digest.
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self.class(),
            ErrorClass::PathTraversal | ErrorClass::Integrity
        )
    }

    /// Returns `true` if the error was raised before any side effect.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self.class(), ErrorClass::Precondition)
    }

    /// Returns the offending path, if the error carries one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::DestinationMissing { path }
            | Self::NotADirectory { path }
            | Self::DestinationNotWritable { path }
            | Self::Destination { path, .. }
            | Self::AlreadyExists { path }
            | Self::InvalidEntry { path, .. }
            | Self::SizeMismatch { path, .. }
            | Self::UnsupportedEntryType { path, .. }
            | Self::MissingLinkTarget { path, .. }
            | Self::PathTraversal { path, .. }
            | Self::Filesystem { path, .. } => Some(path),
            Self::LinkTraversal { link, .. } => Some(link),
            _ => None,
        }
    }
}
