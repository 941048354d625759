//! Archive entry kinds.

use std::path::PathBuf;

/// What an archive entry describes.
///
/// # Examples
///
/// ```
/// use goreleases_core::types::EntryKind;
/// use std::path::PathBuf;
///
/// let link = EntryKind::Symlink {
///     target: PathBuf::from("../pkg/tool"),
/// };
/// assert_eq!(link.name(), "symlink");
/// assert!(EntryKind::Skipped.is_skipped());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file.
    File,

    /// Directory.
    Directory,

    /// Hard link to a file extracted earlier in the same archive.
    HardLink {
        /// Archive-relative path of the linked file.
        target: PathBuf,
    },

    /// Symbolic link.
    Symlink {
        /// Target text, relative to the link's directory.
        target: PathBuf,
    },

    /// Metadata-only record (PAX global header, GNU sparse) with nothing to
    /// materialize.
    Skipped,

    /// Any other type (device, FIFO, contiguous file, ...), by type flag.
    Unsupported(char),
}

impl EntryKind {
    /// Returns a short name for logs and reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::HardLink { .. } => "hardlink",
            Self::Symlink { .. } => "symlink",
            Self::Skipped => "skipped",
            Self::Unsupported(_) => "unsupported",
        }
    }

    /// Returns `true` for entries that are counted but not materialized.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}
