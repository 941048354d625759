//! Validated safe path type.

use std::path::Path;
use std::path::PathBuf;

use crate::FetchError;
use crate::Result;
use crate::security::path::is_strictly_within;
use crate::security::path::resolve;

use super::ExtractionRoot;

/// An absolute, normalized path inside an extraction root.
///
/// Archive paths are resolved against the destination directory, so a
/// well-formed Go archive entry such as `go/bin/gofmt` lands at
/// `<dest>/go/bin/gofmt`. Only directory entries may resolve to the root
/// itself.
///
/// # Examples
///
/// ```no_run
/// use goreleases_core::types::{DestDir, SafePath};
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let root = DestDir::new("/tmp")?.reserve("go")?;
///
/// let file = SafePath::for_entry(Path::new("go/bin/gofmt"), &root)?;
/// assert!(file.as_path().ends_with("go/bin/gofmt"));
///
/// assert!(SafePath::for_entry(Path::new("go/../../etc/passwd"), &root).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafePath {
    path: PathBuf,
    declared: PathBuf,
}

impl SafePath {
    /// Validates the path of a file or link entry, or a hard-link target.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::PathTraversal`] unless the path resolves
    /// strictly below the root.
    pub fn for_entry(raw: &Path, root: &ExtractionRoot) -> Result<Self> {
        Self::validate(raw, root, false)
    }

    /// Validates the path of a directory entry, which may be the root itself.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::PathTraversal`] if the path resolves outside
    /// the root.
    pub fn for_directory(raw: &Path, root: &ExtractionRoot) -> Result<Self> {
        Self::validate(raw, root, true)
    }

    fn validate(raw: &Path, root: &ExtractionRoot, allow_root: bool) -> Result<Self> {
        let resolved = resolve(root.dest(), raw);
        let inside = is_strictly_within(root.as_path(), &resolved)
            || (allow_root && resolved == root.as_path());

        if !inside {
            return Err(FetchError::PathTraversal {
                path: raw.to_path_buf(),
                resolved,
            });
        }

        Ok(Self {
            path: resolved,
            declared: raw.to_path_buf(),
        })
    }

    /// Returns the absolute target path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Returns the path as declared in the archive.
    #[inline]
    #[must_use]
    pub fn declared(&self) -> &Path {
        &self.declared
    }
}
