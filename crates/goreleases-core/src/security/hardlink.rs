//! Hard link validation.

use std::fs;
use std::path::Path;

use crate::FetchError;
use crate::Result;
use crate::types::ExtractionRoot;
use crate::types::SafePath;

/// A hard link whose target is a regular file already extracted into the
/// root.
///
/// Hard link targets are archive-relative, like entry paths, and are
/// subject to the same containment rule. The target must have been
/// materialized by an earlier entry: archives list the file before any
/// link to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeHardlink {
    link: SafePath,
    target: SafePath,
}

impl SafeHardlink {
    /// Validates a hard link from `link` to `target`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::PathTraversal`] if the target resolves outside the
    ///   root
    /// - [`FetchError::MissingLinkTarget`] if no regular file exists at the
    ///   target (a symlink there does not count)
    pub fn validate(link: SafePath, target: &Path, root: &ExtractionRoot) -> Result<Self> {
        let target = SafePath::for_entry(target, root)?;

        let is_file = fs::symlink_metadata(target.as_path())
            .map(|m| m.file_type().is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(FetchError::MissingLinkTarget {
                path: link.declared().to_path_buf(),
                target: target.declared().to_path_buf(),
            });
        }

        Ok(Self { link, target })
    }

    /// Returns the validated link location.
    #[must_use]
    pub fn link(&self) -> &SafePath {
        &self.link
    }

    /// Returns the validated, existing target.
    #[must_use]
    pub fn target(&self) -> &SafePath {
        &self.target
    }
}
