//! Validated safe symlink type.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::FetchError;
use crate::Result;
use crate::security::path::is_within;
use crate::security::path::normalize;

use super::ExtractionRoot;
use super::SafePath;

/// A symbolic link whose target stays inside the extraction root.
///
/// The target must be relative and normalized: `..` may only appear as a
/// leading run (`../../lib/x` is fine, `lib/../x` is not). Resolved against
/// the link's parent directory, it must stay within the root.
///
/// This is stricter than containment alone. An absolute target is rejected
/// rather than rebased under the destination, and `lib/../x` is rejected
/// even though it resolves inside the root.
///
/// Lexical validation happens in [`validate`](Self::validate), before
/// anything is created. [`confirm`](Self::confirm) repeats the check from
/// the physical parent directory once it exists, which catches links that
/// reach the root through previously extracted symlinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeSymlink {
    link: SafePath,
    target: PathBuf,
}

impl SafeSymlink {
    /// Validates `target` for a link at `link`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidEntry`] if the target is empty
    /// - [`FetchError::LinkTraversal`] if the target is absolute, not
    ///   normalized, or resolves outside the root
    pub fn validate(link: SafePath, target: &Path, root: &ExtractionRoot) -> Result<Self> {
        if target.as_os_str().is_empty() {
            return Err(FetchError::InvalidEntry {
                path: link.declared().to_path_buf(),
                reason: "symlink without target".to_string(),
            });
        }

        let escape = || FetchError::LinkTraversal {
            link: link.declared().to_path_buf(),
            target: target.to_path_buf(),
        };

        let mut seen_normal = false;
        for component in target.components() {
            match component {
                Component::RootDir | Component::Prefix(_) => return Err(escape()),
                Component::ParentDir if seen_normal => return Err(escape()),
                Component::Normal(_) => seen_normal = true,
                Component::ParentDir | Component::CurDir => {}
            }
        }

        let parent = link.as_path().parent().unwrap_or(root.as_path());
        if !is_within(root.as_path(), &normalize(&parent.join(target))) {
            return Err(escape());
        }

        Ok(Self {
            link,
            target: target.to_path_buf(),
        })
    }

    /// Re-resolves the target from the canonical parent directory.
    ///
    /// Must be called after the parent directory has been created.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::LinkTraversal`] if the physical resolution
    /// leaves the root, or [`FetchError::Filesystem`] if the parent cannot
    /// be canonicalized.
    pub fn confirm(&self, root: &ExtractionRoot) -> Result<()> {
        let parent = self.link.as_path().parent().unwrap_or(root.as_path());
        let physical = parent
            .canonicalize()
            .map_err(|e| FetchError::filesystem(parent, e))?;

        if is_within(root.as_path(), &normalize(&physical.join(&self.target))) {
            Ok(())
        } else {
            Err(FetchError::LinkTraversal {
                link: self.link.declared().to_path_buf(),
                target: self.target.clone(),
            })
        }
    }

    /// Returns the validated link location.
    #[inline]
    #[must_use]
    pub fn link(&self) -> &SafePath {
        &self.link
    }

    /// Returns the target text the link is created with.
    #[inline]
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }
}
