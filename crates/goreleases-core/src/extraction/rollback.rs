//! Removal of a partially extracted tree on failure.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::warn;

/// Removes the extraction root when dropped, unless committed.
///
/// The guard is armed before the first entry is written. Every early return,
/// error propagated with `?`, or unwinding panic between that point and
/// [`commit`](Self::commit) therefore leaves the destination as it was.
///
/// # Examples
///
/// ```no_run
/// use goreleases_core::extraction::RollbackGuard;
///
/// let guard = RollbackGuard::new("/tmp/dest/go");
/// std::fs::create_dir("/tmp/dest/go")?;
/// // ... extraction fails, `guard` goes out of scope, directory is removed
/// # drop(guard);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
#[must_use = "dropping the guard immediately removes the tree"]
pub struct RollbackGuard {
    root: PathBuf,
    armed: bool,
}

impl RollbackGuard {
    /// Arms a guard for `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            armed: true,
        }
    }

    /// Keeps the tree; nothing is removed on drop.
    pub fn commit(mut self) {
        self.armed = false;
    }

    /// Returns the guarded path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Drop for RollbackGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        match fs::remove_dir_all(&self.root) {
            Ok(()) => debug!(root = %self.root.display(), "removed partial extraction"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                root = %self.root.display(),
                error = %e,
                "failed to remove partial extraction"
            ),
        }
    }
}
