//! Lexical path normalization and containment checks.
//!
//! Nothing here touches the filesystem: archive entries are checked before
//! anything is created for them, and most targets do not exist yet.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Normalizes `path` lexically.
///
/// `.` components are dropped and `..` removes the preceding normal
/// component. A `..` directly below the root stays at the root, as in
/// `filepath.Clean`-style normalization. Leading `..` components of a
/// relative path are kept.
///
/// # Examples
///
/// ```
/// use goreleases_core::security::normalize;
/// use std::path::Path;
///
/// assert_eq!(normalize(Path::new("/dst/go/./bin/../lib")), Path::new("/dst/go/lib"));
/// assert_eq!(normalize(Path::new("/dst/../../etc")), Path::new("/etc"));
/// assert_eq!(normalize(Path::new("../a/./b")), Path::new("../a/b"));
/// ```
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::with_capacity(path.components().count());

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

/// Returns `path` with any root or prefix component removed.
///
/// Tar tools treat `/usr/bin/go` in an archive as `usr/bin/go`.
#[must_use]
pub fn strip_root(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect()
}

/// Resolves an archive-relative `raw` path against `base`.
///
/// The result is absolute when `base` is, and normalized.
#[must_use]
pub fn resolve(base: &Path, raw: &Path) -> PathBuf {
    normalize(&base.join(strip_root(raw)))
}

/// Returns `true` if `path` is `root` or lies below it.
///
/// Comparison is per component, so `/dst/gox` is not within `/dst/go`.
#[must_use]
pub fn is_within(root: &Path, path: &Path) -> bool {
    path.starts_with(root)
}

/// Returns `true` if `path` lies strictly below `root`.
#[must_use]
pub fn is_strictly_within(root: &Path, path: &Path) -> bool {
    path != root && is_within(root, path)
}
