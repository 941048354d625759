//! Validated destination directory and the extraction root reserved in it.

use std::fs;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::FetchError;
use crate::Result;

/// A validated destination directory.
///
/// Once constructed, the directory is known to have existed, to be a
/// directory and to have been writable, and the path is canonical.
///
/// # Examples
///
/// ```no_run
/// use goreleases_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/usr/local")?;
/// let root = dest.reserve("go")?;
/// println!("extracting into {}", root.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Validates `path` as a destination.
    ///
    /// There is a window between these checks and the first write. It is
    /// narrowed by canonicalizing here and by checking every extracted path
    /// against the canonical root.
    ///
    /// # Errors
    ///
    /// - [`FetchError::DestinationMissing`] if nothing exists at `path`
    /// - [`FetchError::NotADirectory`] if it is not a directory
    /// - [`FetchError::DestinationNotWritable`] if it is not writable (Unix)
    /// - [`FetchError::Destination`] if it cannot be inspected
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FetchError::DestinationMissing { path });
            }
            Err(source) => return Err(FetchError::Destination { path, source }),
        };

        if !metadata.is_dir() {
            return Err(FetchError::NotADirectory { path });
        }

        let canonical = path
            .canonicalize()
            .map_err(|source| FetchError::Destination {
                path: path.clone(),
                source,
            })?;

        #[cfg(unix)]
        check_writable(&canonical)?;

        Ok(Self(canonical))
    }

    /// Returns the canonical path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Reserves the subdirectory `name` as extraction root.
    ///
    /// Nothing is created; the root comes into existence with the first
    /// extracted entry.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::AlreadyExists`] if anything (including a
    /// dangling symlink) is already at that location, and
    /// [`FetchError::Destination`] if `name` is not a single plain
    /// component.
    pub fn reserve(&self, name: &str) -> Result<ExtractionRoot> {
        let mut components = Path::new(name).components();
        let single = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single {
            return Err(FetchError::Destination {
                path: self.0.join(name),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "extraction root must be a single directory name",
                ),
            });
        }

        let path = self.0.join(name);
        match fs::symlink_metadata(&path) {
            Ok(_) => Err(FetchError::AlreadyExists { path }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ExtractionRoot {
                dest: self.0.clone(),
                path,
            }),
            Err(source) => Err(FetchError::Destination { path, source }),
        }
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

#[cfg(unix)]
fn check_writable(path: &Path) -> Result<()> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| FetchError::Destination {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "path contains null byte"),
    })?;

    // SAFETY: c_path is a valid NUL-terminated string that outlives the call,
    // and access() does not retain the pointer.
    #[allow(unsafe_code)]
    let result = unsafe { libc::access(c_path.as_ptr(), libc::W_OK) };

    if result == 0 {
        Ok(())
    } else {
        Err(FetchError::DestinationNotWritable {
            path: path.to_path_buf(),
        })
    }
}

/// The single top-level directory an archive is extracted into.
///
/// Entries are resolved against [`dest`](Self::dest) and must land in
/// [`as_path`](Self::as_path) or below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRoot {
    dest: PathBuf,
    path: PathBuf,
}

impl ExtractionRoot {
    /// Returns the absolute path of the root.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Returns the canonical destination directory containing the root.
    #[inline]
    #[must_use]
    pub fn dest(&self) -> &Path {
        &self.dest
    }
}
