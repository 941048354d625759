//! Creation of filesystem objects for archive entries.

use std::fs;
use std::fs::OpenOptions;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::FetchError;
use crate::FetchReport;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::copy_with_buffer;
use crate::formats::tar::EntryHeader;
use crate::security::SafeHardlink;
use crate::types::EntryKind;
use crate::types::ExtractionRoot;
use crate::types::SafePath;
use crate::types::SafeSymlink;

/// Writes archive entries below an extraction root.
///
/// Each entry produces exactly one filesystem object. Missing parent
/// directories inside the root are created on the way. Paths and link
/// targets are validated before anything is created for the entry.
pub struct Materializer {
    root: ExtractionRoot,
    buffer: Box<CopyBuffer>,
}

impl Materializer {
    /// Creates a materializer for `root`.
    #[must_use]
    pub fn new(root: ExtractionRoot) -> Self {
        Self {
            root,
            buffer: Box::default(),
        }
    }

    /// Returns the extraction root.
    #[must_use]
    pub fn root(&self) -> &ExtractionRoot {
        &self.root
    }

    /// Materializes one entry, reading regular file content from `content`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::PathTraversal`] or [`FetchError::LinkTraversal`] if
    ///   the entry or its link target escapes the root
    /// - [`FetchError::SizeMismatch`] if `content` ends before the declared
    ///   size
    /// - [`FetchError::MissingLinkTarget`] for a hard link to a file that
    ///   was not extracted
    /// - [`FetchError::UnsupportedEntryType`] for devices, FIFOs and other
    ///   types
    /// - [`FetchError::Filesystem`] if creating the object fails, including
    ///   when something already exists at its path
    pub fn materialize<R: Read>(
        &mut self,
        header: &EntryHeader,
        content: &mut R,
        report: &mut FetchReport,
    ) -> Result<()> {
        match &header.kind {
            EntryKind::Directory => {
                let path = SafePath::for_directory(&header.path, &self.root)?;
                self.create_directory(&path)?;
                report.directories += 1;
            }
            EntryKind::File => {
                let path = SafePath::for_entry(&header.path, &self.root)?;
                let written = self.write_file(&path, header.size, header.mode, content)?;
                report.files += 1;
                report.bytes_written += written;
            }
            EntryKind::HardLink { target } => {
                let link = SafePath::for_entry(&header.path, &self.root)?;
                let hardlink = SafeHardlink::validate(link, target, &self.root)?;
                create_hardlink(&hardlink)?;
                report.hardlinks += 1;
            }
            EntryKind::Symlink { target } => {
                let link = SafePath::for_entry(&header.path, &self.root)?;
                let symlink = SafeSymlink::validate(link, target, &self.root)?;
                create_parent(symlink.link().as_path())?;
                symlink.confirm(&self.root)?;
                create_symlink(&symlink)?;
                report.symlinks += 1;
            }
            EntryKind::Skipped => {
                debug!(path = %header.path.display(), "skipping metadata entry");
                report.entries_skipped += 1;
            }
            EntryKind::Unsupported(entry_type) => {
                return Err(FetchError::UnsupportedEntryType {
                    path: header.path.clone(),
                    entry_type: *entry_type,
                });
            }
        }

        Ok(())
    }

    fn create_directory(&self, path: &SafePath) -> Result<()> {
        let target = path.as_path();
        if target != self.root.as_path() {
            create_parent(target)?;
        }
        fs::create_dir(target).map_err(|e| FetchError::filesystem(target, e))
    }

    fn write_file<R: Read>(
        &mut self,
        path: &SafePath,
        size: u64,
        mode: u32,
        content: &mut R,
    ) -> Result<u64> {
        let target = path.as_path();
        create_parent(target)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(target)
            .map_err(|e| FetchError::filesystem(target, e))?;

        let mut limited = content.take(size);
        let copied = copy_with_buffer(&mut limited, &mut file, &mut self.buffer, target)?;
        if copied != size {
            return Err(FetchError::SizeMismatch {
                path: path.declared().to_path_buf(),
                expected: size,
                actual: copied,
            });
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(mode & 0o777))
                .map_err(|e| FetchError::filesystem(target, e))?;
        }
        #[cfg(not(unix))]
        let _ = mode;

        Ok(copied)
    }
}

impl std::fmt::Debug for Materializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Materializer")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|e| FetchError::filesystem(parent, e))
        }
        None => Ok(()),
    }
}

fn create_hardlink(hardlink: &SafeHardlink) -> Result<()> {
    let link = hardlink.link().as_path();
    create_parent(link)?;
    fs::hard_link(hardlink.target().as_path(), link).map_err(|e| FetchError::filesystem(link, e))
}

#[cfg(unix)]
fn create_symlink(symlink: &SafeSymlink) -> Result<()> {
    let link = symlink.link().as_path();
    std::os::unix::fs::symlink(symlink.target(), link).map_err(|e| FetchError::filesystem(link, e))
}

#[cfg(windows)]
fn create_symlink(symlink: &SafeSymlink) -> Result<()> {
    let link = symlink.link().as_path();
    std::os::windows::fs::symlink_file(symlink.target(), link)
        .map_err(|e| FetchError::filesystem(link, e))
}
