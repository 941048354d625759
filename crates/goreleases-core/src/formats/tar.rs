//! Sequential tar entry reader.

use std::io::Read;
use std::path::PathBuf;

use crate::FetchError;
use crate::Result;
use crate::types::EntryKind;

/// Position of an [`EntryStream`] in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// More entries may follow.
    Open,
    /// The end-of-archive marker was reached without error.
    Exhausted,
    /// Reading stopped because of an error, reported once.
    Failed,
}

/// Forward-only sequence of tar entries.
///
/// Entries come out in archive order. Each entry reads at most its declared
/// size, so consuming it never reaches into the next header. The stream is
/// not restartable: once it reaches [`StreamState::Exhausted`] or
/// [`StreamState::Failed`], [`next_entry`](Self::next_entry) keeps returning
/// `None`.
pub struct EntryStream<'a, R: 'a + Read> {
    entries: tar::Entries<'a, R>,
    state: StreamState,
    entries_read: usize,
}

impl<'a, R: Read> EntryStream<'a, R> {
    /// Starts reading entries from `archive`.
    pub fn new(archive: &'a mut tar::Archive<R>) -> Result<Self> {
        let entries = archive.entries().map_err(FetchError::from_stream)?;
        Ok(Self {
            entries,
            state: StreamState::Open,
            entries_read: 0,
        })
    }

    /// Returns the next entry, or `None` once the stream is over.
    ///
    /// # Errors
    ///
    /// Returns a format-class error for malformed headers or a broken
    /// underlying stream; the stream is `Failed` afterwards.
    pub fn next_entry(&mut self) -> Result<Option<tar::Entry<'a, R>>> {
        if self.state != StreamState::Open {
            return Ok(None);
        }

        match self.entries.next() {
            None => {
                self.state = StreamState::Exhausted;
                Ok(None)
            }
            Some(Ok(entry)) => {
                self.entries_read += 1;
                Ok(Some(entry))
            }
            Some(Err(e)) => {
                self.state = StreamState::Failed;
                Err(FetchError::from_stream(e))
            }
        }
    }

    /// Marks the stream failed because its consumer gave up on an entry.
    pub fn abort(&mut self) {
        if self.state == StreamState::Open {
            self.state = StreamState::Failed;
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Returns how many entries have been yielded.
    #[must_use]
    pub fn entries_read(&self) -> usize {
        self.entries_read
    }
}

/// Header fields of one entry, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    /// Path as declared in the archive (long-name and PAX extensions applied).
    pub path: PathBuf,
    /// What the entry describes.
    pub kind: EntryKind,
    /// Content size declared for the entry.
    pub size: u64,
    /// Permission bits declared for the entry.
    pub mode: u32,
}

impl EntryHeader {
    /// Decodes the header of `entry`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidEntry`] if a field cannot be decoded or
    /// a link entry has no target.
    pub fn read<R: Read>(entry: &tar::Entry<'_, R>) -> Result<Self> {
        let header = entry.header();
        let path = entry
            .path()
            .map_err(|e| FetchError::InvalidEntry {
                path: PathBuf::from(String::from_utf8_lossy(&header.path_bytes()).into_owned()),
                reason: format!("undecodable path: {e}"),
            })?
            .into_owned();

        let invalid = |reason: String| FetchError::InvalidEntry {
            path: path.clone(),
            reason,
        };

        let link_target = || -> Result<PathBuf> {
            entry
                .link_name()
                .map_err(|e| invalid(format!("undecodable link name: {e}")))?
                .map(std::borrow::Cow::into_owned)
                .ok_or_else(|| invalid("link entry without target".to_string()))
        };

        let entry_type = header.entry_type();
        let kind = match entry_type {
            tar::EntryType::Regular => EntryKind::File,
            tar::EntryType::Directory => EntryKind::Directory,
            tar::EntryType::Link => EntryKind::HardLink {
                target: link_target()?,
            },
            tar::EntryType::Symlink => EntryKind::Symlink {
                target: link_target()?,
            },
            tar::EntryType::XGlobalHeader | tar::EntryType::GNUSparse => EntryKind::Skipped,
            other => EntryKind::Unsupported(char::from(other.as_byte())),
        };

        let mode = header
            .mode()
            .map_err(|e| invalid(format!("invalid mode: {e}")))?;

        Ok(Self {
            path,
            kind,
            size: entry.size(),
            mode,
        })
    }
}
