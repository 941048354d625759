//! Fetch operation reporting.

use std::path::Path;
use std::time::Duration;

/// Statistics of a completed fetch.
///
/// # Examples
///
/// ```
/// use goreleases_core::FetchReport;
///
/// let mut report = FetchReport::new();
/// report.files = 10;
/// report.directories = 3;
/// report.symlinks = 1;
/// assert_eq!(report.total_items(), 14);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Regular files written.
    pub files: usize,

    /// Directories created from directory entries.
    pub directories: usize,

    /// Symbolic links created.
    pub symlinks: usize,

    /// Hard links created.
    pub hardlinks: usize,

    /// Metadata-only entries that were skipped.
    pub entries_skipped: usize,

    /// Content bytes written to regular files.
    pub bytes_written: u64,

    /// Raw bytes downloaded (compressed size).
    pub bytes_downloaded: u64,

    /// Verified SHA-256 of the download, lowercase hex.
    pub digest: String,

    /// Wall-clock duration of the fetch.
    pub duration: Duration,
}

impl FetchReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of filesystem objects created.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files + self.directories + self.symlinks + self.hardlinks
    }
}

/// Callback for progress updates during a fetch.
pub trait ProgressCallback {
    /// Called once the download is open, with the announced length.
    fn on_download_start(&mut self, content_length: Option<u64>);

    /// Called after each entry is materialized, with the raw bytes
    /// received so far.
    fn on_entry(&mut self, path: &Path, downloaded: u64);

    /// Called after the digest has been verified.
    fn on_complete(&mut self);
}

/// Progress callback that does nothing.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_download_start(&mut self, _content_length: Option<u64>) {}

    fn on_entry(&mut self, _path: &Path, _downloaded: u64) {}

    fn on_complete(&mut self) {}
}
