//! Fetch pipeline: download, digest, decompress, extract, verify.
//!
//! All stages run in one pass over the download:
//!
//! ```text
//! transport body -> StreamMonitor -> DigestReader -> gzip Decoder -> tar EntryStream
//!                                                                      |
//!                                               SafePath -> Materializer (per entry)
//! ```
//!
//! The digest can only be checked once the whole download has been read, so
//! a tampered archive is fully extracted before the mismatch is known. The
//! [`RollbackGuard`] removes the tree in that case, as for every other
//! failure after the first write.

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use tracing::debug;
use tracing::info;

use crate::CancelToken;
use crate::FetchConfig;
use crate::FetchError;
use crate::FetchReport;
use crate::Result;
use crate::catalog::ReleaseFile;
use crate::extraction::Materializer;
use crate::extraction::RollbackGuard;
use crate::formats::CompressionCodec;
use crate::formats::EntryStream;
use crate::formats::StreamState;
use crate::formats::detect::detect_format;
use crate::formats::tar::EntryHeader;
use crate::io::DigestReader;
use crate::io::StreamMonitor;
use crate::io::StreamStats;
use crate::report::ProgressCallback;
use crate::transport::Transport;
use crate::types::DestDir;
use crate::types::ExtractionRoot;

/// Length of a hex-encoded SHA-256 digest.
const SHA256_HEX_LEN: usize = 64;

/// Stage of a [`Fetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// No fetch has started, or the last one failed a precondition.
    Idle,
    /// Checking the release file and destination. No side effects.
    Validating,
    /// Downloading and materializing entries.
    Extracting,
    /// Entry stream exhausted; draining the download and comparing digests.
    Verifying,
    /// The tree is complete and verified.
    Finalized,
    /// The fetch failed after extraction began and the tree was removed.
    RolledBack,
}

impl Stage {
    /// Returns the stage name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Extracting => "extracting",
            Self::Verifying => "verifying",
            Self::Finalized => "finalized",
            Self::RolledBack => "rolled back",
        }
    }
}

/// Fetches release archives into a destination directory.
///
/// On success the destination contains a complete, verified `go` tree. On
/// failure it is left as it was before the call.
///
/// # Examples
///
/// ```no_run
/// use goreleases_core::{FetchConfig, Fetcher, HttpTransport, NoopProgress};
/// use goreleases_core::catalog::{self, FileKind};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = FetchConfig::default();
/// let transport = HttpTransport::new(&config)?;
///
/// let releases = catalog::list_supported(&transport)?;
/// let release = catalog::latest_stable(&releases).ok_or("no stable release")?;
/// let file = catalog::find_file(release, "linux", "amd64", FileKind::Archive)?;
///
/// let report = Fetcher::new(&transport, &config).fetch(file, "/usr/local", &mut NoopProgress)?;
/// println!("{} files, digest {}", report.files, report.digest);
/// # Ok(())
/// # }
/// ```
pub struct Fetcher<'a, T: Transport + ?Sized> {
    transport: &'a T,
    config: &'a FetchConfig,
    cancel: CancelToken,
    stage: Stage,
}

impl<'a, T: Transport + ?Sized> Fetcher<'a, T> {
    /// Creates a fetcher over `transport`.
    pub fn new(transport: &'a T, config: &'a FetchConfig) -> Self {
        Self {
            transport,
            config,
            cancel: CancelToken::new(),
            stage: Stage::Idle,
        }
    }

    /// Uses `cancel` to abort fetches from another thread.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns the current stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Fetches `file` and extracts it into `dest`.
    ///
    /// `dest` must be an existing, writable directory that does not yet
    /// contain the extraction root (`go` by default).
    ///
    /// # Errors
    ///
    /// Precondition errors are returned before any network request. Any
    /// later error leaves `dest` without the extraction root. See
    /// [`FetchError::class`] for the error categories.
    pub fn fetch(
        &mut self,
        file: &ReleaseFile,
        dest: impl AsRef<Path>,
        progress: &mut dyn ProgressCallback,
    ) -> Result<FetchReport> {
        let started = Instant::now();

        self.transition(Stage::Validating);
        let root = match validate(file, dest.as_ref(), self.config) {
            Ok(root) => root,
            Err(e) => {
                self.transition(Stage::Idle);
                return Err(e);
            }
        };

        self.transition(Stage::Extracting);
        let guard = RollbackGuard::new(root.as_path());

        match self.run(file, root, progress) {
            Ok(mut report) => {
                guard.commit();
                self.transition(Stage::Finalized);
                report.duration = started.elapsed();
                info!(
                    file = %file.filename,
                    files = report.files,
                    bytes = report.bytes_written,
                    digest = %report.digest,
                    "release extracted and verified"
                );
                progress.on_complete();
                Ok(report)
            }
            Err(e) => {
                drop(guard);
                self.transition(Stage::RolledBack);
                debug!(file = %file.filename, error = %e, "fetch failed");
                Err(e)
            }
        }
    }

    fn run(
        &mut self,
        file: &ReleaseFile,
        root: ExtractionRoot,
        progress: &mut dyn ProgressCallback,
    ) -> Result<FetchReport> {
        self.cancel.check()?;

        let download = self.transport.open(&file.filename)?;
        debug!(file = %file.filename, length = ?download.content_length, "download opened");
        progress.on_download_start(download.content_length);

        let monitor = StreamMonitor::new(download.body, self.cancel.clone());
        let stats = monitor.stats();

        self.extract(monitor, file, root, &stats, progress)
            .map_err(|e| self.reclassify(e, &stats))
    }

    fn extract<R: Read>(
        &mut self,
        source: R,
        file: &ReleaseFile,
        root: ExtractionRoot,
        stats: &StreamStats,
        progress: &mut dyn ProgressCallback,
    ) -> Result<FetchReport> {
        let codec = CompressionCodec::for_format(detect_format(&file.filename)?);
        let mut archive = tar::Archive::new(codec.decoder(DigestReader::new(source)));
        let mut materializer = Materializer::new(root);
        let mut report = FetchReport::new();

        let mut entries = EntryStream::new(&mut archive)?;
        while let Some(mut entry) = entries.next_entry()? {
            let outcome = self.cancel.check().and_then(|()| {
                let header = EntryHeader::read(&entry)?;
                debug!(
                    path = %header.path.display(),
                    kind = header.kind.name(),
                    size = header.size,
                    "entry"
                );
                materializer.materialize(&header, &mut entry, &mut report)?;
                Ok(header)
            });

            match outcome {
                Ok(header) => progress.on_entry(&header.path, stats.received()),
                Err(e) => {
                    entries.abort();
                    return Err(e);
                }
            }
        }
        debug_assert_eq!(entries.state(), StreamState::Exhausted);
        debug!(entries = entries.entries_read(), "entry stream exhausted");
        drop(entries);

        self.transition(Stage::Verifying);
        let digest = archive
            .into_inner()
            .finish()
            .map_err(FetchError::from_stream)?;
        report.bytes_downloaded = digest.bytes_read();

        let actual = digest.finalize();
        if !actual.eq_ignore_ascii_case(&file.sha256) {
            return Err(FetchError::DigestMismatch {
                expected: file.sha256.clone(),
                actual,
            });
        }
        report.digest = actual;

        Ok(report)
    }

    /// Attributes stream errors to their real cause.
    ///
    /// The decompressor and tar parser report every failed read as an I/O
    /// error, whether the data was bad, the connection dropped or the
    /// monitor refused to read after cancellation. Errors raised above the
    /// stream are returned unchanged, even if cancellation was requested
    /// meanwhile.
    fn reclassify(&self, err: FetchError, stats: &StreamStats) -> FetchError {
        match err {
            FetchError::CorruptArchive { .. } | FetchError::TruncatedArchive { .. }
                if self.cancel.is_cancelled() =>
            {
                FetchError::Cancelled
            }
            FetchError::CorruptArchive { source } | FetchError::TruncatedArchive { source }
                if stats.source_failed() =>
            {
                FetchError::Interrupted { source }
            }
            other => other,
        }
    }

    fn transition(&mut self, next: Stage) {
        debug!(from = self.stage.name(), to = next.name(), "fetch stage");
        self.stage = next;
    }
}

impl<T: Transport + ?Sized> std::fmt::Debug for Fetcher<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("config", self.config)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

/// Checks everything that can be checked without side effects.
fn validate(file: &ReleaseFile, dest: &Path, config: &FetchConfig) -> Result<ExtractionRoot> {
    detect_format(&file.filename)?;
    validate_digest(&file.sha256)?;
    let dest = DestDir::new(dest)?;
    dest.reserve(&config.root_dir_name)
}

fn validate_digest(digest: &str) -> Result<()> {
    if digest.len() == SHA256_HEX_LEN && digest.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(FetchError::InvalidDigest {
            digest: digest.to_string(),
        })
    }
}
