//! Monitoring wrapper for the raw download stream.

use std::io;
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::CancelToken;

/// Counters shared between a [`StreamMonitor`] and its owner.
///
/// The monitor ends up buried under the decompressor and tar parser, so the
/// pipeline keeps a clone of these stats to observe the raw stream from the
/// outside.
#[derive(Debug, Clone, Default)]
pub struct StreamStats {
    inner: Arc<StatsInner>,
}

#[derive(Debug, Default)]
struct StatsInner {
    received: AtomicU64,
    source_failed: AtomicBool,
}

impl StreamStats {
    /// Returns the number of raw bytes received so far.
    #[must_use]
    pub fn received(&self) -> u64 {
        self.inner.received.load(Ordering::Relaxed)
    }

    /// Returns `true` if the wrapped source returned an error.
    ///
    /// Distinguishes a broken connection from corrupt data: both surface
    /// as I/O errors from the decompressor.
    #[must_use]
    pub fn source_failed(&self) -> bool {
        self.inner.source_failed.load(Ordering::Relaxed)
    }
}

/// Reader over the raw download that observes cancellation and records
/// source failures.
///
/// # Examples
///
/// ```
/// use goreleases_core::CancelToken;
/// use goreleases_core::io::StreamMonitor;
/// use std::io::Read;
///
/// let token = CancelToken::new();
/// let mut monitor = StreamMonitor::new(&b"payload"[..], token.clone());
/// let stats = monitor.stats();
///
/// let mut out = Vec::new();
/// monitor.read_to_end(&mut out)?;
/// assert_eq!(stats.received(), 7);
///
/// token.cancel();
/// assert!(monitor.read(&mut [0u8; 4]).is_err());
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct StreamMonitor<R> {
    inner: R,
    cancel: CancelToken,
    stats: StreamStats,
}

impl<R> StreamMonitor<R> {
    /// Wraps `inner`, failing reads once `cancel` is triggered.
    #[must_use]
    pub fn new(inner: R, cancel: CancelToken) -> Self {
        Self {
            inner,
            cancel,
            stats: StreamStats::default(),
        }
    }

    /// Returns a handle to the shared counters.
    #[must_use]
    pub fn stats(&self) -> StreamStats {
        self.stats.clone()
    }
}

impl<R: Read> Read for StreamMonitor<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // ErrorKind::Interrupted would be retried by read_exact and io::copy.
        if self.cancel.is_cancelled() {
            return Err(io::Error::other("fetch cancelled"));
        }

        match self.inner.read(buf) {
            Ok(n) => {
                self.stats
                    .inner
                    .received
                    .fetch_add(n as u64, Ordering::Relaxed);
                Ok(n)
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Err(e),
            Err(e) => {
                self.stats.inner.source_failed.store(true, Ordering::Relaxed);
                Err(e)
            }
        }
    }
}
