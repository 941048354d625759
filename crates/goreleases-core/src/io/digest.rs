//! Digesting reader for verifying downloaded bytes.
//!
//! This module provides a `DigestReader` that wraps any `Read`
//! implementation and feeds every byte it returns into a SHA-256 digest.

use std::io::Read;

use sha2::Digest;
use sha2::Sha256;

/// Wrapper reader that hashes all bytes read through it.
///
/// # Implementation Notes
///
/// Every chunk returned to the caller is hashed before `read` returns, so
/// the digest always covers exactly the bytes observed downstream, even when
/// the next read fails. The digest is only meaningful once the wrapped
/// stream has been read to its end.
///
/// # Examples
///
/// ```
/// use goreleases_core::io::DigestReader;
/// use std::io::Read;
///
/// let mut reader = DigestReader::new(&b"hello world"[..]);
/// let mut out = Vec::new();
/// reader.read_to_end(&mut out)?;
///
/// assert_eq!(reader.bytes_read(), 11);
/// assert_eq!(
///     reader.finalize(),
///     "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
/// );
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct DigestReader<R> {
    inner: R,
    hasher: Sha256,
    bytes_read: u64,
}

impl<R> DigestReader<R> {
    /// Creates a new digesting reader.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            bytes_read: 0,
        }
    }

    /// Returns the number of bytes passed through so far.
    #[must_use]
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Returns a reference to the inner reader.
    #[must_use]
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Consumes the reader and returns the lowercase hex digest of all bytes
    /// read.
    #[must_use]
    pub fn finalize(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

impl<R: Read> Read for DigestReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
            self.bytes_read += n as u64;
        }
        Ok(n)
    }
}
