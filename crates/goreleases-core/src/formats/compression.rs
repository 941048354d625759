//! Streaming decompression of release archives.
//!
//! Release archives are gzip-compressed. The decoder pulls compressed bytes
//! from the wrapped reader on demand and never holds more than one deflate
//! window in memory. A stream may consist of several concatenated gzip
//! members; their decoded contents form one continuous tar stream.

use std::io;
use std::io::Read;

use flate2::read::MultiGzDecoder;

use super::ContainerFormat;

/// Compression codec of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip compression (deflate algorithm).
    Gzip,
}

impl CompressionCodec {
    /// Returns the codec used by a container format.
    #[must_use]
    pub const fn for_format(format: ContainerFormat) -> Self {
        match format {
            ContainerFormat::TarGz => Self::Gzip,
        }
    }

    /// Returns a human-readable name for this codec.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
        }
    }

    /// Wraps `reader` in a streaming decoder for this codec.
    pub fn decoder<R: Read>(self, reader: R) -> Decoder<R> {
        match self {
            Self::Gzip => Decoder {
                inner: MultiGzDecoder::new(reader),
            },
        }
    }
}

/// Lazily decoding reader.
///
/// Malformed input surfaces as an I/O error of kind `InvalidInput` or
/// `InvalidData`; a truncated stream as `UnexpectedEof`. Bytes after the
/// last member that do not start another member are malformed input.
pub struct Decoder<R: Read> {
    inner: MultiGzDecoder<R>,
}

impl<R: Read> Decoder<R> {
    /// Returns a reference to the compressed source.
    #[must_use]
    pub fn get_ref(&self) -> &R {
        self.inner.get_ref()
    }

    /// Reads the rest of the stream, then returns the compressed source.
    ///
    /// A tar reader stops at the end-of-archive marker, which may leave
    /// padding, later members and the gzip trailers unread. Draining here
    /// decodes all of it and validates every trailer checksum, so the
    /// source has been consumed in full when this returns.
    ///
    /// # Errors
    ///
    /// Returns the decoder's error if the remaining data is corrupt or
    /// truncated, or the source's error if reading it fails.
    pub fn finish(mut self) -> io::Result<R> {
        io::copy(&mut self.inner, &mut io::sink())?;
        Ok(self.inner.into_inner())
    }
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}
