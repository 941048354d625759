//! File copy with a reusable buffer.
//!
//! Every regular file of an archive goes through [`copy_with_buffer`], so
//! one 64 KiB buffer is allocated per fetch instead of one per file.

use std::io;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use crate::FetchError;
use crate::Result;

/// Buffer size for copying entry content (64 KiB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable copy buffer.
#[derive(Debug)]
pub struct CopyBuffer {
    #[allow(clippy::large_stack_arrays)]
    buf: [u8; COPY_BUFFER_SIZE],
}

impl CopyBuffer {
    /// Creates a zeroed copy buffer.
    #[inline]
    #[must_use]
    #[allow(clippy::large_stack_arrays)]
    pub fn new() -> Self {
        Self {
            buf: [0u8; COPY_BUFFER_SIZE],
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        COPY_BUFFER_SIZE
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies `reader` to `writer` until end of input and returns the byte count.
///
/// `path` is the file being written and is only used for error context.
///
/// # Errors
///
/// Read failures come from the decompressor or the download and are
/// reported as format errors ([`FetchError::CorruptArchive`] or
/// [`FetchError::TruncatedArchive`]). Write failures are reported as
/// [`FetchError::Filesystem`].
#[inline]
pub fn copy_with_buffer<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
    path: &Path,
) -> Result<u64> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(FetchError::from_stream(e)),
        };

        writer
            .write_all(&buffer.buf[..bytes_read])
            .map_err(|e| FetchError::filesystem(path, e))?;

        total += bytes_read as u64;
    }

    Ok(total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const OUT: &str = "/tmp/out";

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::StorageFull, "no space left"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_copy_buffer_size() {
        assert_eq!(CopyBuffer::default().size(), 64 * 1024);
    }

    #[test]
    fn test_copy_empty_source() {
        let mut buffer = CopyBuffer::new();
        let mut output = Vec::new();
        let n = copy_with_buffer(&mut io::empty(), &mut output, &mut buffer, Path::new(OUT))
            .unwrap();
        assert_eq!(n, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_copy_multiple_chunks() {
        let mut buffer = CopyBuffer::new();
        let input_data = vec![0x55u8; COPY_BUFFER_SIZE * 3 + 1000];
        let mut input = Cursor::new(&input_data);
        let mut output = Vec::new();

        let n = copy_with_buffer(&mut input, &mut output, &mut buffer, Path::new(OUT)).unwrap();
        assert_eq!(n, input_data.len() as u64);
        assert_eq!(output, input_data);
    }

    #[test]
    fn test_copy_reusable_buffer() {
        let mut buffer = CopyBuffer::new();

        let mut output1 = Vec::new();
        copy_with_buffer(&mut &b"first"[..], &mut output1, &mut buffer, Path::new(OUT)).unwrap();

        let mut output2 = Vec::new();
        copy_with_buffer(&mut &b"second"[..], &mut output2, &mut buffer, Path::new(OUT))
            .unwrap();

        assert_eq!(output1, b"first");
        assert_eq!(output2, b"second");
    }

    #[test]
    fn test_read_error_is_stream_error() {
        struct Truncated;
        impl Read for Truncated {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::ErrorKind::UnexpectedEof.into())
            }
        }

        let mut buffer = CopyBuffer::new();
        let err = copy_with_buffer(&mut Truncated, &mut Vec::new(), &mut buffer, Path::new(OUT))
            .unwrap_err();
        assert!(matches!(err, FetchError::TruncatedArchive { .. }));
    }

    #[test]
    fn test_write_error_is_filesystem_error() {
        let mut buffer = CopyBuffer::new();
        let err = copy_with_buffer(&mut &b"data"[..], &mut FullDisk, &mut buffer, Path::new(OUT))
            .unwrap_err();
        assert!(matches!(err, FetchError::Filesystem { .. }));
        assert_eq!(err.path(), Some(Path::new(OUT)));
    }
}
