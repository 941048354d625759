//! Builders for in-memory release archives.
//!
//! Used by unit tests, integration tests and benchmarks. `tar::Builder`
//! refuses to write unsafe paths, so the `raw` variants write header fields
//! directly to produce hostile archives.
//!
//! # Panics
//!
//! All functions in this module panic on I/O errors since they are
//! designed for test use only.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use sha2::Digest;
use sha2::Sha256;

/// Builder for tar archives with various entry types.
///
/// # Examples
///
/// ```
/// use goreleases_core::test_utils::TarTestBuilder;
///
/// let tar_gz = TarTestBuilder::new()
///     .add_directory("go/")
///     .add_file("go/VERSION", b"go1.21.0")
///     .add_symlink("go/bin/gofmt", "../pkg/tool/gofmt")
///     .build_gz();
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file with mode 0o644.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_file_with_mode(path, data, 0o644)
    }

    /// Adds a regular file with a custom mode.
    #[must_use]
    pub fn add_file_with_mode(mut self, path: &str, data: &[u8], mode: u32) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(mode);
        header.set_cksum();
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a directory.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o755);
        header.set_entry_type(tar::EntryType::Directory);
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Adds a symlink. The target is written as given.
    #[must_use]
    pub fn add_symlink(self, path: &str, target: &str) -> Self {
        self.add_link(path, target, tar::EntryType::Symlink)
    }

    /// Adds a hard link. The target is written as given.
    #[must_use]
    pub fn add_hardlink(self, path: &str, target: &str) -> Self {
        self.add_link(path, target, tar::EntryType::Link)
    }

    /// Adds a named pipe.
    #[must_use]
    pub fn add_fifo(mut self, path: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Fifo);
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Adds a PAX global header record.
    #[must_use]
    pub fn add_global_header(mut self, comment: &str) -> Self {
        let record = pax_record("comment", comment);
        let mut header = tar::Header::new_ustar();
        header.set_size(record.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::XGlobalHeader);
        header.set_cksum();
        self.builder
            .append_data(&mut header, "pax_global_header", record.as_slice())
            .unwrap();
        self
    }

    /// Adds a regular file whose name is written verbatim, bypassing the
    /// path checks of `tar::Builder`. `path` must fit in 100 bytes.
    #[must_use]
    pub fn add_raw_file(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = raw_header(path, tar::EntryType::Regular);
        header.set_size(data.len() as u64);
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }

    /// Adds a directory whose name is written verbatim.
    #[must_use]
    pub fn add_raw_directory(mut self, path: &str) -> Self {
        let mut header = raw_header(path, tar::EntryType::Directory);
        header.set_mode(0o755);
        header.set_cksum();
        self.builder.append(&header, std::io::empty()).unwrap();
        self
    }

    /// Builds the uncompressed tar archive.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }

    /// Builds the gzip-compressed tar archive.
    #[must_use]
    pub fn build_gz(self) -> Vec<u8> {
        gzip(&self.build())
    }

    fn add_link(mut self, path: &str, target: &str, entry_type: tar::EntryType) -> Self {
        let mut header = raw_header(path, entry_type);
        header.set_mode(0o777);
        header.set_link_name(target).unwrap();
        header.set_cksum();
        self.builder.append(&header, std::io::empty()).unwrap();
        self
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn raw_header(path: &str, entry_type: tar::EntryType) -> tar::Header {
    let mut header = tar::Header::new_gnu();
    header.set_size(0);
    header.set_mode(0o644);
    header.set_entry_type(entry_type);
    let name = &mut header.as_old_mut().name;
    assert!(path.len() < name.len(), "raw path too long: {path}");
    name[..path.len()].copy_from_slice(path.as_bytes());
    header
}

fn pax_record(key: &str, value: &str) -> Vec<u8> {
    // "<len> <key>=<value>\n", where <len> counts itself.
    let rest = format!(" {key}={value}\n");
    let mut len = rest.len() + 1;
    while format!("{len}{rest}").len() != len {
        len += 1;
    }
    format!("{len}{rest}").into_bytes()
}

/// Compresses `data` with gzip.
#[must_use]
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Returns the lowercase hex SHA-256 of `data`.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
