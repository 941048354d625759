//! Fetch, verify and extract Go release archives.
//!
//! `goreleases-core` downloads a release `.tar.gz`, and in a single
//! streaming pass computes its SHA-256, decompresses it, and extracts it
//! into a `go` directory below a destination. No entry may write outside
//! that directory, and any failure (including a digest mismatch detected
//! at the very end) removes everything that was written.
//!
//! # Examples
//!
//! ```no_run
//! use goreleases_core::catalog::{self, FileKind};
//! use goreleases_core::{FetchConfig, HttpTransport};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FetchConfig::default();
//! let transport = HttpTransport::new(&config)?;
//!
//! let releases = catalog::list_supported(&transport)?;
//! let release = catalog::latest_stable(&releases).ok_or("no stable release")?;
//! let file = catalog::find_file(release, catalog::host_os(), catalog::host_arch(), FileKind::Archive)?;
//!
//! let report = goreleases_core::fetch(file, "/usr/local")?;
//! println!("Extracted {} files", report.files);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod cancel;
pub mod catalog;
pub mod config;
pub mod copy;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod io;
pub mod report;
pub mod security;
#[doc(hidden)]
pub mod test_utils;
pub mod transport;
pub mod types;

// Re-export main API types
pub use api::fetch;
pub use api::fetch_with_config;
pub use api::list_releases;
pub use cancel::CancelToken;
pub use catalog::FileKind;
pub use catalog::Release;
pub use catalog::ReleaseFile;
pub use config::FetchConfig;
pub use error::ErrorClass;
pub use error::FetchError;
pub use error::Result;
pub use extraction::Fetcher;
pub use extraction::Stage;
pub use report::FetchReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use transport::Download;
pub use transport::HttpTransport;
pub use transport::Transport;
