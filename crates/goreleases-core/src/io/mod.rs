//! I/O wrappers for the download stream.
//!
//! Both wrappers sit between the network body and the decompressor and pass
//! bytes through unchanged.

pub mod digest;
pub mod monitor;

pub use digest::DigestReader;
pub use monitor::StreamMonitor;
pub use monitor::StreamStats;
