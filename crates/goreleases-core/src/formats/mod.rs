//! Container format handling: detection, decompression and tar parsing.

pub mod compression;
pub mod detect;
pub mod tar;

// Re-export main types for convenience
pub use compression::CompressionCodec;
pub use detect::ContainerFormat;
pub use self::tar::EntryStream;
pub use self::tar::StreamState;
