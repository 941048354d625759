//! Validated path types and entry kinds.
//!
//! Security-relevant types can only be obtained through constructors that
//! validate them; there are no `From` conversions from raw paths.

pub mod dest_dir;
pub mod entry_type;
pub mod safe_path;
pub mod safe_symlink;

pub use dest_dir::DestDir;
pub use dest_dir::ExtractionRoot;
pub use entry_type::EntryKind;
pub use safe_path::SafePath;
pub use safe_symlink::SafeSymlink;
