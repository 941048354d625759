//! Containment checks for archive paths and link targets.

pub mod hardlink;
pub mod path;

pub use hardlink::SafeHardlink;
pub use path::normalize;
