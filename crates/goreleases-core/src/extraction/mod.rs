//! Extraction of a downloaded archive into its destination.

pub mod materialize;
pub mod pipeline;
pub mod rollback;

pub use materialize::Materializer;
pub use pipeline::Fetcher;
pub use pipeline::Stage;
pub use rollback::RollbackGuard;
