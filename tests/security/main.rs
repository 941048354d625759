//! Security integration tests.
//!
//! Hostile archives are served from memory and run through the complete
//! fetch pipeline against a real temporary directory.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod hardlink_attack;
mod path_traversal;
mod support;
mod symlink_escape;
