//! Index entries and tree building for Cairn.
//!
//! The staging index itself (its on-disk format, change detection) lives
//! outside this crate; callers hand in a snapshot of [`IndexEntry`] values
//! and get back the digest of the root tree that represents them.
//!
//! # Key Types
//!
//! - [`IndexEntry`] -- A tracked file: path, mode, blob digest, and stat data
//! - [`TreeBuilder`] -- Recursively writes one tree object per directory level

pub mod builder;
pub mod entry;
pub mod error;

pub use builder::{build_tree, TreeBuilder};
pub use entry::IndexEntry;
pub use error::{IndexError, IndexResult};
