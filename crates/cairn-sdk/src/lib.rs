//! High-level SDK for Cairn.
//!
//! Provides the commit builder, the tree walker/inspector, and a
//! [`Repository`] facade that ties them to a loose object store on disk.
//! This is the main entry point for applications embedding Cairn.

pub mod commit;
pub mod error;
pub mod inspect;
pub mod repository;

pub use commit::{CommitBuilder, CommitRequest};
pub use error::{SdkError, SdkResult};
pub use inspect::{enumerate_blobs, read_tree, render_object, render_tree_entry};
pub use repository::Repository;

// Re-export key types
pub use cairn_index::IndexEntry;
pub use cairn_store::{Blob, Commit, EntryMode, ObjectKind, StoreConfig, Tree, TreeEntry};
pub use cairn_types::{FixedClock, ObjectId, SystemClock, TimeSource, Timestamp};
