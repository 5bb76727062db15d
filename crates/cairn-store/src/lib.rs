//! Content-addressed object storage for Cairn.
//!
//! This crate implements a hash-keyed object store laid out like git's
//! `.git/objects/` directory. Every object -- blob, tree, commit -- is stored
//! as an immutable, zlib-compressed file named by the SHA-1 of its canonical
//! encoding `"<kind> <len>\0" + payload`.
//!
//! # Object Types
//!
//! - [`Blob`] -- raw content (file contents, arbitrary data)
//! - [`Tree`] -- directory listing mapping names to object references
//! - [`Commit`] -- root tree, parents, signatures, extra headers, and message
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`LooseObjectStore`] -- sharded directory of loose object files
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Writes are write-if-absent; an existing object is never re-validated.
//! 3. A declared length that disagrees with the payload is corruption.
//! 4. Shard directory creation tolerates "already exists" and nothing else.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod codec;
pub mod config;
pub mod error;
pub mod loose;
pub mod memory;
pub mod object;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use config::{StoreConfig, MIN_PREFIX_LEN};
pub use error::{StoreError, StoreResult};
pub use loose::{create_dir_tolerant, LooseObjectStore};
pub use memory::InMemoryObjectStore;
pub use object::{
    Blob, Commit, EntryMode, ObjectKind, Signature, StoredObject, Tree, TreeEntry,
};
pub use traits::ObjectStore;
