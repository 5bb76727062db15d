//! Content hashing for Cairn.
//!
//! Provides the header-prefixed SHA-1 hasher that turns an object's kind and
//! payload into its [`ObjectId`](cairn_types::ObjectId).
//!
//! All hashing is delegated to the `sha1` crate.

pub mod hasher;

pub use hasher::ContentHasher;
