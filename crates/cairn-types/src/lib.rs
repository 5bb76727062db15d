//! Foundation types for Cairn.
//!
//! This crate provides the identifier and time types shared by every other
//! Cairn crate.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Content-addressed identifier (160-bit SHA-1 digest)
//! - [`Timestamp`] -- Unix seconds plus the local UTC offset, as recorded in commits
//! - [`TimeSource`] -- Injectable clock used wherever "now" is needed

pub mod error;
pub mod object;
pub mod temporal;

pub use error::TypeError;
pub use object::ObjectId;
pub use temporal::{FixedClock, SystemClock, TimeSource, Timestamp};
