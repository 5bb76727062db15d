use cairn_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. Content-addressing guarantees this:
///   the same data always produces the same ID.
/// - Writing an object that already exists is a no-op that returns its ID.
/// - Concurrent reads are always safe (objects are immutable).
/// - The store never interprets object payloads.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Read an object by its content-addressed ID.
    ///
    /// Returns [`StoreError::ObjectNotFound`] if the object does not exist and
    /// [`StoreError::CorruptObject`] if its stored bytes do not decode.
    fn read(&self, id: &ObjectId) -> StoreResult<StoredObject>;

    /// Write an object and return its content-addressed ID.
    ///
    /// If the object already exists, this is a no-op (idempotent).
    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// All stored IDs starting with `prefix`, sorted ascending.
    ///
    /// The prefix must be at least four hex characters. No match is an
    /// [`StoreError::InvalidReference`]; several matches are returned as-is.
    fn resolve_prefix(&self, prefix: &str) -> StoreResult<Vec<ObjectId>>;

    /// Resolve a short or full digest to exactly one object ID.
    fn resolve(&self, reference: &str) -> StoreResult<ObjectId> {
        let mut matches = self.resolve_prefix(reference)?;
        match matches.len() {
            1 => Ok(matches.remove(0)),
            n => Err(StoreError::InvalidReference {
                reference: reference.to_string(),
                reason: format!(
                    "ambiguous, {n} candidates: {}",
                    matches
                        .iter()
                        .map(ObjectId::short_hex)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            }),
        }
    }

    /// Write multiple objects and return their IDs.
    fn write_batch(&self, objects: &[StoredObject]) -> StoreResult<Vec<ObjectId>> {
        objects.iter().map(|obj| self.write(obj)).collect()
    }
}

/// Validate a short digest and normalize it to lowercase.
pub fn normalize_prefix(prefix: &str, min_len: usize) -> StoreResult<String> {
    if prefix.len() < min_len {
        return Err(StoreError::invalid_reference(
            prefix,
            format!("prefix must be at least {min_len} hex characters"),
        ));
    }
    if prefix.len() > ObjectId::HEX_LEN {
        return Err(StoreError::invalid_reference(
            prefix,
            format!("longer than {} hex characters", ObjectId::HEX_LEN),
        ));
    }
    if !prefix.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(StoreError::invalid_reference(prefix, "not a hex string"));
    }
    Ok(prefix.to_ascii_lowercase())
}
