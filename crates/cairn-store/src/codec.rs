//! Canonical object encoding and the zlib storage boundary.
//!
//! The canonical form of an object is `"<kind> <len>\0" + payload`. Its SHA-1
//! is the object's ID. Compression is applied to the canonical form only
//! when bytes cross into storage and never affects the ID.

use std::io::{Read, Write};

use cairn_crypto::ContentHasher;
use cairn_types::ObjectId;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{StoreError, StoreResult};
use crate::object::{ObjectKind, StoredObject};

/// Frame a payload and compute its ID.
pub fn encode(kind: ObjectKind, payload: &[u8]) -> (ObjectId, Vec<u8>) {
    let mut canonical = kind.hasher().header(payload.len());
    canonical.extend_from_slice(payload);
    let id = ContentHasher::raw_hash(&canonical);
    (id, canonical)
}

/// Split canonical bytes back into kind and payload.
///
/// Fails with [`StoreError::CorruptObject`] if the header is malformed or the
/// declared length does not match the payload that follows it.
pub fn decode(canonical: &[u8]) -> StoreResult<StoredObject> {
    let nul = canonical
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| StoreError::corrupt("object header is not NUL-terminated"))?;
    let header = std::str::from_utf8(&canonical[..nul])
        .map_err(|_| StoreError::corrupt("object header is not valid UTF-8"))?;
    let (kind, declared) = header
        .split_once(' ')
        .ok_or_else(|| StoreError::corrupt(format!("malformed object header {header:?}")))?;
    let kind: ObjectKind = kind.parse()?;

    if declared.is_empty() || !declared.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StoreError::corrupt(format!("invalid object length {declared:?}")));
    }
    let declared: usize = declared
        .parse()
        .map_err(|_| StoreError::corrupt(format!("object length {declared} out of range")))?;

    let payload = &canonical[nul + 1..];
    if payload.len() != declared {
        return Err(StoreError::corrupt(format!(
            "length mismatch: header declares {declared} bytes, found {}",
            payload.len()
        )));
    }
    Ok(StoredObject::new(kind, payload.to_vec()))
}

/// Zlib-compress canonical bytes for storage.
pub fn compress(canonical: &[u8], level: u32) -> StoreResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(canonical)?;
    Ok(encoder.finish()?)
}

/// Inflate stored bytes back into canonical form.
pub fn decompress(stored: &[u8]) -> StoreResult<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(stored)
        .read_to_end(&mut out)
        .map_err(|e| StoreError::corrupt(format!("zlib stream is invalid: {e}")))?;
    Ok(out)
}
