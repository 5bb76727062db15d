use serde::{Deserialize, Serialize};

/// Shortest digest prefix accepted for short-hash lookup.
pub const MIN_PREFIX_LEN: usize = 4;

/// Configuration for a loose object store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Zlib compression level for object files (0-9).
    pub compression_level: u32,
    /// Shortest prefix `resolve_prefix` will accept.
    pub min_prefix_len: usize,
    /// Recompute each object's digest on read and compare it with the key.
    pub verify_on_read: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            compression_level: 6,
            min_prefix_len: MIN_PREFIX_LEN,
            verify_on_read: true,
        }
    }
}

impl StoreConfig {
    /// Compression level clamped to what zlib supports.
    pub fn effective_compression_level(&self) -> u32 {
        self.compression_level.min(9)
    }

    /// Prefix floor; never below the two characters that name a shard.
    pub fn effective_min_prefix_len(&self) -> usize {
        self.min_prefix_len.max(2)
    }
}
