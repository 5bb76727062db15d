//! Filesystem-backed loose object store.
//!
//! On-disk layout, rooted at the objects directory:
//!
//! ```text
//! <root>/<first 2 hex chars>/<remaining 38 hex chars>
//! ```
//!
//! Each file holds the zlib-compressed canonical bytes of one object, so the
//! layout is readable by git.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cairn_crypto::ContentHasher;
use cairn_types::ObjectId;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::codec;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::{normalize_prefix, ObjectStore};

/// Loose object store over a sharded directory tree.
#[derive(Clone, Debug)]
pub struct LooseObjectStore {
    root: PathBuf,
    config: StoreConfig,
}

impl LooseObjectStore {
    /// Open a store rooted at an existing objects directory.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, StoreConfig::default())
    }

    /// Open a store with explicit configuration.
    pub fn with_config(root: impl Into<PathBuf>, config: StoreConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Create the objects directory (and parents) if needed, then open it.
    pub fn init(root: impl Into<PathBuf>, config: StoreConfig) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self::with_config(root, config))
    }

    /// The objects directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of the file that holds (or would hold) `id`.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.root.join(id.shard()).join(id.file_name())
    }

    /// Every object ID present on disk, sorted.
    pub fn all_ids(&self) -> StoreResult<Vec<ObjectId>> {
        let mut ids = Vec::new();
        for shard in fs::read_dir(&self.root)? {
            let shard = shard?;
            let Some(shard_name) = shard.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if shard_name.len() != 2 || !is_lower_hex(&shard_name) || !shard.file_type()?.is_dir() {
                continue;
            }
            ids.extend(list_shard(&shard.path(), &shard_name, "")?);
        }
        ids.sort();
        Ok(ids)
    }
}

impl ObjectStore for LooseObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<StoredObject> {
        let path = self.object_path(id);
        let stored = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::ObjectNotFound(*id))
            }
            Err(e) => return Err(e.into()),
        };

        let canonical = codec::decompress(&stored).map_err(|e| e.for_object(*id))?;
        let object = codec::decode(&canonical).map_err(|e| e.for_object(*id))?;

        if self.config.verify_on_read {
            let actual = ContentHasher::raw_hash(&canonical);
            if actual != *id {
                warn!(id = %id, actual = %actual, "object content does not match its name");
                return Err(StoreError::CorruptObject {
                    id: Some(*id),
                    reason: format!("hash mismatch: content hashes to {actual}"),
                });
            }
        }
        Ok(object)
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let (id, canonical) = codec::encode(object.kind, &object.data);
        let path = self.object_path(&id);
        // Idempotent: an existing file already holds these exact bytes.
        if path.exists() {
            debug!(id = %id, kind = %object.kind, "object already present");
            return Ok(id);
        }

        let shard = self.root.join(id.shard());
        create_dir_tolerant(&shard)?;

        let compressed = codec::compress(&canonical, self.config.effective_compression_level())?;
        let mut tmp = NamedTempFile::new_in(&shard)?;
        tmp.write_all(&compressed)?;
        match tmp.persist_noclobber(&path) {
            Ok(_) => {}
            // Another writer stored the same digest first; its bytes are ours.
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                debug!(id = %id, "object written concurrently");
                return Ok(id);
            }
            Err(e) => return Err(StoreError::Io(e.error)),
        }

        debug!(
            id = %id,
            kind = %object.kind,
            size = object.size,
            stored = compressed.len(),
            "wrote object"
        );
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }

    fn resolve_prefix(&self, prefix: &str) -> StoreResult<Vec<ObjectId>> {
        let prefix = normalize_prefix(prefix, self.config.effective_min_prefix_len())?;
        let (shard, rest) = prefix.split_at(2);
        let dir = self.root.join(shard);

        let mut matches = match list_shard(&dir, shard, rest) {
            Ok(ids) => ids,
            Err(StoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };
        if matches.is_empty() {
            return Err(StoreError::invalid_reference(&prefix, "no matching object"));
        }
        matches.sort();
        debug!(prefix = %prefix, count = matches.len(), "resolved prefix");
        Ok(matches)
    }
}

/// Create a single directory, treating "already exists" as success.
///
/// Any other failure (missing parent, permissions, a regular file in the
/// way) is returned to the caller.
pub fn create_dir_tolerant(path: &Path) -> io::Result<()> {
    match fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(e),
    }
}

/// Object files in one shard whose names start with `rest`.
///
/// Anything that is not a 38-character lowercase hex name (temp files from
/// in-flight writes, stray editor files) is ignored.
fn list_shard(dir: &Path, shard: &str, rest: &str) -> StoreResult<Vec<ObjectId>> {
    let mut ids = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.len() != ObjectId::HEX_LEN - 2 || !name.starts_with(rest) || !is_lower_hex(name) {
            continue;
        }
        if let Ok(id) = ObjectId::from_hex(&format!("{shard}{name}")) {
            ids.push(id);
        }
    }
    Ok(ids)
}

fn is_lower_hex(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
