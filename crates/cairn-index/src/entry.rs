//! Index entry type describing one tracked path.

use std::fs::Metadata;

use cairn_store::EntryMode;
use cairn_types::ObjectId;
use serde::{Deserialize, Serialize};

/// An entry in the staging index.
///
/// Mirrors the fields of a git index record: the stat data used for quick
/// dirty checks, the mode, the digest of the already-written object, and the
/// repository-relative path (`/`-separated).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub ctime_s: u32,
    pub ctime_n: u32,
    pub mtime_s: u32,
    pub mtime_n: u32,
    pub dev: u32,
    pub ino: u32,
    /// Raw file mode, e.g. `0o100644`.
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    /// File size in bytes.
    pub size: u32,
    /// Digest of the blob (or, for synthesized directory entries, tree).
    pub object_id: ObjectId,
    pub flags: u16,
    /// Relative path from the workdir root.
    pub name: String,
}

impl IndexEntry {
    /// An entry with zeroed stat data.
    pub fn new(name: impl Into<String>, mode: u32, object_id: ObjectId) -> Self {
        let name = name.into();
        Self {
            mode,
            object_id,
            flags: name_flags(&name),
            name,
            ..Self::default()
        }
    }

    /// An entry for a regular, non-executable file.
    pub fn regular(name: impl Into<String>, object_id: ObjectId) -> Self {
        Self::new(name, EntryMode::Regular.mode_bits(), object_id)
    }

    /// An entry whose stat data is taken from filesystem metadata.
    pub fn from_metadata(
        name: impl Into<String>,
        mode: u32,
        object_id: ObjectId,
        meta: &Metadata,
    ) -> Self {
        let mut entry = Self::new(name, mode, object_id);
        entry.apply_stat(meta);
        entry
    }

    /// A synthesized subdirectory entry pointing at a tree.
    ///
    /// Stat data comes from `meta` when the directory exists on disk.
    pub fn directory(name: impl Into<String>, tree_id: ObjectId, meta: Option<&Metadata>) -> Self {
        let mut entry = Self::new(name, EntryMode::Directory.mode_bits(), tree_id);
        if let Some(meta) = meta {
            entry.apply_stat(meta);
        }
        entry
    }

    /// The last path segment.
    pub fn base_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// The mode as a tree entry mode, if it is one a tree can hold.
    pub fn entry_mode(&self) -> Option<EntryMode> {
        EntryMode::from_mode_bits(self.mode)
    }

    #[cfg(unix)]
    fn apply_stat(&mut self, meta: &Metadata) {
        use std::os::unix::fs::MetadataExt;

        // The index format stores 32-bit fields; wider values truncate as git does.
        self.ctime_s = meta.ctime() as u32;
        self.ctime_n = meta.ctime_nsec() as u32;
        self.mtime_s = meta.mtime() as u32;
        self.mtime_n = meta.mtime_nsec() as u32;
        self.dev = meta.dev() as u32;
        self.ino = meta.ino() as u32;
        self.uid = meta.uid();
        self.gid = meta.gid();
        self.size = meta.size() as u32;
    }

    #[cfg(not(unix))]
    fn apply_stat(&mut self, meta: &Metadata) {
        use std::time::UNIX_EPOCH;

        if let Ok(mtime) = meta.modified() {
            if let Ok(d) = mtime.duration_since(UNIX_EPOCH) {
                self.mtime_s = d.as_secs() as u32;
                self.mtime_n = d.subsec_nanos();
            }
        }
        self.size = meta.len() as u32;
    }
}

/// Low 12 bits of the index flags hold the name length (saturating).
fn name_flags(name: &str) -> u16 {
    name.len().min(0xfff) as u16
}
