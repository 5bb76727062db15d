//! Recursive tree construction from a flat list of index entries.
//!
//! Each call handles one directory level: entries directly inside it become
//! leaf tree entries, entries further down are grouped by their first path
//! segment and handed (by value) to a recursive call for that subdirectory.
//! Every level is written to the store as its own tree object.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cairn_store::{EntryMode, ObjectStore, Tree, TreeEntry};
use cairn_types::ObjectId;
use tracing::debug;

use crate::entry::IndexEntry;
use crate::error::{IndexError, IndexResult};

/// Writes tree objects for a snapshot of index entries.
pub struct TreeBuilder<'a> {
    store: &'a dyn ObjectStore,
    /// Working directory the entry paths are relative to.
    root: PathBuf,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(store: &'a dyn ObjectStore, root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            root: root.into(),
        }
    }

    /// Build the root tree for all `entries`.
    pub fn build(&self, entries: &[IndexEntry]) -> IndexResult<ObjectId> {
        self.build_dir(entries.to_vec(), "")
    }

    /// Build the tree for `relative_dir`, given the entries that live under it.
    pub fn build_dir(&self, entries: Vec<IndexEntry>, relative_dir: &str) -> IndexResult<ObjectId> {
        let mut level = Vec::new();
        let mut subdirs: BTreeMap<String, Vec<IndexEntry>> = BTreeMap::new();

        for entry in entries {
            let first_dir = match relative_path(&entry.name, relative_dir)?.split_once('/') {
                Some((dir, _)) => Some(dir.to_string()),
                None => None,
            };
            match first_dir {
                Some(dir) => subdirs.entry(dir).or_default().push(entry),
                None => level.push(entry),
            }
        }

        let mut names = BTreeSet::new();
        for leaf in &level {
            let name = leaf.base_name();
            if !names.insert(name.to_string()) {
                return Err(IndexError::DuplicateEntry(leaf.name.clone()));
            }
            if subdirs.contains_key(name) {
                return Err(IndexError::PathConflict(leaf.name.clone()));
            }
        }

        for (name, group) in subdirs {
            let sub_path = join(relative_dir, &name);
            let tree_id = self.build_dir(group, &sub_path)?;
            let meta = self.stat(&sub_path)?;
            level.push(IndexEntry::directory(sub_path, tree_id, meta.as_ref()));
        }

        let entries = level
            .iter()
            .map(to_tree_entry)
            .collect::<IndexResult<Vec<_>>>()?;
        let tree = Tree::new(entries);
        let id = self.store.write(&tree.to_stored_object())?;
        debug!(dir = %display_dir(relative_dir), entries = tree.len(), id = %id, "wrote tree");
        Ok(id)
    }

    /// Stat data for a subdirectory, if it exists in the working directory.
    fn stat(&self, relative: &str) -> IndexResult<Option<fs::Metadata>> {
        match fs::metadata(self.root.join(relative)) {
            Ok(meta) => Ok(Some(meta)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(dir = relative, "directory not on disk; using empty stat data");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Build the tree for `relative_dir` from `entries` and return its digest.
///
/// `root_path` is the working directory that entry paths are relative to;
/// pass `""` as `relative_dir` to build the root tree.
pub fn build_tree(
    store: &dyn ObjectStore,
    root_path: &Path,
    entries: &[IndexEntry],
    relative_dir: &str,
) -> IndexResult<ObjectId> {
    TreeBuilder::new(store, root_path).build_dir(entries.to_vec(), relative_dir)
}

fn to_tree_entry(entry: &IndexEntry) -> IndexResult<TreeEntry> {
    let mode = entry.entry_mode().ok_or_else(|| IndexError::InvalidMode {
        path: entry.name.clone(),
        mode: entry.mode,
    })?;
    Ok(TreeEntry::new(mode, entry.base_name(), entry.object_id))
}

/// The part of `path` below `dir`, after validating both.
fn relative_path<'p>(path: &'p str, dir: &str) -> IndexResult<&'p str> {
    if path.is_empty() || path.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return Err(IndexError::InvalidPath(path.to_string()));
    }
    if dir.is_empty() {
        return Ok(path);
    }
    path.strip_prefix(dir)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| IndexError::InvalidPath(format!("{path} is not under {dir}")))
}

fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

fn display_dir(dir: &str) -> &str {
    if dir.is_empty() {
        "."
    } else {
        dir
    }
}
