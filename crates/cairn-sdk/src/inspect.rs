//! Read-side helpers: decode trees, list reachable blobs, and render objects
//! as text for an "inspect object" command.

use cairn_store::{ObjectKind, ObjectStore, Tree, TreeEntry};
use cairn_types::ObjectId;

use crate::error::{SdkError, SdkResult};

/// Read `id` and decode it as a tree.
pub fn read_tree(store: &dyn ObjectStore, id: &ObjectId) -> SdkResult<Tree> {
    let obj = store.read(id)?;
    if obj.kind != ObjectKind::Tree {
        return Err(SdkError::InvalidOperation(format!(
            "{id} is a {}, not a tree",
            obj.kind
        )));
    }
    Ok(Tree::from_stored_object(&obj)?)
}

/// One listing line: `<mode> <tree|blob> <digest>\t<name>`.
pub fn render_tree_entry(entry: &TreeEntry) -> String {
    let kind = if entry.mode.is_tree() { "tree" } else { "blob" };
    format!("{} {kind} {}\t{}", entry.mode, entry.object_id, entry.name)
}

/// Render an object as text.
///
/// Blobs and commits render as their payload; trees render one
/// [`render_tree_entry`] line per entry in stored order. Unless `pretty` is
/// set, the output is prefixed with the object kind and a space.
pub fn render_object(store: &dyn ObjectStore, id: &ObjectId, pretty: bool) -> SdkResult<String> {
    let obj = store.read(id)?;
    let body = match obj.kind {
        ObjectKind::Blob | ObjectKind::Commit => String::from_utf8_lossy(&obj.data).into_owned(),
        ObjectKind::Tree => Tree::from_stored_object(&obj)?
            .entries
            .iter()
            .map(render_tree_entry)
            .collect::<Vec<_>>()
            .join("\n"),
    };
    if pretty {
        Ok(body)
    } else {
        Ok(format!("{} {body}", obj.kind))
    }
}

/// Every blob reachable from a tree, as `(digest, path)` pairs.
///
/// Entries are visited in stored order; a subtree is expanded in place,
/// depth-first. Paths are built from entry names alone.
pub fn enumerate_blobs(store: &dyn ObjectStore, tree_id: &ObjectId) -> SdkResult<Vec<(ObjectId, String)>> {
    walk(store, tree_id, "")
}

fn walk(store: &dyn ObjectStore, tree_id: &ObjectId, prefix: &str) -> SdkResult<Vec<(ObjectId, String)>> {
    let mut found = Vec::new();
    for entry in read_tree(store, tree_id)?.entries {
        let path = format!("{prefix}{}", entry.name);
        if entry.mode.is_tree() {
            found.extend(walk(store, &entry.object_id, &format!("{path}/"))?);
        } else {
            found.push((entry.object_id, path));
        }
    }
    Ok(found)
}
