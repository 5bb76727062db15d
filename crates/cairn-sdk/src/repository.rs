use std::path::{Path, PathBuf};

use cairn_index::{IndexEntry, TreeBuilder};
use cairn_store::{
    Commit, LooseObjectStore, ObjectKind, ObjectStore, StoreConfig, StoredObject, Tree,
};
use cairn_types::{ObjectId, SystemClock, TimeSource};
use tracing::{debug, info};

use crate::commit::{CommitBuilder, CommitRequest};
use crate::error::{SdkError, SdkResult};
use crate::inspect;

/// A repository directory (conventionally `.git`) holding an `objects/` store.
pub struct Repository {
    git_dir: PathBuf,
    store: LooseObjectStore,
    clock: Box<dyn TimeSource>,
}

impl Repository {
    /// Create `<git_dir>/objects` if needed and open the repository.
    pub fn init(git_dir: impl Into<PathBuf>, config: StoreConfig) -> SdkResult<Self> {
        let git_dir = git_dir.into();
        let store = LooseObjectStore::init(git_dir.join("objects"), config)?;
        info!(path = %git_dir.display(), "initialized repository");
        Ok(Self::from_parts(git_dir, store))
    }

    /// Open an existing repository.
    pub fn open(git_dir: impl Into<PathBuf>, config: StoreConfig) -> SdkResult<Self> {
        let git_dir = git_dir.into();
        let objects = git_dir.join("objects");
        if !objects.is_dir() {
            return Err(SdkError::NotInitialized(git_dir.display().to_string()));
        }
        Ok(Self::from_parts(git_dir, LooseObjectStore::with_config(objects, config)))
    }

    fn from_parts(git_dir: PathBuf, store: LooseObjectStore) -> Self {
        Self {
            git_dir,
            store,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the clock used to stamp commits.
    pub fn with_clock(mut self, clock: impl TimeSource + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn store(&self) -> &LooseObjectStore {
        &self.store
    }

    // ---- Content operations ----

    /// Compute the digest of `data` as an object of `kind`, storing it when
    /// `write` is set.
    ///
    /// Tree and commit payloads must parse before they are stored.
    pub fn hash_object(&self, data: &[u8], kind: ObjectKind, write: bool) -> SdkResult<ObjectId> {
        match kind {
            ObjectKind::Blob => {}
            ObjectKind::Tree => {
                Tree::parse(data)?;
            }
            ObjectKind::Commit => {
                Commit::parse(data)?;
            }
        }
        let obj = StoredObject::new(kind, data.to_vec());
        if write {
            Ok(self.store.write(&obj)?)
        } else {
            Ok(obj.compute_id())
        }
    }

    /// Resolve a short or full digest to exactly one object.
    pub fn resolve(&self, reference: &str) -> SdkResult<ObjectId> {
        let id = self.store.resolve(reference)?;
        debug!(reference, id = %id, "resolved reference");
        Ok(id)
    }

    pub fn read_object(&self, reference: &str) -> SdkResult<(ObjectId, StoredObject)> {
        let id = self.resolve(reference)?;
        let obj = self.store.read(&id)?;
        Ok((id, obj))
    }

    /// Render an object for display (see [`inspect::render_object`]).
    pub fn cat_file(&self, reference: &str, pretty: bool) -> SdkResult<String> {
        let id = self.resolve(reference)?;
        inspect::render_object(&self.store, &id, pretty)
    }

    // ---- Tree and commit operations ----

    /// Write the trees for an index snapshot and return the root tree digest.
    pub fn write_tree(&self, workdir: &Path, entries: &[IndexEntry]) -> SdkResult<ObjectId> {
        let id = TreeBuilder::new(&self.store, workdir).build(entries)?;
        info!(tree = %id, entries = entries.len(), "wrote tree");
        Ok(id)
    }

    pub fn commit_tree(&self, request: &CommitRequest) -> SdkResult<ObjectId> {
        CommitBuilder::new(&self.store, self.clock.as_ref()).build(request)
    }

    /// Blobs reachable from a tree, or from a commit's root tree.
    pub fn list_files(&self, reference: &str) -> SdkResult<Vec<(ObjectId, String)>> {
        let (id, obj) = self.read_object(reference)?;
        let tree = match obj.kind {
            ObjectKind::Tree => id,
            ObjectKind::Commit => Commit::from_stored_object(&obj)?.tree,
            ObjectKind::Blob => {
                return Err(SdkError::InvalidOperation(format!(
                    "{id} is a blob, not a tree or commit"
                )))
            }
        };
        inspect::enumerate_blobs(&self.store, &tree)
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("git_dir", &self.git_dir)
            .field("store", &self.store)
            .finish()
    }
}
