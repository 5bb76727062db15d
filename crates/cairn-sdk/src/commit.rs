use cairn_store::{Commit, ObjectStore, Signature};
use cairn_types::{ObjectId, TimeSource};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{SdkError, SdkResult};

/// Everything needed to create one commit object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRequest {
    pub tree: ObjectId,
    pub message: String,
    pub parent: Option<ObjectId>,
    /// Used for both the author and committer lines.
    pub author: String,
}

impl CommitRequest {
    pub fn new(tree: ObjectId, message: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            tree,
            message: message.into(),
            parent: None,
            author: author.into(),
        }
    }

    pub fn with_parent(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Reject values that would corrupt the header block when encoded.
    ///
    /// The author sits on a single header line, so it cannot contain a line
    /// break or NUL. The message may span lines but cannot contain NUL.
    pub fn validate(&self) -> SdkResult<()> {
        if self.author.trim().is_empty() {
            return Err(SdkError::InvalidOperation("commit author is empty".into()));
        }
        if self.author.contains(['\n', '\r', '\0']) {
            return Err(SdkError::InvalidOperation(format!(
                "commit author {:?} contains a line break or NUL",
                self.author
            )));
        }
        if self.message.contains('\0') {
            return Err(SdkError::InvalidOperation("commit message contains NUL".into()));
        }
        Ok(())
    }
}

/// Assembles commit objects and writes them to a store.
///
/// The time source is read once per commit, so author and committer always
/// carry the same timestamp.
pub struct CommitBuilder<'a> {
    store: &'a dyn ObjectStore,
    clock: &'a dyn TimeSource,
}

impl<'a> CommitBuilder<'a> {
    pub fn new(store: &'a dyn ObjectStore, clock: &'a dyn TimeSource) -> Self {
        Self { store, clock }
    }

    /// Write a commit for `request` and return its digest.
    ///
    /// The request is validated first and nothing is written if it fails.
    /// The parent, if any, is recorded as given; it is not checked against
    /// the store.
    pub fn build(&self, request: &CommitRequest) -> SdkResult<ObjectId> {
        request.validate()?;
        let signature = Signature::new(request.author.clone(), self.clock.now());
        let commit = Commit {
            tree: request.tree,
            parents: request.parent.into_iter().collect(),
            author: signature.clone(),
            committer: signature,
            extra_headers: Vec::new(),
            message: request.message.clone(),
        };
        let id = self.store.write(&commit.to_stored_object())?;
        info!(
            id = %id,
            tree = %request.tree,
            parent = ?request.parent.map(|p| p.short_hex()),
            "created commit"
        );
        Ok(id)
    }

    /// Positional form of [`build`](Self::build).
    pub fn build_commit(
        &self,
        tree: ObjectId,
        message: &str,
        parent: Option<ObjectId>,
        author: &str,
    ) -> SdkResult<ObjectId> {
        let mut request = CommitRequest::new(tree, message, author);
        request.parent = parent;
        self.build(&request)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use super::*;
    use cairn_store::{InMemoryObjectStore, ObjectKind};
    use cairn_types::{FixedClock, Timestamp};

    fn clock() -> FixedClock {
        FixedClock(Timestamp::new(1_700_000_000, 120))
    }

    fn payload(store: &InMemoryObjectStore, id: &ObjectId) -> String {
        let obj = store.read(id).unwrap();
        assert_eq!(obj.kind, ObjectKind::Commit);
        String::from_utf8(obj.data).unwrap()
    }

    #[test]
    fn request_builder() {
        let tree = ObjectId::from_hash([1; 20]);
        let parent = ObjectId::from_hash([2; 20]);
        let r = CommitRequest::new(tree, "msg", "Alice").with_parent(parent);
        assert_eq!(r.tree, tree);
        assert_eq!(r.parent, Some(parent));
        assert_eq!(r.author, "Alice");
    }

    #[test]
    fn commit_without_parent() {
        let store = InMemoryObjectStore::new();
        let clock = clock();
        let tree = ObjectId::from_hash([0xaa; 20]);
        let id = CommitBuilder::new(&store, &clock)
            .build_commit(tree, "hello", None, "Alice")
            .unwrap();

        let text = payload(&store, &id);
        assert!(text.starts_with(&format!("tree {tree}\n")));
        assert!(!text.contains("parent"));
        assert!(text.contains("\nauthor Alice 1700000000 +0200\n"));
        assert!(text.contains("\ncommitter Alice 1700000000 +0200\n"));
        assert!(text.ends_with("\nhello\n"));
    }

    #[test]
    fn commit_with_parent() {
        let store = InMemoryObjectStore::new();
        let clock = clock();
        let tree = ObjectId::from_hash([1; 20]);
        let parent = ObjectId::from_hash([2; 20]);
        let id = CommitBuilder::new(&store, &clock)
            .build(&CommitRequest::new(tree, "second", "Bob").with_parent(parent))
            .unwrap();

        let commit = Commit::from_stored_object(&store.read(&id).unwrap()).unwrap();
        // The parent does not exist in the store; that is the caller's concern.
        assert_eq!(commit.parents, vec![parent]);
        assert_eq!(commit.message, "second");
        assert!(payload(&store, &id).starts_with(&format!("tree {tree}\nparent {parent}\n")));
    }

    #[test]
    fn author_with_newline_is_rejected() {
        let store = InMemoryObjectStore::new();
        let clock = clock();
        let forged = format!("Mallory 1 +0000\nparent {}\nauthor Mallory", "ab".repeat(20));
        let err = CommitBuilder::new(&store, &clock)
            .build_commit(ObjectId::from_hash([5; 20]), "msg", None, &forged)
            .unwrap_err();
        assert!(matches!(err, SdkError::InvalidOperation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn message_with_nul_is_rejected() {
        let store = InMemoryObjectStore::new();
        let clock = clock();
        let err = CommitBuilder::new(&store, &clock)
            .build_commit(ObjectId::from_hash([5; 20]), "bad\0msg", None, "Alice")
            .unwrap_err();
        assert!(matches!(err, SdkError::InvalidOperation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn written_commits_parse_back() {
        let store = InMemoryObjectStore::new();
        let clock = clock();
        let tree = ObjectId::from_hash([6; 20]);
        let parent = ObjectId::from_hash([7; 20]);
        let request = CommitRequest::new(tree, "line one\n\nline three", "Ada <ada@example.com>")
            .with_parent(parent);
        let id = CommitBuilder::new(&store, &clock).build(&request).unwrap();

        let commit = Commit::from_stored_object(&store.read(&id).unwrap()).unwrap();
        assert_eq!(commit.author.identity, "Ada <ada@example.com>");
        assert_eq!(commit.first_parent(), Some(&parent));
        assert_eq!(commit.message, "line one\n\nline three");
    }

    #[test]
    fn fixed_clock_gives_reproducible_digest() {
        let clock = clock();
        let tree = ObjectId::from_hash([3; 20]);
        let a = CommitBuilder::new(&InMemoryObjectStore::new(), &clock)
            .build_commit(tree, "same", None, "Alice")
            .unwrap();
        let b = CommitBuilder::new(&InMemoryObjectStore::new(), &clock)
            .build_commit(tree, "same", None, "Alice")
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn clock_is_read_once_per_commit() {
        struct Ticking(AtomicI64);
        impl TimeSource for Ticking {
            fn now(&self) -> Timestamp {
                Timestamp::new(self.0.fetch_add(1, Ordering::SeqCst), 0)
            }
        }

        let store = InMemoryObjectStore::new();
        let clock = Ticking(AtomicI64::new(100));
        let id = CommitBuilder::new(&store, &clock)
            .build_commit(ObjectId::from_hash([4; 20]), "tick", None, "Alice")
            .unwrap();
        let commit = Commit::from_stored_object(&store.read(&id).unwrap()).unwrap();
        assert_eq!(commit.author.when, commit.committer.when);
        assert_eq!(clock.0.load(Ordering::SeqCst), 101);
    }
}
