use cairn_types::ObjectId;
use sha1::{Digest, Sha1};

/// Kind-tagged SHA-1 content hasher.
///
/// Each hasher carries a kind tag (`"blob"`, `"tree"`, `"commit"`) that is
/// written into the object header `"<tag> <len>\0"` ahead of the payload
/// before hashing. A blob and a tree with identical payload bytes therefore
/// hash differently.
pub struct ContentHasher {
    tag: &'static str,
}

impl ContentHasher {
    /// Hasher for blob objects.
    pub const BLOB: Self = Self { tag: "blob" };
    /// Hasher for tree objects.
    pub const TREE: Self = Self { tag: "tree" };
    /// Hasher for commit objects.
    pub const COMMIT: Self = Self { tag: "commit" };

    /// Create a hasher with a custom kind tag.
    pub const fn new(tag: &'static str) -> Self {
        Self { tag }
    }

    /// The object header for a payload of `len` bytes.
    pub fn header(&self, len: usize) -> Vec<u8> {
        format!("{} {}\0", self.tag, len).into_bytes()
    }

    /// Hash a payload, prefixing it with this hasher's header.
    pub fn hash(&self, payload: &[u8]) -> ObjectId {
        let mut hasher = Sha1::new();
        hasher.update(self.header(payload.len()));
        hasher.update(payload);
        ObjectId::from_hash(hasher.finalize().into())
    }

    /// Verify that a payload produces the expected object ID.
    pub fn verify(&self, payload: &[u8], expected: &ObjectId) -> bool {
        self.hash(payload) == *expected
    }

    /// Plain SHA-1 of already-framed bytes (for canonical encodings).
    pub fn raw_hash(data: &[u8]) -> ObjectId {
        ObjectId::from_hash(Sha1::digest(data).into())
    }

    /// The kind tag used by this hasher.
    pub fn tag(&self) -> &str {
        self.tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_hash_matches_git() {
        // `printf 'hello world\n' | git hash-object --stdin`
        let id = ContentHasher::BLOB.hash(b"hello world\n");
        assert_eq!(id.to_hex(), "3b18e512dba79e4c8300dd08aeb37f8e728b8dad");
    }

    #[test]
    fn empty_blob_matches_git() {
        let id = ContentHasher::BLOB.hash(b"");
        assert_eq!(id.to_hex(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
    }

    #[test]
    fn empty_tree_matches_git() {
        let id = ContentHasher::TREE.hash(b"");
        assert_eq!(id.to_hex(), "4b825dc642cb6eb9a060e54bf8d69288fbee4904");
    }

    #[test]
    fn different_tags_produce_different_hashes() {
        let data = b"same content";
        let blob = ContentHasher::BLOB.hash(data);
        let tree = ContentHasher::TREE.hash(data);
        let commit = ContentHasher::COMMIT.hash(data);
        assert_ne!(blob, tree);
        assert_ne!(blob, commit);
        assert_ne!(tree, commit);
    }

    #[test]
    fn header_layout() {
        assert_eq!(ContentHasher::COMMIT.header(12), b"commit 12\0".to_vec());
    }

    #[test]
    fn raw_hash_of_framed_bytes_equals_tagged_hash() {
        let mut framed = ContentHasher::BLOB.header(4);
        framed.extend_from_slice(b"data");
        assert_eq!(
            ContentHasher::raw_hash(&framed),
            ContentHasher::BLOB.hash(b"data")
        );
    }

    #[test]
    fn verify_detects_tampering() {
        let id = ContentHasher::BLOB.hash(b"original");
        assert!(ContentHasher::BLOB.verify(b"original", &id));
        assert!(!ContentHasher::BLOB.verify(b"tampered", &id));
    }
}
