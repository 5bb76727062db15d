use std::fmt;
use std::str::FromStr;

use cairn_crypto::ContentHasher;
use cairn_types::{ObjectId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// The kind of object stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Raw content (file contents, arbitrary data).
    Blob,
    /// Directory listing: ordered entries mapping names to object references.
    Tree,
    /// Snapshot of a root tree with parent links, signatures, and message.
    Commit,
}

impl ObjectKind {
    /// The header tag written into the canonical encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
        }
    }

    /// The hasher that frames payloads of this kind.
    pub fn hasher(&self) -> &'static ContentHasher {
        match self {
            Self::Blob => &ContentHasher::BLOB,
            Self::Tree => &ContentHasher::TREE,
            Self::Commit => &ContentHasher::COMMIT,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blob" => Ok(Self::Blob),
            "tree" => Ok(Self::Tree),
            "commit" => Ok(Self::Commit),
            other => Err(StoreError::corrupt(format!("unknown object kind {other:?}"))),
        }
    }
}

/// A stored object: kind tag + payload bytes + cached size.
///
/// `StoredObject` is the unit of storage. The store never interprets the
/// payload; typed views ([`Blob`], [`Tree`], [`Commit`]) convert to and from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The type of this object.
    pub kind: ObjectKind,
    /// The payload bytes, without the `"<kind> <len>\0"` header.
    pub data: Vec<u8>,
    /// The size of `data` in bytes.
    pub size: u64,
}

impl StoredObject {
    /// Create a new stored object from kind and data.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self { kind, data, size }
    }

    /// Compute the content-addressed ID for this object.
    pub fn compute_id(&self) -> ObjectId {
        self.kind.hasher().hash(&self.data)
    }

    fn expect_kind(&self, kind: ObjectKind) -> StoreResult<()> {
        if self.kind != kind {
            return Err(StoreError::CorruptObject {
                id: Some(self.compute_id()),
                reason: format!("expected {kind}, got {}", self.kind),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Blob
// ---------------------------------------------------------------------------

/// Raw content object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    /// Create a new blob from raw bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Blob, self.data.clone())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.expect_kind(ObjectKind::Blob)?;
        Ok(Self {
            data: obj.data.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// File mode for a tree entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryMode {
    /// Normal file (0o100644).
    Regular,
    /// Executable file (0o100755).
    Executable,
    /// Symbolic link (0o120000).
    Symlink,
    /// Subtree / directory (0o040000).
    Directory,
}

impl EntryMode {
    /// Octal mode value (for display/serialization).
    pub fn mode_bits(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Directory => 0o040000,
        }
    }

    /// Parse from an octal mode value.
    pub fn from_mode_bits(bits: u32) -> Option<Self> {
        match bits {
            0o100644 => Some(Self::Regular),
            0o100755 => Some(Self::Executable),
            0o120000 => Some(Self::Symlink),
            0o040000 => Some(Self::Directory),
            _ => None,
        }
    }

    /// Returns `true` for subtree entries.
    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Directory)
    }
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06o}", self.mode_bits())
    }
}

/// A single entry in a tree object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// File mode (regular, executable, symlink, directory).
    pub mode: EntryMode,
    /// Entry name (a single path segment).
    pub name: String,
    /// Content-addressed ID of the referenced object.
    pub object_id: ObjectId,
}

impl TreeEntry {
    /// Create a new tree entry.
    pub fn new(mode: EntryMode, name: impl Into<String>, object_id: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            object_id,
        }
    }
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreeEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

/// Directory listing object.
///
/// Payload layout, repeated per entry:
///
/// ```text
/// <octal mode, no leading zeros> SP <name> NUL <20 raw digest bytes>
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    /// Entries in stored order.
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    /// Create a new tree with the given entries.
    ///
    /// Entries are sorted by name for deterministic hashing.
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort();
        Self { entries }
    }

    /// Create an empty tree.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Serialize the entries in their current order.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            out.extend_from_slice(format!("{:o} {}\0", entry.mode.mode_bits(), entry.name).as_bytes());
            out.extend_from_slice(entry.object_id.as_bytes());
        }
        out
    }

    /// Parse a tree payload, keeping entries in stored order.
    ///
    /// The payload must be consumed exactly; a trailing partial record is
    /// reported as corruption.
    pub fn parse(payload: &[u8]) -> StoreResult<Self> {
        let mut entries = Vec::new();
        let mut rest = payload;
        while !rest.is_empty() {
            let space = rest
                .iter()
                .position(|&b| b == b' ')
                .ok_or_else(|| StoreError::corrupt("tree entry is missing its mode separator"))?;
            let nul = rest[space..]
                .iter()
                .position(|&b| b == 0)
                .map(|p| p + space)
                .ok_or_else(|| StoreError::corrupt("tree entry is missing its name terminator"))?;

            let mode_text = std::str::from_utf8(&rest[..space])
                .map_err(|_| StoreError::corrupt("tree entry mode is not ASCII"))?;
            if mode_text.is_empty() || !mode_text.bytes().all(|b| matches!(b, b'0'..=b'7')) {
                return Err(StoreError::corrupt(format!("invalid tree entry mode {mode_text:?}")));
            }
            let bits = u32::from_str_radix(mode_text, 8)
                .map_err(|_| StoreError::corrupt(format!("invalid tree entry mode {mode_text:?}")))?;
            let mode = EntryMode::from_mode_bits(bits)
                .ok_or_else(|| StoreError::corrupt(format!("unsupported tree entry mode {mode_text}")))?;

            let name = std::str::from_utf8(&rest[space + 1..nul])
                .map_err(|_| StoreError::corrupt("tree entry name is not valid UTF-8"))?;
            if name.is_empty() {
                return Err(StoreError::corrupt("tree entry has an empty name"));
            }
            if name.contains('/') {
                return Err(StoreError::corrupt(format!("tree entry name {name:?} contains '/'")));
            }

            let digest_start = nul + 1;
            let digest_end = digest_start + ObjectId::LEN;
            if rest.len() < digest_end {
                return Err(StoreError::corrupt(format!(
                    "tree entry {name:?} is truncated: {} of {} digest bytes",
                    rest.len() - digest_start,
                    ObjectId::LEN
                )));
            }
            let object_id = ObjectId::from_slice(&rest[digest_start..digest_end])
                .map_err(|e| StoreError::corrupt(e.to_string()))?;

            entries.push(TreeEntry::new(mode, name, object_id));
            rest = &rest[digest_end..];
        }
        Ok(Self { entries })
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Tree, self.encode())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.expect_kind(ObjectKind::Tree)?;
        Self::parse(&obj.data).map_err(|e| e.for_object(obj.compute_id()))
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// Who made a commit and when: `<identity> <seconds> <±HHMM>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Free-form identity, conventionally `Name <email>`.
    pub identity: String,
    /// When the signature was made.
    pub when: Timestamp,
}

impl Signature {
    pub fn new(identity: impl Into<String>, when: Timestamp) -> Self {
        Self {
            identity: identity.into(),
            when,
        }
    }

    /// Parse the value of an `author`/`committer` header line.
    pub fn parse(value: &str) -> StoreResult<Self> {
        let malformed = || StoreError::corrupt(format!("malformed signature {value:?}"));
        let mut parts = value.rsplitn(3, ' ');
        let offset = parts.next().ok_or_else(malformed)?;
        let seconds = parts.next().ok_or_else(malformed)?;
        let identity = parts.next().ok_or_else(malformed)?;
        let seconds: i64 = seconds.parse().map_err(|_| malformed())?;
        let offset_minutes = Timestamp::parse_offset(offset).map_err(|_| malformed())?;
        Ok(Self::new(identity, Timestamp::new(seconds, offset_minutes)))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.identity, self.when)
    }
}

/// Commit object: a root tree plus history and authorship metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Root tree of the snapshot.
    pub tree: ObjectId,
    /// Parent commits in stored order; empty for a root commit and more
    /// than one for a merge.
    pub parents: Vec<ObjectId>,
    pub author: Signature,
    pub committer: Signature,
    /// Headers after `committer` that are carried through unchanged
    /// (`gpgsig`, `encoding`, `mergetag`, ...). Continuation lines of a
    /// multi-line value are joined with `\n`, without their leading space.
    pub extra_headers: Vec<(String, String)>,
    /// Message text, without the trailing newline added on encode.
    pub message: String,
}

impl Commit {
    /// Serialize as header lines, a blank line, then the message.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = format!("tree {}\n", self.tree);
        for parent in &self.parents {
            out.push_str(&format!("parent {parent}\n"));
        }
        out.push_str(&format!("author {}\n", self.author));
        out.push_str(&format!("committer {}\n", self.committer));
        for (key, value) in &self.extra_headers {
            out.push_str(&format!("{key} {}\n", value.replace('\n', "\n ")));
        }
        out.push('\n');
        out.push_str(&self.message);
        out.push('\n');
        out.into_bytes()
    }

    /// Parse a commit payload.
    ///
    /// `tree`, `author` and `committer` must each appear exactly once.
    /// Any number of `parent` lines is accepted, and unrecognised headers
    /// are kept in [`extra_headers`](Self::extra_headers).
    pub fn parse(payload: &[u8]) -> StoreResult<Self> {
        let text = std::str::from_utf8(payload)
            .map_err(|_| StoreError::corrupt("commit payload is not valid UTF-8"))?;
        let (headers, body) = text
            .split_once("\n\n")
            .ok_or_else(|| StoreError::corrupt("commit is missing the blank line before its message"))?;

        let mut tree = None;
        let mut parents = Vec::new();
        let mut author = None;
        let mut committer = None;
        let mut extra_headers: Vec<(String, String)> = Vec::new();
        let mut last_key = "";
        for line in headers.split('\n') {
            if let Some(continued) = line.strip_prefix(' ') {
                match extra_headers.last_mut() {
                    Some((key, value)) if key.as_str() == last_key => {
                        value.push('\n');
                        value.push_str(continued);
                        continue;
                    }
                    _ => {
                        return Err(StoreError::corrupt(format!(
                            "unexpected continuation line {line:?}"
                        )))
                    }
                }
            }
            let (key, value) = line
                .split_once(' ')
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| StoreError::corrupt(format!("malformed commit header {line:?}")))?;
            let slot_taken = match key {
                "tree" => tree.replace(parse_header_id(key, value)?).is_some(),
                "parent" => {
                    parents.push(parse_header_id(key, value)?);
                    false
                }
                "author" => author.replace(Signature::parse(value)?).is_some(),
                "committer" => committer.replace(Signature::parse(value)?).is_some(),
                other => {
                    extra_headers.push((other.to_string(), value.to_string()));
                    false
                }
            };
            if slot_taken {
                return Err(StoreError::corrupt(format!("duplicate commit header {key:?}")));
            }
            last_key = key;
        }

        let missing = |key: &str| StoreError::corrupt(format!("commit has no {key} header"));
        Ok(Self {
            tree: tree.ok_or_else(|| missing("tree"))?,
            parents,
            author: author.ok_or_else(|| missing("author"))?,
            committer: committer.ok_or_else(|| missing("committer"))?,
            extra_headers,
            message: body.strip_suffix('\n').unwrap_or(body).to_string(),
        })
    }

    /// The first parent, which is the previous commit on a linear history.
    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Commit, self.encode())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.expect_kind(ObjectKind::Commit)?;
        Self::parse(&obj.data).map_err(|e| e.for_object(obj.compute_id()))
    }
}

fn parse_header_id(key: &str, value: &str) -> StoreResult<ObjectId> {
    ObjectId::from_hex(value)
        .map_err(|e| StoreError::corrupt(format!("commit {key} {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(byte: u8) -> ObjectId {
        ObjectId::from_hash([byte; 20])
    }

    fn signature(identity: &str) -> Signature {
        Signature::new(identity, Timestamp::new(1_700_000_000, -240))
    }

    #[test]
    fn blob_roundtrip() {
        let blob = Blob::new(b"hello world".to_vec());
        let stored = blob.to_stored_object();
        let decoded = Blob::from_stored_object(&stored).unwrap();
        assert_eq!(blob, decoded);
    }

    #[test]
    fn blob_kind_mismatch() {
        let stored = StoredObject::new(ObjectKind::Tree, b"not a blob".to_vec());
        let err = Blob::from_stored_object(&stored).unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn tree_entries_sorted() {
        let tree = Tree::new(vec![
            TreeEntry::new(EntryMode::Regular, "zebra.txt", id(1)),
            TreeEntry::new(EntryMode::Regular, "alpha.txt", id(2)),
            TreeEntry::new(EntryMode::Directory, "middle", id(3)),
        ]);
        let names: Vec<_> = tree.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["alpha.txt", "middle", "zebra.txt"]);
    }

    #[test]
    fn tree_encoding_layout() {
        let tree = Tree::new(vec![
            TreeEntry::new(EntryMode::Directory, "dir", id(0xbb)),
            TreeEntry::new(EntryMode::Regular, "a.txt", id(0xaa)),
        ]);
        let mut expected = b"100644 a.txt\0".to_vec();
        expected.extend_from_slice(&[0xaa; 20]);
        expected.extend_from_slice(b"40000 dir\0");
        expected.extend_from_slice(&[0xbb; 20]);
        assert_eq!(tree.encode(), expected);
    }

    #[test]
    fn tree_roundtrip() {
        let tree = Tree::new(vec![
            TreeEntry::new(EntryMode::Regular, "file.txt", id(1)),
            TreeEntry::new(EntryMode::Executable, "run.sh", id(2)),
            TreeEntry::new(EntryMode::Symlink, "link", id(3)),
            TreeEntry::new(EntryMode::Directory, "subdir", id(4)),
        ]);
        let stored = tree.to_stored_object();
        let decoded = Tree::from_stored_object(&stored).unwrap();
        assert_eq!(tree, decoded);
    }

    #[test]
    fn tree_parse_keeps_stored_order() {
        let mut payload = b"100644 z\0".to_vec();
        payload.extend_from_slice(&[1; 20]);
        payload.extend_from_slice(b"100644 a\0");
        payload.extend_from_slice(&[2; 20]);
        let tree = Tree::parse(&payload).unwrap();
        assert_eq!(tree.entries[0].name, "z");
        assert_eq!(tree.entries[1].name, "a");
    }

    #[test]
    fn tree_parse_accepts_zero_padded_mode() {
        let mut payload = b"040000 sub\0".to_vec();
        payload.extend_from_slice(&[9; 20]);
        let tree = Tree::parse(&payload).unwrap();
        assert_eq!(tree.entries[0].mode, EntryMode::Directory);
    }

    #[test]
    fn tree_parse_rejects_truncated_digest() {
        let mut payload = b"100644 a.txt\0".to_vec();
        payload.extend_from_slice(&[0xaa; 19]);
        let err = Tree::parse(&payload).unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn tree_parse_rejects_dangling_header() {
        let mut payload = Tree::new(vec![TreeEntry::new(EntryMode::Regular, "a", id(1))]).encode();
        payload.extend_from_slice(b"100644 b");
        assert!(Tree::parse(&payload).is_err());
    }

    #[test]
    fn tree_parse_rejects_signed_mode() {
        let mut payload = b"+100644 a\0".to_vec();
        payload.extend_from_slice(&[1; 20]);
        let err = Tree::parse(&payload).unwrap_err();
        assert!(err.to_string().contains("invalid tree entry mode"));
    }

    #[test]
    fn tree_parse_rejects_slash_in_name() {
        let mut payload = b"100644 a/b\0".to_vec();
        payload.extend_from_slice(&[1; 20]);
        let err = Tree::parse(&payload).unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
        assert!(err.to_string().contains("contains '/'"));
    }

    #[test]
    fn tree_parse_rejects_unknown_mode() {
        let mut payload = b"100664 a\0".to_vec();
        payload.extend_from_slice(&[1; 20]);
        let err = Tree::parse(&payload).unwrap_err();
        assert!(err.to_string().contains("unsupported tree entry mode"));
    }

    #[test]
    fn tree_get_entry() {
        let tree = Tree::new(vec![
            TreeEntry::new(EntryMode::Regular, "a.txt", id(1)),
            TreeEntry::new(EntryMode::Regular, "b.txt", id(2)),
        ]);
        assert!(tree.get("a.txt").is_some());
        assert!(tree.get("missing").is_none());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn empty_tree() {
        let tree = Tree::empty();
        assert!(tree.is_empty());
        assert!(tree.encode().is_empty());
        assert_eq!(
            tree.to_stored_object().compute_id().to_hex(),
            "4b825dc642cb6eb9a060e54bf8d69288fbee4904"
        );
    }

    #[test]
    fn entry_mode_bits_roundtrip() {
        for mode in [
            EntryMode::Regular,
            EntryMode::Executable,
            EntryMode::Symlink,
            EntryMode::Directory,
        ] {
            assert_eq!(EntryMode::from_mode_bits(mode.mode_bits()), Some(mode));
        }
        assert!(EntryMode::from_mode_bits(0o777).is_none());
    }

    #[test]
    fn entry_mode_display_is_zero_padded() {
        assert_eq!(EntryMode::Directory.to_string(), "040000");
        assert_eq!(EntryMode::Regular.to_string(), "100644");
    }

    #[test]
    fn commit_encoding_without_parent() {
        let commit = Commit {
            tree: id(0xab),
            parents: Vec::new(),
            author: signature("Alice"),
            committer: signature("Alice"),
            extra_headers: Vec::new(),
            message: "hello".into(),
        };
        let text = String::from_utf8(commit.encode()).unwrap();
        assert_eq!(
            text,
            format!(
                "tree {}\nauthor Alice 1700000000 -0400\ncommitter Alice 1700000000 -0400\n\nhello\n",
                id(0xab)
            )
        );
    }

    #[test]
    fn commit_roundtrip_with_parent() {
        let commit = Commit {
            tree: id(1),
            parents: vec![id(2)],
            author: signature("Alice <alice@example.com>"),
            committer: signature("Bob <bob@example.com>"),
            extra_headers: Vec::new(),
            message: "multi\nline\n\nmessage".into(),
        };
        let decoded = Commit::from_stored_object(&commit.to_stored_object()).unwrap();
        assert_eq!(commit, decoded);
    }

    #[test]
    fn commit_parse_rejects_missing_tree() {
        let payload = b"author A 1 +0000\ncommitter A 1 +0000\n\nmsg\n";
        let err = Commit::parse(payload).unwrap_err();
        assert!(err.to_string().contains("no tree header"));
    }

    #[test]
    fn commit_parse_keeps_unknown_header() {
        let payload = format!(
            "tree {}\nauthor A 1 +0000\ncommitter A 1 +0000\nencoding ISO-8859-1\n\nmsg\n",
            id(1)
        );
        let commit = Commit::parse(payload.as_bytes()).unwrap();
        assert_eq!(
            commit.extra_headers,
            vec![("encoding".to_string(), "ISO-8859-1".to_string())]
        );
        assert_eq!(commit.encode(), payload.as_bytes());
    }

    #[test]
    fn commit_parse_merge_commit() {
        let payload = format!(
            "tree {}\nparent {}\nparent {}\nauthor A 1 +0000\ncommitter A 1 +0000\n\nMerge branch 'topic'\n",
            id(1),
            id(2),
            id(3)
        );
        let commit = Commit::parse(payload.as_bytes()).unwrap();
        assert_eq!(commit.parents, vec![id(2), id(3)]);
        assert_eq!(commit.first_parent(), Some(&id(2)));
        assert_eq!(commit.encode(), payload.as_bytes());
    }

    #[test]
    fn commit_parse_signed_commit() {
        let payload = format!(
            "tree {}\nauthor A 1 +0000\ncommitter A 1 +0000\n\
             gpgsig -----BEGIN PGP SIGNATURE-----\n \n iQEzBAABCAAdFiEE\n -----END PGP SIGNATURE-----\n\
             \nsigned\n",
            id(1)
        );
        let commit = Commit::parse(payload.as_bytes()).unwrap();
        assert_eq!(commit.extra_headers.len(), 1);
        let (key, value) = &commit.extra_headers[0];
        assert_eq!(key, "gpgsig");
        assert_eq!(
            value,
            "-----BEGIN PGP SIGNATURE-----\n\niQEzBAABCAAdFiEE\n-----END PGP SIGNATURE-----"
        );
        assert_eq!(commit.message, "signed");
        // Re-encoding reproduces the stored bytes, so the digest is stable.
        assert_eq!(commit.encode(), payload.as_bytes());
    }

    #[test]
    fn commit_parse_rejects_orphan_continuation() {
        let payload = format!("tree {}\n stray\nauthor A 1 +0000\ncommitter A 1 +0000\n\nmsg\n", id(1));
        assert!(Commit::parse(payload.as_bytes()).is_err());
    }

    #[test]
    fn commit_parse_rejects_duplicate_author() {
        let payload = format!(
            "tree {}\nauthor A 1 +0000\nauthor B 1 +0000\ncommitter A 1 +0000\n\nmsg\n",
            id(1)
        );
        let err = Commit::parse(payload.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("duplicate commit header \"author\""));
    }

    #[test]
    fn signature_parse_keeps_spaces_in_identity() {
        let sig = Signature::parse("Ada Lovelace <ada@example.com> 1234 +0100").unwrap();
        assert_eq!(sig.identity, "Ada Lovelace <ada@example.com>");
        assert_eq!(sig.when, Timestamp::new(1234, 60));
    }

    #[test]
    fn different_kinds_produce_different_ids() {
        let data = b"same data".to_vec();
        let blob = StoredObject::new(ObjectKind::Blob, data.clone());
        let tree = StoredObject::new(ObjectKind::Tree, data.clone());
        let commit = StoredObject::new(ObjectKind::Commit, data);
        assert_ne!(blob.compute_id(), tree.compute_id());
        assert_ne!(blob.compute_id(), commit.compute_id());
    }

    #[test]
    fn object_kind_display_and_parse() {
        for kind in [ObjectKind::Blob, ObjectKind::Tree, ObjectKind::Commit] {
            assert_eq!(kind.to_string().parse::<ObjectKind>().unwrap(), kind);
        }
        assert!("tag".parse::<ObjectKind>().is_err());
    }
}
