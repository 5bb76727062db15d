//! Error types for the index crate.

/// Errors that can occur while turning index entries into trees.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// An entry path is empty, absolute, has an empty segment, or lies
    /// outside the directory being built.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// An entry's mode is not one a tree can record.
    #[error("unsupported mode {mode:o} for {path}")]
    InvalidMode { path: String, mode: u32 },

    /// Two entries resolve to the same name within one directory.
    #[error("duplicate entry: {0}")]
    DuplicateEntry(String),

    /// A file and a directory claim the same name within one directory.
    #[error("path is both a file and a directory: {0}")]
    PathConflict(String),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] cairn_store::StoreError),

    /// Reading working-directory metadata failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
