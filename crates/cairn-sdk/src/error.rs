use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("repository not initialized at {0}")]
    NotInitialized(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("store error: {0}")]
    Store(#[from] cairn_store::StoreError),

    #[error("index error: {0}")]
    Index(#[from] cairn_index::IndexError),
}

pub type SdkResult<T> = Result<T, SdkError>;
