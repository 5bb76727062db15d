use cairn_types::ObjectId;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No object file exists for the requested digest.
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// A digest or short digest could not be resolved to exactly one object.
    #[error("not a valid object name {reference}: {reason}")]
    InvalidReference { reference: String, reason: String },

    /// The stored bytes could not be decoded into a well-formed object.
    #[error("corrupt object{}: {reason}", .id.map(|id| format!(" {id}")).unwrap_or_default())]
    CorruptObject {
        id: Option<ObjectId>,
        reason: String,
    },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// A corruption error not yet tied to a particular object.
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptObject {
            id: None,
            reason: reason.into(),
        }
    }

    /// Attach the object being read to a corruption error.
    pub fn for_object(self, object: ObjectId) -> Self {
        match self {
            Self::CorruptObject { id: None, reason } => Self::CorruptObject {
                id: Some(object),
                reason,
            },
            other => other,
        }
    }

    pub(crate) fn invalid_reference(reference: &str, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
