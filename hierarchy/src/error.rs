use thiserror::Error;

/// Failures reported by an entity store collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached
    #[error("Entity store unavailable: {0}")]
    Unavailable(String),

    /// IO error while loading entity data
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Entity data could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// No entity matches the identifier
    #[error("Identifier not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResolveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
