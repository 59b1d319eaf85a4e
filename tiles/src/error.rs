use thiserror::Error;

/// Errors raised while encoding or decoding tile paths
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    /// The requested bounds do not fit inside the tile space
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// The path contains characters outside `{0,1,2,3}` or is too deep
    #[error("Invalid tile path: {0}")]
    InvalidPath(String),

    /// The magnitude prefix could not be understood
    #[error("Unrecognized tile prefix: {0}")]
    UnrecognizedPrefix(String),
}

pub type Result<T> = std::result::Result<T, TileError>;
