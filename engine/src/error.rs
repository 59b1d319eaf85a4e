use strata_protocol::ProtocolError;
use thiserror::Error;

/// Failures talking to the search index. Any of them fails the whole
/// request.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No reply within the configured timeout
    #[error("Search index timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// The index could not be reached
    #[error("Search index unreachable: {0}")]
    Connection(String),

    /// The index answered with a non-success status
    #[error("Search index returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The reply could not be read as a search response
    #[error("Undecodable search response: {0}")]
    Decode(#[from] ProtocolError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
