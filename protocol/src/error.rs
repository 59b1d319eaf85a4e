use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Body is not valid JSON for the expected envelope
    #[error("Invalid response JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON parsed but a section has an unexpected shape
    #[error("Unexpected response shape: {0}")]
    Shape(String),

    /// The index reported an error instead of results
    #[error("Search index error: {0}")]
    Engine(String),
}
