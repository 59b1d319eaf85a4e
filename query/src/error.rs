use strata_hierarchy::StoreError;
use thiserror::Error;

/// Malformed request input; the whole request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Malformed value for '{parameter}': {reason}")]
    Malformed { parameter: String, reason: String },

    #[error("Too many alternatives: {count} paths exceed the limit of {limit}")]
    TooManyAlternatives { count: usize, limit: usize },

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid sort: {0}")]
    InvalidSort(String),

    #[error("Invalid paging: {0}")]
    InvalidPaging(String),
}

impl ParseError {
    pub fn malformed(parameter: &str, reason: impl Into<String>) -> Self {
        ParseError::Malformed {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The entity store failed; misses never end up here
    #[error("Entity store failure: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, CompileError>;
