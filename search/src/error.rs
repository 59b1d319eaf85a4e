use strata_engine::EngineError;
use strata_facets::FacetError;
use strata_query::CompileError;
use strata_query::ParseError;
use thiserror::Error;

/// The single error a search request fails with.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The request itself is malformed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The entity store failed while compiling or labelling
    #[error("Entity store failure: {0}")]
    Store(#[from] strata_hierarchy::StoreError),

    /// The search index failed; no partial response is returned
    #[error("Search index unavailable: {0}")]
    Engine(#[from] EngineError),
}

impl From<CompileError> for SearchError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::Parse(err) => SearchError::Parse(err),
            CompileError::Store(err) => SearchError::Store(err),
        }
    }
}

impl From<FacetError> for SearchError {
    fn from(err: FacetError) -> Self {
        match err {
            FacetError::Store(err) => SearchError::Store(err),
        }
    }
}

impl SearchError {
    /// The caller sent a bad request, as opposed to an upstream failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SearchError::Parse(_))
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Failures loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// A section parsed but failed validation
    #[error("Invalid [{section}] config: {reason}")]
    Invalid {
        section: &'static str,
        reason: String,
    },
}
