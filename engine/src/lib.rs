//! Search index collaborator.
//!
//! The query pipeline only sees [`SearchEngine`]; [`HttpSearchEngine`] is
//! the production implementation talking to a Solr-style `select` handler.

mod config;
mod error;
mod http;

pub use config::EngineConfig;
pub use error::EngineError;
pub use error::Result;
pub use http::HttpSearchEngine;

use strata_protocol::EngineRequest;
use strata_protocol::EngineResponse;

/// Executes one request against the search index.
///
/// Implementations must not return partial results: a request either
/// yields a complete response or an error.
pub trait SearchEngine: Send + Sync {
    fn execute(&self, request: &EngineRequest) -> Result<EngineResponse>;
}
