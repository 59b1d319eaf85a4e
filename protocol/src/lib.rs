//! Wire contract between strata and a Solr-style faceted search index.
//!
//! [`EngineRequest`] is what the query compiler produces and renders to
//! `select` form parameters; [`EngineResponse`] is the parsed index reply
//! handed to the facet assembler. Neither side executes queries itself.

mod error;
mod request;
mod response;

pub use error::ProtocolError;
pub use request::EngineRequest;
pub use request::MATCH_ALL;
pub use request::RangeKind;
pub use request::RangeRequest;
pub use request::SortOrder;
pub use request::SortSpec;
pub use response::EngineResponse;
pub use response::FacetCount;
pub use response::FieldStats;
pub use response::RangeFacet;
pub use response::StatValue;
