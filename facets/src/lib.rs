//! # Strata Facets
//!
//! Assembles the navigable result model from a compiled query and the
//! search index reply: entity facets with drill-down links, labelled range
//! groups, aggregated chronology and geo tiles, paging, sorting and the
//! active filters with their removal links.

mod active;
mod assembler;
mod config;
mod entity;
mod error;
mod links;
pub mod model;
mod paging;
mod ranges;
mod sorting;
mod tiles;

pub use assembler::FacetAssembler;
pub use config::FacetsConfig;
pub use entity::CompositeValue;
pub use error::FacetError;
pub use error::Result;
pub use links::LinkBuilder;
pub use model::ResponseModel;
pub use ranges::Group;
pub use ranges::merge_buckets;
