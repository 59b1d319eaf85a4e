//! # Strata Query
//!
//! Turns faceted-search request parameters into an index request.
//!
//! - [`params`]: the ordered parameter multimap and the parameter registry
//! - [`dsl`]: expansion of `a||b---c` style values into identifier paths
//! - [`field`]: typed index field names derived from resolved entities
//! - [`literal`] and [`stats`]: numeric and date ranges, compiled in two
//!   phases when the index must first report field bounds
//! - [`compiler`]: resolution of every path and assembly of the final
//!   [`CompiledQuery`]

pub mod compiler;
pub mod config;
pub mod dsl;
pub mod error;
pub mod escape;
pub mod field;
pub mod fragment;
pub mod literal;
pub mod params;
pub mod schema;
pub mod sort;
pub mod stats;

pub use compiler::CompiledQuery;
pub use compiler::FacetFieldMeta;
pub use compiler::FacetKind;
pub use compiler::QueryCompiler;
pub use compiler::RejectedFilter;
pub use config::CompilerConfig;
pub use error::CompileError;
pub use error::ParseError;
pub use error::Result;
pub use field::FieldFamily;
pub use field::FieldPath;
pub use fragment::MATCH_NOTHING;
pub use fragment::QueryFragment;
pub use literal::LiteralRange;
pub use params::Param;
pub use params::RequestParams;
pub use sort::SortKey;
pub use sort::SortTerm;
pub use stats::RangeBounds;
pub use stats::RangeState;
pub use stats::StatsTable;
