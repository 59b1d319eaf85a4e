//! # Strata Hierarchy
//!
//! Read-only resolution of domain entities and their ancestry.
//!
//! Three hierarchies are walked:
//! - concept taxonomies, where a node may have several parents (a DAG)
//! - spatial containment, single-parent and terminated by a root sentinel
//! - project nesting, single-parent like spatial containment
//!
//! Entities come from an [`EntityStore`] collaborator and are memoized per
//! resolver, with a read-through [`strata_utils_cache::SharedCache`] behind
//! the memo. Cache failures never surface as resolution failures.

pub mod config;
pub mod error;
pub mod model;
pub mod resolver;
pub mod store;

pub use config::ResolverConfig;
pub use error::ResolveError;
pub use error::Result;
pub use error::StoreError;
pub use model::AncestorChain;
pub use model::ChronoMetadata;
pub use model::DataKind;
pub use model::EntityNode;
pub use model::GeoMetadata;
pub use model::HierarchyKind;
pub use model::ItemType;
pub use model::Metadata;
pub use model::MetadataKind;
pub use model::NodeMetadata;
pub use resolver::HierarchyResolver;
pub use resolver::InheritedMetadata;
pub use store::EntityStore;
pub use store::InMemoryStore;
