use strata_hierarchy::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FacetError {
    /// The entity store failed while labelling options
    #[error("Entity store failure: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, FacetError>;
