//! The navigable result model returned to clients.

use serde::Serialize;
use serde_json::Value;
use serde_with::skip_serializing_none;
use strata_hierarchy::DataKind;
use strata_protocol::RangeKind;
use strata_protocol::SortOrder;
use strata_tiles::BBox;

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseModel {
    /// Link reproducing the current request
    pub id: String,
    pub total: u64,
    pub start: usize,
    pub rows: usize,
    pub paging: Paging,
    pub sort: SortDescriptor,
    pub active_filters: Vec<ActiveFilter>,
    pub facets: Vec<EntityFacet>,
    pub range_facets: Vec<RangeFacetModel>,
    pub chrono_tiles: Option<TileFacet<ChronoOption>>,
    pub geo_tiles: Option<TileFacet<GeoOption>>,
    pub records: Vec<Value>,
    /// Identifiers in the request that matched no entity
    pub unresolved: Vec<String>,
    pub rejected_filters: Vec<RejectedFilterModel>,
}

/// Drill-down options of an entity facet, grouped by the kind of field
/// each option leads to.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityFacet {
    pub field: String,
    pub parameter: String,
    pub label: String,
    pub groups: Vec<OptionGroup>,
}

impl EntityFacet {
    pub fn options(&self) -> impl Iterator<Item = &FacetOption> {
        self.groups.iter().flat_map(|group| group.options.iter())
    }

    pub fn group(&self, kind: DataKind) -> Option<&OptionGroup> {
        self.groups.iter().find(|group| group.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionGroup {
    pub kind: DataKind,
    pub options: Vec<FacetOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub slug: String,
    pub label: String,
    pub uri: String,
    pub count: u64,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeFacetModel {
    pub field: String,
    pub parameter: String,
    pub label: String,
    pub kind: RangeKind,
    pub options: Vec<RangeOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeOption {
    pub label: String,
    pub low: String,
    pub high: String,
    pub count: u64,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileFacet<T> {
    pub field: String,
    pub parameter: String,
    /// Digits per aggregated key
    pub depth: usize,
    pub options: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChronoOption {
    pub key: String,
    pub count: u64,
    pub earliest_year: i64,
    pub latest_year: i64,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoOption {
    pub key: String,
    pub count: u64,
    pub bbox: BBox,
    pub link: String,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveFilter {
    pub parameter: String,
    pub value: String,
    pub label: String,
    pub removal_link: String,
    /// Same filter one hierarchy level up
    pub broaden_link: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paging {
    pub first: Option<String>,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortDescriptor {
    pub active: Vec<SortOption>,
    pub options: Vec<SortOption>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortOption {
    pub key: String,
    pub label: String,
    pub order: SortOrder,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedFilterModel {
    pub parameter: String,
    pub value: String,
    pub reason: String,
}
