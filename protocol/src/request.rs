//! Requests sent to the search index.

use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

/// Query that matches every document.
pub const MATCH_ALL: &str = "*:*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeKind {
    Numeric,
    Date,
}

/// Range facet parameters for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeRequest {
    pub kind: RangeKind,
    /// Lower bound, rendered in index syntax
    pub start: String,
    /// Upper bound, rendered in index syntax
    pub end: String,
    /// Bucket width, e.g. `2.5` or `+30DAYS`
    pub gap: String,
    /// Return buckets ordered by value rather than count
    #[serde(default = "default_sort_by_index")]
    pub sort_by_index: bool,
}

fn default_sort_by_index() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub const fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One index field to sort by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

/// Structured query for a Solr-style faceted index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRequest {
    /// Main query; filters narrow it further
    pub query: String,
    #[serde(default)]
    pub filter_clauses: Vec<String>,
    #[serde(default)]
    pub facet_fields: BTreeSet<String>,
    #[serde(default)]
    pub stats_fields: BTreeSet<String>,
    #[serde(default)]
    pub range_requests: BTreeMap<String, RangeRequest>,
    #[serde(default)]
    pub highlight_queries: Vec<String>,
    #[serde(default)]
    pub return_fields: Vec<String>,
    #[serde(default)]
    pub sort: Vec<SortSpec>,
    pub rows: usize,
    #[serde(default)]
    pub start: usize,
    /// Smallest count a facet value needs to be returned
    #[serde(default = "default_facet_min_count")]
    pub facet_min_count: u32,
    /// Maximum values per facet field; `-1` for unlimited
    #[serde(default = "default_facet_limit")]
    pub facet_limit: i64,
}

fn default_facet_min_count() -> u32 {
    1
}

fn default_facet_limit() -> i64 {
    -1
}

impl Default for EngineRequest {
    fn default() -> Self {
        Self {
            query: MATCH_ALL.to_string(),
            filter_clauses: Vec::new(),
            facet_fields: BTreeSet::new(),
            stats_fields: BTreeSet::new(),
            range_requests: BTreeMap::new(),
            highlight_queries: Vec::new(),
            return_fields: Vec::new(),
            sort: Vec::new(),
            rows: 0,
            start: 0,
            facet_min_count: default_facet_min_count(),
            facet_limit: default_facet_limit(),
        }
    }
}

impl EngineRequest {
    pub fn has_facets(&self) -> bool {
        !self.facet_fields.is_empty() || !self.range_requests.is_empty()
    }

    /// Render as Solr `select` form parameters.
    pub fn to_solr_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("q".to_string(), self.query.clone())];
        params.extend(
            self.filter_clauses
                .iter()
                .map(|clause| ("fq".to_string(), clause.clone())),
        );

        if self.has_facets() {
            params.push(("facet".to_string(), "true".to_string()));
            params.push((
                "facet.mincount".to_string(),
                self.facet_min_count.to_string(),
            ));
            params.push(("facet.limit".to_string(), self.facet_limit.to_string()));
        }
        for field in &self.facet_fields {
            params.push(("facet.field".to_string(), field.clone()));
        }
        for (field, range) in &self.range_requests {
            params.push(("facet.range".to_string(), field.clone()));
            params.push((format!("f.{field}.facet.range.start"), range.start.clone()));
            params.push((format!("f.{field}.facet.range.end"), range.end.clone()));
            params.push((format!("f.{field}.facet.range.gap"), range.gap.clone()));
            if range.sort_by_index {
                params.push((format!("f.{field}.facet.sort"), "index".to_string()));
            }
        }

        if !self.stats_fields.is_empty() {
            params.push(("stats".to_string(), "true".to_string()));
        }
        for field in &self.stats_fields {
            params.push(("stats.field".to_string(), field.clone()));
        }

        if !self.highlight_queries.is_empty() {
            params.push(("hl".to_string(), "true".to_string()));
            params.push(("hl.q".to_string(), self.highlight_queries.join(" ")));
        }
        if !self.return_fields.is_empty() {
            params.push(("fl".to_string(), self.return_fields.join(",")));
        }
        if !self.sort.is_empty() {
            let sort = self
                .sort
                .iter()
                .map(|spec| format!("{} {}", spec.field, spec.order))
                .collect::<Vec<_>>()
                .join(", ");
            params.push(("sort".to_string(), sort));
        }
        params.push(("rows".to_string(), self.rows.to_string()));
        params.push(("start".to_string(), self.start.to_string()));
        params.push(("wt".to_string(), "json".to_string()));
        params
    }
}
