//! Responses returned by the search index.

use crate::error::ProtocolError;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_with::skip_serializing_none;
use std::collections::BTreeMap;

/// One value of a facet together with its document count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: u64,
}

impl FacetCount {
    pub fn new(value: impl Into<String>, count: u64) -> Self {
        Self {
            value: value.into(),
            count,
        }
    }
}

/// Buckets of a range facet, in the order the index returned them.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RangeFacet {
    pub buckets: Vec<FacetCount>,
    pub gap: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Statistic value; dates come back as ISO-8601 text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(f64),
    Text(String),
}

impl StatValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Number(value) => Some(*value),
            StatValue::Text(text) => text.parse().ok(),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            StatValue::Number(value) => value.to_string(),
            StatValue::Text(text) => text.clone(),
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldStats {
    pub min: Option<StatValue>,
    pub max: Option<StatValue>,
    #[serde(default)]
    pub count: u64,
}

impl FieldStats {
    pub fn numeric(min: f64, max: f64, count: u64) -> Self {
        Self {
            min: Some(StatValue::Number(min)),
            max: Some(StatValue::Number(max)),
            count,
        }
    }

    pub fn text(min: impl Into<String>, max: impl Into<String>, count: u64) -> Self {
        Self {
            min: Some(StatValue::Text(min.into())),
            max: Some(StatValue::Text(max.into())),
            count,
        }
    }

    /// True when the index saw no values for the field.
    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.min.is_none() || self.max.is_none()
    }
}

/// Parsed result of one index query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineResponse {
    pub num_found: u64,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub docs: Vec<Value>,
    #[serde(default)]
    pub facet_fields: BTreeMap<String, Vec<FacetCount>>,
    #[serde(default)]
    pub facet_ranges: BTreeMap<String, RangeFacet>,
    #[serde(default)]
    pub stats: BTreeMap<String, FieldStats>,
    /// Highlight snippets keyed by document id, then field
    #[serde(default)]
    pub highlighting: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl EngineResponse {
    pub fn facet(&self, field: &str) -> Option<&[FacetCount]> {
        self.facet_fields.get(field).map(Vec::as_slice)
    }

    pub fn stats_for(&self, field: &str) -> Option<&FieldStats> {
        self.stats.get(field)
    }

    /// Parse a Solr `wt=json` response body.
    pub fn from_solr_json(body: &str) -> Result<Self, ProtocolError> {
        let raw: RawSolr = serde_json::from_str(body)?;
        if let Some(error) = raw.error {
            let message = error
                .get("msg")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(ProtocolError::Engine(message));
        }
        let Some(docs) = raw.response else {
            return Err(ProtocolError::Shape(
                "missing response section".to_string(),
            ));
        };

        let mut response = EngineResponse {
            num_found: docs.num_found,
            start: docs.start,
            docs: docs.docs,
            highlighting: raw.highlighting.unwrap_or_default(),
            ..EngineResponse::default()
        };

        if let Some(facet_counts) = raw.facet_counts {
            for (field, flat) in facet_counts.facet_fields {
                let counts = pairs(&field, &flat)?;
                response.facet_fields.insert(field, counts);
            }
            for (field, range) in facet_counts.facet_ranges {
                let facet = RangeFacet {
                    buckets: pairs(&field, &range.counts)?,
                    gap: range.gap.as_ref().map(scalar_text),
                    start: range.start.as_ref().map(scalar_text),
                    end: range.end.as_ref().map(scalar_text),
                };
                response.facet_ranges.insert(field, facet);
            }
        }

        if let Some(stats) = raw.stats {
            for (field, stats) in stats.stats_fields {
                response.stats.insert(field, stats.unwrap_or_default());
            }
        }
        Ok(response)
    }
}

#[derive(Deserialize)]
struct RawSolr {
    response: Option<RawDocs>,
    facet_counts: Option<RawFacetCounts>,
    stats: Option<RawStats>,
    highlighting: Option<BTreeMap<String, BTreeMap<String, Vec<String>>>>,
    error: Option<Value>,
}

#[derive(Deserialize)]
struct RawDocs {
    #[serde(rename = "numFound")]
    num_found: u64,
    #[serde(default)]
    start: u64,
    #[serde(default)]
    docs: Vec<Value>,
}

#[derive(Deserialize)]
struct RawFacetCounts {
    #[serde(default)]
    facet_fields: BTreeMap<String, Vec<Value>>,
    #[serde(default)]
    facet_ranges: BTreeMap<String, RawRange>,
}

#[derive(Deserialize)]
struct RawRange {
    #[serde(default)]
    counts: Vec<Value>,
    gap: Option<Value>,
    start: Option<Value>,
    end: Option<Value>,
}

#[derive(Deserialize)]
struct RawStats {
    #[serde(default)]
    stats_fields: BTreeMap<String, Option<FieldStats>>,
}

/// Solr flattens facet counts as `[value, count, value, count, ...]`.
fn pairs(field: &str, flat: &[Value]) -> Result<Vec<FacetCount>, ProtocolError> {
    if flat.len() % 2 != 0 {
        return Err(ProtocolError::Shape(format!(
            "facet '{field}' has an odd number of entries"
        )));
    }
    flat.chunks_exact(2)
        .map(|pair| {
            let count = pair[1].as_u64().ok_or_else(|| {
                ProtocolError::Shape(format!("facet '{field}' has a non-integer count"))
            })?;
            Ok(FacetCount::new(scalar_text(&pair[0]), count))
        })
        .collect()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
