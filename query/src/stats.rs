//! Two-phase range compilation.
//!
//! Every numeric or date field starts [`RangeState::Unbounded`]. With
//! index statistics for the field it becomes [`RangeState::Bound`];
//! without them it waits in [`RangeState::AwaitingStats`] until a
//! statistics-only prequery supplies them.

use crate::literal::stat_point;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use strata_protocol::EngineResponse;
use strata_protocol::FieldStats;
use strata_protocol::RangeKind;

/// Known value bounds of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeBounds {
    pub min: f64,
    pub max: f64,
    /// Number of documents with a value, when the index reported it
    pub count: Option<u64>,
}

impl RangeBounds {
    pub const EMPTY: RangeBounds = RangeBounds {
        min: 0.0,
        max: 0.0,
        count: Some(0),
    };

    /// The index holds no values for the field.
    pub fn is_empty(&self) -> bool {
        self.count == Some(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeState {
    Unbounded,
    AwaitingStats,
    Bound(RangeBounds),
}

impl RangeState {
    /// Move one step toward `Bound` using whatever `stats` know.
    pub fn advance(self, field: &str, kind: RangeKind, stats: &StatsTable) -> Self {
        match self {
            RangeState::Bound(bounds) => RangeState::Bound(bounds),
            RangeState::Unbounded | RangeState::AwaitingStats => match stats.bounds(field, kind) {
                Some(bounds) => RangeState::Bound(bounds),
                None => RangeState::AwaitingStats,
            },
        }
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self, RangeState::AwaitingStats)
    }

    pub fn bounds(&self) -> Option<RangeBounds> {
        match self {
            RangeState::Bound(bounds) => Some(*bounds),
            RangeState::Unbounded | RangeState::AwaitingStats => None,
        }
    }
}

/// Field statistics learned from the index, keyed by field name.
///
/// Once the index has answered a statistics request, a field it did not
/// report is known to hold no values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsTable {
    fields: BTreeMap<String, FieldStats>,
    #[serde(skip)]
    answered: bool,
}

impl StatsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_response(response: &EngineResponse) -> Self {
        Self {
            fields: response.stats.clone(),
            answered: true,
        }
    }

    /// Mark the table as the index's full answer to a prequery.
    pub fn mark_answered(&mut self) {
        self.answered = true;
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn insert(&mut self, field: impl Into<String>, stats: FieldStats) {
        self.fields.insert(field.into(), stats);
    }

    pub fn get(&self, field: &str) -> Option<&FieldStats> {
        self.fields.get(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Bounds of `field`; a field the index reported without values, or
    /// left out of an answered prequery, is bound and empty.
    pub fn bounds(&self, field: &str, kind: RangeKind) -> Option<RangeBounds> {
        let Some(stats) = self.fields.get(field) else {
            return self.answered.then_some(RangeBounds::EMPTY);
        };
        let min = stats.min.as_ref().and_then(|value| stat_point(kind, value));
        let max = stats.max.as_ref().and_then(|value| stat_point(kind, value));
        match (min, max) {
            (Some(min), Some(max)) if stats.count > 0 => Some(RangeBounds {
                min: min.min(max),
                max: max.max(min),
                count: Some(stats.count),
            }),
            _ => Some(RangeBounds::EMPTY),
        }
    }
}
