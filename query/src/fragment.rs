use crate::literal::parse_gap;
use crate::literal::parse_point;
use crate::literal::render_gap;
use crate::literal::render_point;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::btree_map::Entry;
use strata_protocol::RangeRequest;

/// Clause that matches no document.
pub const MATCH_NOTHING: &str = "-*:*";

/// Accumulated index query pieces.
///
/// Clauses in one fragment are AND-combined; [`QueryFragment::any_of`]
/// OR-combines alternatives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFragment {
    pub filter_clauses: Vec<String>,
    pub facet_fields: BTreeSet<String>,
    pub stats_fields: BTreeSet<String>,
    pub range_requests: BTreeMap<String, RangeRequest>,
    /// Fields whose bounds must be learned before a range can be built
    pub prequery_stats: BTreeSet<String>,
    pub highlight_queries: Vec<String>,
}

impl QueryFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.filter_clauses.is_empty()
            && self.facet_fields.is_empty()
            && self.stats_fields.is_empty()
            && self.range_requests.is_empty()
            && self.prequery_stats.is_empty()
            && self.highlight_queries.is_empty()
    }

    pub fn and_clause(&mut self, clause: impl Into<String>) {
        let clause = clause.into();
        if !self.filter_clauses.contains(&clause) {
            self.filter_clauses.push(clause);
        }
    }

    /// AND-merge another fragment into this one.
    pub fn merge(&mut self, other: QueryFragment) {
        for clause in other.filter_clauses {
            self.and_clause(clause);
        }
        self.absorb_requests(other.facet_fields, other.stats_fields, other.range_requests);
        self.prequery_stats.extend(other.prequery_stats);
        for query in other.highlight_queries {
            if !self.highlight_queries.contains(&query) {
                self.highlight_queries.push(query);
            }
        }
    }

    /// OR-combine alternatives into one fragment.
    ///
    /// A lone alternative keeps its clauses as separate filters. Several
    /// alternatives become one clause of parenthesised conjunctions joined
    /// with OR. Facet, stats and range requests of every alternative are
    /// kept.
    pub fn any_of(alternatives: Vec<QueryFragment>) -> QueryFragment {
        let mut combined = QueryFragment::new();
        let mut groups: Vec<Vec<String>> = Vec::new();
        for alternative in alternatives {
            if !alternative.filter_clauses.is_empty()
                && !groups.contains(&alternative.filter_clauses)
            {
                groups.push(alternative.filter_clauses);
            }
            combined.absorb_requests(
                alternative.facet_fields,
                alternative.stats_fields,
                alternative.range_requests,
            );
            combined.prequery_stats.extend(alternative.prequery_stats);
            for query in alternative.highlight_queries {
                if !combined.highlight_queries.contains(&query) {
                    combined.highlight_queries.push(query);
                }
            }
        }
        if groups.len() == 1 {
            combined.filter_clauses = groups.remove(0);
        } else if !groups.is_empty() {
            let disjunction = groups
                .iter()
                .map(|clauses| format!("({})", clauses.join(" AND ")))
                .collect::<Vec<_>>()
                .join(" OR ");
            combined.filter_clauses.push(disjunction);
        }
        combined
    }

    fn absorb_requests(
        &mut self,
        facet_fields: BTreeSet<String>,
        stats_fields: BTreeSet<String>,
        range_requests: BTreeMap<String, RangeRequest>,
    ) {
        self.facet_fields.extend(facet_fields);
        self.stats_fields.extend(stats_fields);
        for (field, range) in range_requests {
            match self.range_requests.entry(field) {
                Entry::Vacant(entry) => {
                    entry.insert(range);
                }
                Entry::Occupied(mut entry) => {
                    let merged = union_range(entry.get(), &range);
                    entry.insert(merged);
                }
            }
        }
    }
}

/// Range request spanning both inputs, keeping the bucket count of `kept`.
///
/// Requests that cannot be read back in their own kind leave `kept` as is.
fn union_range(kept: &RangeRequest, other: &RangeRequest) -> RangeRequest {
    let kind = kept.kind;
    if other.kind != kind {
        return kept.clone();
    }
    let points = (
        parse_point(kind, &kept.start),
        parse_point(kind, &kept.end),
        parse_point(kind, &other.start),
        parse_point(kind, &other.end),
    );
    let (Ok(kept_low), Ok(kept_high), Ok(other_low), Ok(other_high)) = points else {
        return kept.clone();
    };
    let low = kept_low.min(other_low);
    let high = kept_high.max(other_high);
    if low == kept_low && high == kept_high {
        return kept.clone();
    }
    let groups = parse_gap(kind, &kept.gap)
        .map(|width| ((kept_high - kept_low) / width).round().max(1.0) as usize)
        .unwrap_or(1);
    RangeRequest {
        kind,
        start: render_point(kind, low),
        end: render_point(kind, high),
        gap: render_gap(kind, high - low, groups),
        sort_by_index: kept.sort_by_index,
    }
}
