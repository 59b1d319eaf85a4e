//! Range facets: engine buckets merged into a fixed number of labelled
//! groups.

use crate::links::LinkBuilder;
use crate::model::RangeFacetModel;
use crate::model::RangeOption;
use strata_protocol::RangeFacet;
use strata_protocol::RangeKind;
use strata_protocol::RangeRequest;
use strata_query::FacetFieldMeta;
use strata_query::RequestParams;
use strata_query::literal::RANGE_DELIMITER;
use strata_query::literal::parse_point;
use strata_query::literal::render_number;
use strata_query::literal::render_point;
use tracing::debug;

/// One merged group of buckets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Group {
    pub low: f64,
    pub high: f64,
    pub count: u64,
}

/// Merge adjacent buckets down to at most `target` groups.
///
/// `lows` are bucket lower bounds in ascending order; each bucket ends
/// where the next begins and the last one ends at `end`.
pub fn merge_buckets(lows: &[(f64, u64)], end: f64, target: usize) -> Vec<Group> {
    if lows.is_empty() {
        return Vec::new();
    }
    let per_group = lows.len().div_ceil(target.max(1));
    let chunks: Vec<&[(f64, u64)]> = lows.chunks(per_group).collect();
    chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| {
            let low = chunk.first().map_or(end, |(low, _)| *low);
            let high = chunks
                .get(index + 1)
                .and_then(|next| next.first())
                .map_or(end, |(next_low, _)| *next_low);
            Group {
                low,
                high: high.max(low),
                count: chunk.iter().map(|(_, count)| count).sum(),
            }
        })
        .collect()
}

pub fn range_facet(
    links: &LinkBuilder,
    params: &RequestParams,
    meta: &FacetFieldMeta,
    kind: RangeKind,
    request: &RangeRequest,
    raw: &RangeFacet,
    target: usize,
) -> RangeFacetModel {
    let mut lows = Vec::with_capacity(raw.buckets.len());
    for bucket in &raw.buckets {
        match parse_point(kind, &bucket.value) {
            Ok(low) => lows.push((low, bucket.count)),
            Err(err) => debug!(field = %meta.field, value = %bucket.value, %err, "skipping range bucket"),
        }
    }
    lows.sort_by(|a, b| a.0.total_cmp(&b.0));

    let end = raw
        .end
        .as_deref()
        .and_then(|end| parse_point(kind, end).ok())
        .or_else(|| parse_point(kind, &request.end).ok())
        .or_else(|| lows.last().map(|(low, _)| *low))
        .unwrap_or_default();

    let delimiter = meta.parameter.hierarchy_delimiter().unwrap_or_default();
    let options = merge_buckets(&lows, end, target)
        .into_iter()
        .filter(|group| group.count > 0)
        .map(|group| {
            let low = render_point(kind, group.low);
            let high = render_point(kind, group.high);
            let mut path = meta.raw_prefix.clone();
            path.push(format!("{low}{RANGE_DELIMITER}{high}"));
            let value = meta.drilled_value(&path.join(delimiter));
            let next = match meta.source_value.as_deref() {
                Some(source) => params.replace_value(meta.parameter.name(), source, &value),
                None => params.with_value(meta.parameter.name(), &value),
            };
            RangeOption {
                label: format!(
                    "{} to {}",
                    display_point(kind, group.low),
                    display_point(kind, group.high)
                ),
                low,
                high,
                count: group.count,
                link: links.filter_link(&next),
            }
        })
        .collect();

    RangeFacetModel {
        field: meta.field.clone(),
        parameter: meta.parameter.name().to_string(),
        label: meta
            .parent_label
            .clone()
            .unwrap_or_else(|| meta.field.clone()),
        kind,
        options,
    }
}

/// Human form of a point: dates lose their time of day.
fn display_point(kind: RangeKind, value: f64) -> String {
    match kind {
        RangeKind::Numeric => render_number(value),
        RangeKind::Date => {
            let rendered = render_point(kind, value);
            match rendered.split_once('T') {
                Some((date, _)) => date.to_string(),
                None => rendered,
            }
        }
    }
}
