//! First/previous/next/last links.

use crate::links::LinkBuilder;
use crate::model::Paging;
use strata_query::Param;
use strata_query::RequestParams;

/// Paging links for `total` records shown `rows` at a time from `start`.
///
/// A link is absent when it would point at the current page or past the
/// results.
pub fn paging(
    links: &LinkBuilder,
    params: &RequestParams,
    total: u64,
    start: usize,
    rows: usize,
) -> Paging {
    let total = usize::try_from(total).unwrap_or(usize::MAX);
    if rows == 0 || total == 0 {
        return Paging {
            first: None,
            previous: None,
            next: None,
            last: None,
        };
    }
    let last_start = (total - 1) / rows * rows;
    let at = |offset: usize| links.link(&params.with_single(Param::Start.name(), &offset.to_string()));

    Paging {
        first: (start > 0).then(|| at(0)),
        previous: (start > 0).then(|| at(start.saturating_sub(rows))),
        next: (start.saturating_add(rows) < total).then(|| at(start.saturating_add(rows))),
        last: (start < last_start).then(|| at(last_start)),
    }
}
