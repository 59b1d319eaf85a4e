//! The sort descriptor: what the results are sorted by and how else
//! they could be.

use crate::links::LinkBuilder;
use crate::model::SortDescriptor;
use crate::model::SortOption;
use strata_protocol::SortOrder;
use strata_query::Param;
use strata_query::RequestParams;
use strata_query::SortKey;
use strata_query::SortTerm;
use strata_query::sort::render_sort;

pub fn sort_descriptor(
    links: &LinkBuilder,
    params: &RequestParams,
    active: &[SortTerm],
) -> SortDescriptor {
    let active_options = active
        .iter()
        .map(|term| SortOption {
            key: term.key.name().to_string(),
            label: term.key.label().to_string(),
            order: term.order,
            link: None,
        })
        .collect();

    let mut options = Vec::new();
    for key in SortKey::ALL {
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let term = SortTerm::new(key, order);
            if active.contains(&term) {
                continue;
            }
            let sort = params.with_single(Param::Sort.name(), &render_sort(&[term]));
            options.push(SortOption {
                key: key.name().to_string(),
                label: key.label().to_string(),
                order,
                link: Some(links.filter_link(&sort)),
            });
        }
    }

    SortDescriptor {
        active: active_options,
        options,
    }
}
