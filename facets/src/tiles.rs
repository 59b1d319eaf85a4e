//! Tile facets aggregated to a requested depth.

use crate::links::LinkBuilder;
use crate::model::ChronoOption;
use crate::model::GeoOption;
use crate::model::TileFacet;
use strata_protocol::FacetCount;
use strata_query::Param;
use strata_query::RequestParams;
use strata_query::schema;
use strata_tiles::aggregate;
use strata_tiles::chrono;
use strata_tiles::geo;
use tracing::warn;

/// Aggregation depth: at least one digit below the deepest active tile
/// filter, so drilling in always shows finer tiles.
pub fn effective_depth(requested: usize, active: &[String], max: usize) -> usize {
    let deepest = active
        .iter()
        .map(|value| aggregate::depth(value.trim()))
        .max()
        .unwrap_or(0);
    requested.max(deepest + 1).min(max)
}

pub fn chrono_facet(
    links: &LinkBuilder,
    params: &RequestParams,
    counts: &[FacetCount],
    depth: usize,
) -> TileFacet<ChronoOption> {
    let buckets = aggregate::aggregate(
        counts.iter().map(|count| (count.value.as_str(), count.count)),
        depth,
    );
    let mut options: Vec<ChronoOption> = buckets
        .into_iter()
        .filter_map(|(key, count)| match chrono::decode(&key) {
            Ok(bounds) => Some(ChronoOption {
                link: tile_link(links, params, Param::FormChronotile, &key),
                earliest_year: bounds.earliest_year(),
                latest_year: bounds.latest_year(),
                key,
                count,
            }),
            Err(err) => {
                warn!(%key, error = %err, "skipping undecodable chronology tile");
                None
            }
        })
        .collect();
    options.sort_by(|a, b| {
        a.earliest_year
            .cmp(&b.earliest_year)
            .then(b.latest_year.cmp(&a.latest_year))
            .then_with(|| a.key.cmp(&b.key))
    });
    TileFacet {
        field: schema::CHRONO_TILE.to_string(),
        parameter: Param::FormChronotile.name().to_string(),
        depth,
        options,
    }
}

pub fn geo_facet(
    links: &LinkBuilder,
    params: &RequestParams,
    counts: &[FacetCount],
    depth: usize,
) -> TileFacet<GeoOption> {
    let buckets = aggregate::aggregate(
        counts.iter().map(|count| (count.value.as_str(), count.count)),
        depth,
    );
    let options = buckets
        .into_iter()
        .filter_map(|(key, count)| match geo::decode(&key) {
            Ok(bbox) => Some(GeoOption {
                link: tile_link(links, params, Param::DiscGeotile, &key),
                key,
                count,
                bbox,
            }),
            Err(err) => {
                warn!(%key, error = %err, "skipping undecodable geo tile");
                None
            }
        })
        .collect();
    TileFacet {
        field: schema::GEO_TILE.to_string(),
        parameter: Param::DiscGeotile.name().to_string(),
        depth,
        options,
    }
}

fn tile_link(links: &LinkBuilder, params: &RequestParams, param: Param, key: &str) -> String {
    links.filter_link(&params.with_single(param.name(), key))
}
