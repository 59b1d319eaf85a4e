use super::Harness;
use super::response;
use pretty_assertions::assert_eq;
use strata_protocol::FacetCount;
use strata_protocol::FieldStats;
use strata_protocol::RangeFacet;
use strata_query::StatsTable;
use strata_tiles::chrono;

const WEIGHT: &str = "weight___pred_numeric";

fn weight_reply() -> strata_protocol::EngineResponse {
    let mut reply = response(40, &[]);
    reply.facet_ranges.insert(
        WEIGHT.to_string(),
        RangeFacet {
            buckets: (0..10)
                .map(|step| FacetCount::new(format!("{}.0", step * 10), 4))
                .collect(),
            gap: Some("10".to_string()),
            start: Some("0".to_string()),
            end: Some("100".to_string()),
        },
    );
    reply
}

fn weight_stats(count: u64) -> StatsTable {
    let mut stats = StatsTable::new();
    stats.insert(WEIGHT, FieldStats::numeric(0.0, 100.0, count));
    stats
}

#[test]
fn range_buckets_become_labelled_links() {
    let model = Harness::new().assemble_with("prop=weight", &weight_stats(40), &weight_reply());
    let facet = &model.range_facets[0];
    assert_eq!(facet.field, WEIGHT);
    assert_eq!(facet.label, "Weight");
    assert_eq!(facet.options.len(), 10);
    assert_eq!(facet.options[0].label, "0 to 10");
    assert_eq!(facet.options[0].link, "/query/?prop=weight---0%2C10");
    assert_eq!(facet.options[9].label, "90 to 100");
}

#[test]
fn sparse_ranges_merge_into_fewer_groups() {
    let model = Harness::new().assemble_with("prop=weight", &weight_stats(3), &weight_reply());
    let facet = &model.range_facets[0];
    let labels: Vec<&str> = facet.options.iter().map(|option| option.label.as_str()).collect();
    assert_eq!(labels, vec!["0 to 30", "30 to 60", "60 to 90", "90 to 100"]);
    assert_eq!(facet.options[0].count, 12);
}

#[test]
fn chronology_tiles_aggregate_to_the_configured_depth() {
    let old = chrono::encode(9_000, 8_000, "").expect("old");
    let young = chrono::encode(2_000, 1_000, "").expect("young");
    let reply = response(
        3,
        &[(
            "form_use_life_chrono_tile",
            &[(young.as_str(), 1), (old.as_str(), 2)],
        )],
    );
    let model = Harness::new().assemble("chronodeep=4", &reply);
    let tiles = model.chrono_tiles.expect("chrono tiles");
    assert_eq!(tiles.depth, 4);
    assert!(tiles.options.iter().all(|option| option.key.len() == 4));
    assert!(tiles.options.windows(2).all(|pair| pair[0].earliest_year <= pair[1].earliest_year));
    assert_eq!(tiles.options.iter().map(|option| option.count).sum::<u64>(), 3);
}

#[test]
fn geo_tiles_drill_below_the_active_tile() {
    let reply = response(
        5,
        &[(
            "discovery_geotile",
            &[("0123012301", 2), ("0123020000", 3)],
        )],
    );
    let model = Harness::new().assemble("disc-geotile=0123&geodeep=2", &reply);
    let tiles = model.geo_tiles.expect("geo tiles");
    assert_eq!(tiles.depth, 5);
    let keys: Vec<&str> = tiles.options.iter().map(|option| option.key.as_str()).collect();
    assert_eq!(keys, vec!["01230"]);
    assert_eq!(tiles.options[0].count, 5);
    assert_eq!(tiles.options[0].link, "/query/?disc-geotile=01230&geodeep=2");
}
