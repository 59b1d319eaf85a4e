use super::compile;
use super::compile_with;
use pretty_assertions::assert_eq;
use strata_protocol::FieldStats;
use strata_protocol::RangeKind;
use strata_protocol::RangeRequest;
use strata_query::FacetKind;
use strata_query::RangeBounds;
use strata_query::RangeState;
use strata_query::StatsTable;

const WEIGHT: &str = "weight___pred_numeric";

fn weight_stats(min: f64, max: f64, count: u64) -> StatsTable {
    let mut stats = StatsTable::new();
    stats.insert(WEIGHT, FieldStats::numeric(min, max, count));
    stats
}

#[test]
fn open_numeric_field_waits_for_a_prequery() {
    let compiled = compile("prop=weight");
    assert!(compiled.needs_prequery());
    assert_eq!(compiled.awaiting_fields(), vec![WEIGHT]);
    assert_eq!(compiled.fragment.filter_clauses, vec!["root___pred_id:weight"]);
    assert!(compiled.fragment.range_requests.is_empty());

    let prequery = compiled.prequery_request();
    assert_eq!(prequery.rows, 0);
    assert!(prequery.facet_fields.is_empty());
    assert!(prequery.stats_fields.contains(WEIGHT));
    assert_eq!(prequery.filter_clauses, compiled.fragment.filter_clauses);
}

#[test]
fn statistics_bind_the_range_facet() {
    let compiled = compile_with("prop=weight", &weight_stats(0.0, 100.0, 40));
    assert!(!compiled.needs_prequery());
    assert_eq!(
        compiled.range_states[WEIGHT],
        RangeState::Bound(RangeBounds {
            min: 0.0,
            max: 100.0,
            count: Some(40),
        })
    );
    assert_eq!(
        compiled.fragment.range_requests[WEIGHT],
        RangeRequest {
            kind: RangeKind::Numeric,
            start: "0".to_string(),
            end: "100".to_string(),
            gap: "10".to_string(),
            sort_by_index: true,
        }
    );
    assert!(compiled.fragment.stats_fields.contains(WEIGHT));
    assert_eq!(
        compiled.facet_meta[WEIGHT].kind,
        FacetKind::Range(RangeKind::Numeric)
    );
    assert_eq!(compiled.fragment.filter_clauses, vec!["root___pred_id:weight"]);
}

#[test]
fn sparse_fields_get_fewer_buckets() {
    let compiled = compile_with("prop=weight", &weight_stats(0.0, 100.0, 3));
    assert_eq!(compiled.fragment.range_requests[WEIGHT].gap, "25");
}

#[test]
fn half_open_literal_takes_the_missing_end_from_statistics() {
    let compiled = compile_with("prop=weight---10,", &weight_stats(0.0, 100.0, 40));
    assert_eq!(
        compiled.fragment.filter_clauses,
        vec!["root___pred_id:weight", "weight___pred_numeric:[10 TO 100]"]
    );
    assert_eq!(compiled.fragment.range_requests[WEIGHT].gap, "9");
}

#[test]
fn closed_literal_needs_no_statistics() {
    let compiled = compile("prop=weight---10,20");
    assert!(!compiled.needs_prequery());
    assert_eq!(
        compiled.fragment.filter_clauses,
        vec!["root___pred_id:weight", "weight___pred_numeric:[10 TO 20]"]
    );
    assert_eq!(compiled.fragment.range_requests[WEIGHT].gap, "1");
}

#[test]
fn alternative_ranges_on_one_field_facet_over_their_union() {
    let compiled = compile("prop=weight---10,20||30,40");
    assert_eq!(
        compiled.fragment.filter_clauses,
        vec![
            "(root___pred_id:weight AND weight___pred_numeric:[10 TO 20]) OR (root___pred_id:weight AND weight___pred_numeric:[30 TO 40])"
        ]
    );
    assert_eq!(
        compiled.fragment.range_requests[WEIGHT],
        RangeRequest {
            kind: RangeKind::Numeric,
            start: "10".to_string(),
            end: "40".to_string(),
            gap: "3".to_string(),
            sort_by_index: true,
        }
    );
}

#[test]
fn single_value_filters_without_a_range_facet() {
    let compiled = compile("prop=weight---15");
    assert_eq!(
        compiled.fragment.filter_clauses,
        vec!["root___pred_id:weight", "weight___pred_numeric:[15 TO 15]"]
    );
    assert!(compiled.fragment.range_requests.is_empty());
}

#[test]
fn empty_fields_keep_the_filter_and_skip_the_facet() {
    let mut stats = StatsTable::new();
    stats.insert(WEIGHT, FieldStats::default());
    let compiled = compile_with("prop=weight---10,", &stats);
    assert!(!compiled.needs_prequery());
    assert_eq!(
        compiled.fragment.filter_clauses,
        vec!["root___pred_id:weight", "weight___pred_numeric:[10 TO *]"]
    );
    assert!(compiled.fragment.range_requests.is_empty());
}

#[test]
fn date_ranges_render_timestamps_and_day_gaps() {
    let compiled = compile("prop=excavation-date---2001-01-01,2001-01-11");
    let field = "excavation_date___pred_date";
    assert_eq!(
        compiled.fragment.filter_clauses,
        vec![
            "root___pred_id:excavation\\-date".to_string(),
            format!("{field}:[2001-01-01T00:00:00Z TO 2001-01-11T00:00:00Z]"),
        ]
    );
    assert_eq!(compiled.fragment.range_requests[field].gap, "+1DAYS");
    assert_eq!(
        compiled.facet_meta[field].kind,
        FacetKind::Range(RangeKind::Date)
    );
}

#[test]
fn string_values_become_text_clauses_and_highlights() {
    let compiled = compile("prop=note---%22black+glaze%22+red");
    assert_eq!(
        compiled.fragment.filter_clauses,
        vec![
            "root___pred_id:note",
            "note___pred_string:\"black glaze\"",
            "note___pred_string:red",
        ]
    );
    assert_eq!(
        compiled.fragment.highlight_queries,
        vec!["\"black glaze\"", "red"]
    );
}

#[test]
fn unparsable_literals_reject_the_request() {
    let result = super::compiler().compile(
        &strata_query::RequestParams::parse("prop=weight---heavy"),
        &StatsTable::new(),
    );
    assert!(result.is_err());
}
