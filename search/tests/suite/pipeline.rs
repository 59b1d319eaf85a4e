use super::ScriptedEngine;
use super::service;
use pretty_assertions::assert_eq;
use strata_engine::EngineError;
use strata_protocol::EngineResponse;
use strata_protocol::FacetCount;
use strata_protocol::FieldStats;
use strata_protocol::RangeFacet;
use strata_query::RequestParams;
use strata_query::StatsTable;
use strata_search::Plan;
use strata_search::SearchError;
use tracing_test::traced_test;

const WEIGHT: &str = "weight___pred_numeric";

fn reply(num_found: u64) -> EngineResponse {
    EngineResponse {
        num_found,
        ..EngineResponse::default()
    }
}

#[test]
fn bounded_requests_query_the_index_once() {
    let engine = ScriptedEngine::replying(vec![Ok(reply(12))]);
    let model = service(engine.clone())
        .search(&RequestParams::parse("path=italy"))
        .expect("search");
    assert_eq!(model.total, 12);
    assert_eq!(model.active_filters.len(), 1);

    let requests = engine.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].filter_clauses, vec!["root___context_id:italy"]);
    assert_eq!(requests[0].rows, 20);
}

#[test]
#[traced_test]
fn open_ranges_run_a_statistics_prequery_first() {
    let mut stats = reply(40);
    stats
        .stats
        .insert(WEIGHT.to_string(), FieldStats::numeric(0.0, 100.0, 40));
    let mut main = reply(40);
    main.facet_ranges.insert(
        WEIGHT.to_string(),
        RangeFacet {
            buckets: vec![FacetCount::new("0.0", 30), FacetCount::new("50.0", 10)],
            gap: Some("50".to_string()),
            start: Some("0".to_string()),
            end: Some("100".to_string()),
        },
    );
    let engine = ScriptedEngine::replying(vec![Ok(stats), Ok(main)]);
    let model = service(engine.clone())
        .search(&RequestParams::parse("prop=weight"))
        .expect("search");

    let requests = engine.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].rows, 0);
    assert!(requests[0].stats_fields.contains(WEIGHT));
    assert!(requests[0].facet_fields.is_empty());
    assert_eq!(requests[1].range_requests[WEIGHT].end, "100");

    assert_eq!(model.range_facets.len(), 1);
    assert_eq!(model.range_facets[0].options[0].label, "0 to 50");
    assert!(logs_contain("running statistics prequery"));
}

#[test]
fn index_failures_fail_the_whole_request() {
    let engine = ScriptedEngine::replying(vec![Err(EngineError::Timeout { timeout_ms: 10 })]);
    let err = service(engine)
        .search(&RequestParams::parse("path=italy"))
        .expect_err("engine failure");
    assert!(matches!(err, SearchError::Engine(EngineError::Timeout { .. })));
    assert!(!err.is_client_error());
}

#[test]
fn failed_prequery_stops_before_the_main_query() {
    let engine = ScriptedEngine::replying(vec![Err(EngineError::Status {
        status: 503,
        body: "busy".to_string(),
    })]);
    let err = service(engine.clone())
        .search(&RequestParams::parse("prop=weight"))
        .expect_err("prequery failure");
    assert!(matches!(err, SearchError::Engine(_)));
    assert_eq!(engine.requests().len(), 1);
}

#[test]
fn malformed_requests_never_reach_the_index() {
    let engine = ScriptedEngine::replying(Vec::new());
    let err = service(engine.clone())
        .search(&RequestParams::parse("rows=many"))
        .expect_err("parse failure");
    assert!(err.is_client_error());
    assert!(engine.requests().is_empty());
}

#[test]
fn plan_reports_the_prequery() {
    let engine = ScriptedEngine::replying(Vec::new());
    let plan = service(engine)
        .plan(&RequestParams::parse("prop=weight"), &StatsTable::new())
        .expect("plan");
    match plan {
        Plan::Prequery(request) => assert_eq!(request.rows, 0),
        Plan::Query(_) => panic!("expected a prequery"),
    }
}

#[test]
fn open_filter_survives_a_prequery_without_stats() {
    let engine = ScriptedEngine::replying(vec![Ok(reply(0)), Ok(reply(0))]);
    service(engine.clone())
        .search(&RequestParams::parse("prop=weight---10,"))
        .expect("search");

    let requests = engine.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[1].filter_clauses,
        vec!["root___pred_id:weight", "weight___pred_numeric:[10 TO *]"]
    );
    assert!(requests[1].range_requests.is_empty());
}

#[test]
fn huge_offsets_page_without_overflow() {
    let engine = ScriptedEngine::replying(vec![Ok(reply(12))]);
    let model = service(engine)
        .search(&RequestParams::parse(&format!("path=italy&start={}", usize::MAX)))
        .expect("search");
    assert_eq!(model.start, usize::MAX);
    assert_eq!(model.paging.next, None);
    assert_eq!(model.paging.last, None);
    assert!(model.paging.previous.is_some());
}
