use super::compile;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use strata_query::CompileError;
use strata_query::CompilerConfig;
use strata_query::MATCH_NOTHING;
use strata_query::ParseError;
use strata_query::QueryCompiler;
use strata_query::RequestParams;
use strata_query::StatsTable;
use strata_test_support::fixture_resolver;
use tracing_test::traced_test;

#[test]
fn alternatives_are_or_combined() {
    let compiled = compile("prop=material---shell||stone");
    assert_eq!(
        compiled.fragment.filter_clauses,
        vec![
            "(root___pred_id:m1 AND m1___pred_id:shell) OR (root___pred_id:m1 AND m1___pred_id:stone)"
        ]
    );
    assert!(compiled.fragment.facet_fields.contains("shell___pred_id"));
    assert!(compiled.fragment.facet_fields.contains("stone___pred_id"));
}

#[test]
fn facet_metadata_remembers_sibling_alternatives() {
    let compiled = compile("prop=material---shell||stone");
    let shell = &compiled.facet_meta["shell___pred_id"];
    assert_eq!(shell.alternatives_before, "");
    assert_eq!(shell.alternatives_after, "||material---stone");
    assert_eq!(
        shell.drilled_value("material---shell---fine"),
        "material---shell---fine||material---stone"
    );
    let stone = &compiled.facet_meta["stone___pred_id"];
    assert_eq!(stone.alternatives_before, "material---shell||");
    assert_eq!(stone.alternatives_after, "");
}

#[test]
#[traced_test]
fn unresolved_alternatives_are_dropped() {
    let compiled = compile("prop=material---shell||bone");
    assert_eq!(
        compiled.fragment.filter_clauses,
        vec!["root___pred_id:m1", "m1___pred_id:shell"]
    );
    assert_eq!(compiled.unresolved, vec!["bone"]);
    assert!(logs_contain("dropping alternative with unresolved identifier"));
}

#[test]
fn a_parameter_with_no_resolved_alternative_matches_nothing() {
    let compiled = compile("path=turkey&prop=material---bone");
    assert_eq!(
        compiled.fragment.filter_clauses,
        vec!["root___context_id:turkey", MATCH_NOTHING]
    );
    assert_eq!(compiled.unresolved, vec!["bone"]);
}

#[test]
fn repeated_values_of_a_parameter_are_alternatives() {
    let compiled = compile("path=turkey&path=italy");
    assert_eq!(
        compiled.fragment.filter_clauses,
        vec!["(root___context_id:turkey) OR (root___context_id:italy)"]
    );
}

#[test]
fn distinct_parameters_are_and_combined() {
    let compiled = compile("path=italy&type=subjects");
    assert_eq!(
        compiled.fragment.filter_clauses,
        vec!["root___context_id:italy", "item_type:subjects"]
    );
}

#[test]
fn expansion_cap_counts_every_value() {
    let config = CompilerConfig {
        max_alternatives: 4,
        ..CompilerConfig::default()
    };
    let compiler = QueryCompiler::new(Arc::new(fixture_resolver()), config);

    let single = compiler.compile(
        &RequestParams::parse("prop=material||weight||note---shell||stone"),
        &StatsTable::new(),
    );
    assert!(matches!(
        single,
        Err(CompileError::Parse(ParseError::TooManyAlternatives { count: 6, limit: 4 }))
    ));

    let split = compiler.compile(
        &RequestParams::parse("path=turkey||italy||domuztepe&path=area-a||area-b"),
        &StatsTable::new(),
    );
    assert!(matches!(
        split,
        Err(CompileError::Parse(ParseError::TooManyAlternatives { count: 5, limit: 4 }))
    ));
}

#[test]
fn empty_segments_are_malformed() {
    let result = super::compiler().compile(
        &RequestParams::parse("path=turkey//domuztepe"),
        &StatsTable::new(),
    );
    assert!(matches!(
        result,
        Err(CompileError::Parse(ParseError::Malformed { .. }))
    ));
}
