use super::compile;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use strata_hierarchy::ResolverConfig;
use strata_query::CompileError;
use strata_query::CompilerConfig;
use strata_query::FacetKind;
use strata_query::FieldFamily;
use strata_query::Param;
use strata_query::QueryCompiler;
use strata_query::RequestParams;
use strata_query::StatsTable;
use strata_test_support::UnavailableStore;
use strata_test_support::resolver_with;

#[test]
fn context_path_filters_each_level_and_facets_the_next() {
    let compiled = compile("path=turkey/domuztepe");
    assert_eq!(
        compiled.fragment.filter_clauses,
        vec![
            "root___context_id:turkey",
            "turkey___context_id:domuztepe"
        ]
    );
    assert!(compiled.fragment.facet_fields.contains("domuztepe___context_id"));
    assert!(!compiled.fragment.facet_fields.contains("root___context_id"));

    let meta = &compiled.facet_meta["domuztepe___context_id"];
    assert_eq!(meta.parameter, Param::Path);
    assert_eq!(meta.kind, FacetKind::Entity);
    assert_eq!(meta.family, Some(FieldFamily::Context));
    assert_eq!(meta.parent_label.as_deref(), Some("Domuztepe"));
    assert_eq!(meta.raw_prefix, vec!["turkey", "domuztepe"]);
    assert_eq!(meta.source_value.as_deref(), Some("turkey/domuztepe"));
}

#[test]
fn fields_are_named_after_the_previous_slug() {
    let compiled = compile("prop=material---shell");
    assert_eq!(
        compiled.fragment.filter_clauses,
        vec!["root___pred_id:m1", "m1___pred_id:shell"]
    );
    assert!(compiled.fragment.facet_fields.contains("shell___pred_id"));
}

#[test]
fn project_paths_use_the_project_family() {
    let compiled = compile("proj=oc-project");
    assert_eq!(
        compiled.fragment.filter_clauses,
        vec!["root___project_id:oc\\-project"]
    );
    assert!(compiled.fragment.facet_fields.contains("oc_project___project_id"));
}

#[test]
fn predicates_with_children_stay_navigable() {
    let compiled = compile("prop=measurements---length---10,20");
    assert_eq!(
        compiled.fragment.filter_clauses,
        vec![
            "root___pred_id:measurements",
            "measurements___pred_id:length",
            "length___pred_numeric:[10 TO 20]",
        ]
    );
}

#[test]
fn related_links_prefix_deeper_fields() {
    let linked = compile("prop=links---shell");
    assert_eq!(
        linked.fragment.filter_clauses,
        vec!["root___pred_id:links", "rel--links___pred_id:shell"]
    );
    assert!(linked.fragment.facet_fields.contains("rel--shell___pred_id"));

    let marked = compile("prop=rel--material---shell");
    assert_eq!(
        marked.fragment.filter_clauses,
        vec!["root___pred_id:m1", "rel--m1___pred_id:shell"]
    );
    assert!(marked.unresolved.is_empty());
}

#[test]
fn missing_hierarchy_parameters_get_root_facets() {
    let compiled = compile("q=pottery");
    for field in [
        "root___context_id",
        "root___pred_id",
        "root___project_id",
        "item_type",
        "form_use_life_chrono_tile",
        "discovery_geotile",
    ] {
        assert!(compiled.fragment.facet_fields.contains(field), "{field}");
        assert!(compiled.facet_meta.contains_key(field), "{field}");
    }
    assert_eq!(compiled.facet_meta["item_type"].kind, FacetKind::ItemType);
}

#[test]
fn store_failures_fail_the_request() {
    let resolver = resolver_with(Arc::new(UnavailableStore), ResolverConfig::default());
    let compiler = QueryCompiler::new(Arc::new(resolver), CompilerConfig::default());
    let result = compiler.compile(&RequestParams::parse("path=turkey"), &StatsTable::new());
    assert!(matches!(result, Err(CompileError::Store(_))));
}

#[test]
fn literal_values_must_end_the_path() {
    let result = super::compiler().compile(
        &RequestParams::parse("prop=weight---10---20"),
        &StatsTable::new(),
    );
    assert!(matches!(result, Err(CompileError::Parse(_))));
}
