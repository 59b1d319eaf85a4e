use std::sync::Arc;
use strata_query::CompiledQuery;
use strata_query::CompilerConfig;
use strata_query::QueryCompiler;
use strata_query::RequestParams;
use strata_query::StatsTable;
use strata_test_support::fixture_resolver;

mod expansion;
mod hierarchy_paths;
mod ranges;

pub(crate) fn compiler() -> QueryCompiler {
    QueryCompiler::new(Arc::new(fixture_resolver()), CompilerConfig::default())
}

pub(crate) fn compile(query: &str) -> CompiledQuery {
    compile_with(query, &StatsTable::new())
}

pub(crate) fn compile_with(query: &str, stats: &StatsTable) -> CompiledQuery {
    compiler()
        .compile(&RequestParams::parse(query), stats)
        .expect("compile")
}
