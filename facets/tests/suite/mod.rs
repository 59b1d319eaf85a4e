use std::collections::BTreeMap;
use std::sync::Arc;
use strata_facets::FacetAssembler;
use strata_facets::FacetsConfig;
use strata_facets::ResponseModel;
use strata_hierarchy::HierarchyResolver;
use strata_protocol::EngineResponse;
use strata_protocol::FacetCount;
use strata_query::CompilerConfig;
use strata_query::QueryCompiler;
use strata_query::RequestParams;
use strata_query::StatsTable;
use strata_test_support::fixture_resolver;

mod navigation;
mod ranges_and_tiles;

pub(crate) struct Harness {
    resolver: Arc<HierarchyResolver>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self {
            resolver: Arc::new(fixture_resolver()),
        }
    }

    pub(crate) fn assemble(&self, query: &str, response: &EngineResponse) -> ResponseModel {
        self.assemble_with(query, &StatsTable::new(), response)
    }

    pub(crate) fn assemble_with(
        &self,
        query: &str,
        stats: &StatsTable,
        response: &EngineResponse,
    ) -> ResponseModel {
        let params = RequestParams::parse(query);
        let compiler = QueryCompiler::new(Arc::clone(&self.resolver), CompilerConfig::default());
        let compiled = compiler.compile(&params, stats).expect("compile");
        FacetAssembler::new(
            Arc::clone(&self.resolver),
            FacetsConfig::default(),
            CompilerConfig::default(),
        )
        .assemble(&params, &compiled, response)
        .expect("assemble")
    }
}

pub(crate) fn response(num_found: u64, facets: &[(&str, &[(&str, u64)])]) -> EngineResponse {
    let facet_fields: BTreeMap<String, Vec<FacetCount>> = facets
        .iter()
        .map(|(field, counts)| {
            (
                field.to_string(),
                counts
                    .iter()
                    .map(|(value, count)| FacetCount::new(*value, *count))
                    .collect(),
            )
        })
        .collect();
    EngineResponse {
        num_found,
        facet_fields,
        ..EngineResponse::default()
    }
}
