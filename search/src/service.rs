use crate::config::StrataConfig;
use crate::error::Result;
use std::sync::Arc;
use std::time::Instant;
use strata_engine::SearchEngine;
use strata_facets::FacetAssembler;
use strata_facets::ResponseModel;
use strata_hierarchy::EntityStore;
use strata_hierarchy::HierarchyResolver;
use strata_protocol::EngineRequest;
use strata_query::CompiledQuery;
use strata_query::QueryCompiler;
use strata_query::RequestParams;
use strata_query::StatsTable;
use strata_utils_cache::LruSharedCache;
use strata_utils_cache::SharedCache;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// Runs a request end to end: compile, prequery when range bounds are
/// missing, query, assemble.
pub struct SearchService {
    store: Arc<dyn EntityStore>,
    cache: Arc<dyn SharedCache>,
    engine: Arc<dyn SearchEngine>,
    config: StrataConfig,
}

/// What a request compiled to, before the index is asked.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// Range bounds are missing; this statistics request comes first
    Prequery(EngineRequest),
    Query(EngineRequest),
}

impl SearchService {
    pub fn new(
        store: Arc<dyn EntityStore>,
        engine: Arc<dyn SearchEngine>,
        config: StrataConfig,
    ) -> Self {
        let cache = Arc::new(LruSharedCache::new(config.resolver.cache_capacity));
        Self::with_cache(store, cache, engine, config)
    }

    pub fn with_cache(
        store: Arc<dyn EntityStore>,
        cache: Arc<dyn SharedCache>,
        engine: Arc<dyn SearchEngine>,
        config: StrataConfig,
    ) -> Self {
        Self {
            store,
            cache,
            engine,
            config,
        }
    }

    pub fn config(&self) -> &StrataConfig {
        &self.config
    }

    /// Resolver memoizing entities for one request; the shared cache
    /// outlives it.
    fn resolver(&self) -> Arc<HierarchyResolver> {
        Arc::new(HierarchyResolver::new(
            Arc::clone(&self.store),
            Arc::clone(&self.cache),
            self.config.resolver.clone(),
        ))
    }

    fn compiler(&self, resolver: &Arc<HierarchyResolver>) -> QueryCompiler {
        QueryCompiler::new(Arc::clone(resolver), self.config.compiler.clone())
    }

    /// Compile against known statistics without touching the index.
    pub fn plan(&self, params: &RequestParams, stats: &StatsTable) -> Result<Plan> {
        let resolver = self.resolver();
        let compiled = self.compiler(&resolver).compile(params, stats)?;
        Ok(if compiled.needs_prequery() {
            Plan::Prequery(compiled.prequery_request())
        } else {
            Plan::Query(compiled.to_engine_request())
        })
    }

    pub fn search(&self, params: &RequestParams) -> Result<ResponseModel> {
        let started = Instant::now();
        let resolver = self.resolver();
        let compiled = self.compile(&resolver, params)?;

        let response = self
            .engine
            .execute(&compiled.to_engine_request())
            .inspect_err(|err| warn!(error = %err, "search index query failed"))?;

        let assembler = FacetAssembler::new(
            Arc::clone(&resolver),
            self.config.facets.clone(),
            self.config.compiler.clone(),
        );
        let model = assembler.assemble(params, &compiled, &response)?;
        info!(
            total = model.total,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search complete"
        );
        Ok(model)
    }

    /// Compile, running the statistics prequery first when needed.
    fn compile(
        &self,
        resolver: &Arc<HierarchyResolver>,
        params: &RequestParams,
    ) -> Result<CompiledQuery> {
        let compiler = self.compiler(resolver);
        let compiled = compiler.compile(params, &StatsTable::new())?;
        if !compiled.needs_prequery() {
            return Ok(compiled);
        }

        info!(fields = ?compiled.awaiting_fields(), "running statistics prequery");
        let stats_response = self
            .engine
            .execute(&compiled.prequery_request())
            .inspect_err(|err| warn!(error = %err, "statistics prequery failed"))?;
        let stats = StatsTable::from_response(&stats_response);
        debug!(fields = stats.len(), "statistics received");
        Ok(compiler.compile(params, &stats)?)
    }
}
