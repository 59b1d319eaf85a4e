//! Compilation of request parameters into an index query.
//!
//! Hierarchical parameters are expanded into identifier paths and every
//! path is resolved step by step. The index field for a step is named
//! after the entity resolved one step earlier, so `prop=material---shell`
//! compiles to `root___pred_id:m1 AND m1___pred_id:shell` when `material`
//! has the slug `m1`.

use crate::config::CompilerConfig;
use crate::dsl::expand_with_limit;
use crate::error::CompileError;
use crate::error::ParseError;
use crate::error::Result;
use crate::escape::escape_term;
use crate::escape::quote_phrase;
use crate::escape::tokenize;
use crate::field::FieldFamily;
use crate::field::FieldPath;
use crate::fragment::MATCH_NOTHING;
use crate::fragment::QueryFragment;
use crate::literal::LiteralRange;
use crate::literal::render_gap;
use crate::literal::render_point;
use crate::params::Param;
use crate::params::RequestParams;
use crate::schema;
use crate::sort::SortTerm;
use crate::sort::default_sort;
use crate::sort::parse_sort;
use crate::stats::RangeBounds;
use crate::stats::RangeState;
use crate::stats::StatsTable;
use std::collections::BTreeMap;
use std::slice;
use std::sync::Arc;
use strata_hierarchy::DataKind;
use strata_hierarchy::HierarchyResolver;
use strata_hierarchy::ItemType;
use strata_hierarchy::ResolveError;
use strata_protocol::EngineRequest;
use strata_protocol::MATCH_ALL;
use strata_protocol::RangeKind;
use strata_protocol::RangeRequest;
use strata_tiles::chrono;
use strata_tiles::geo;
use tracing::debug;
use tracing::warn;

/// How the values of a faceted field are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    /// Composite `slug___kind___uri___label` entity values
    Entity,
    /// Buckets of a numeric or date range
    Range(RangeKind),
    ItemType,
    ChronoTile,
    GeoTile,
}

/// What the assembler needs to turn a facet field into drill-down links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetFieldMeta {
    pub field: String,
    pub parameter: Param,
    pub kind: FacetKind,
    pub family: Option<FieldFamily>,
    /// Label of the entity whose children the facet lists
    pub parent_label: Option<String>,
    /// Raw identifiers leading to the facet
    pub raw_prefix: Vec<String>,
    /// Raw parameter value the facet drills down from
    pub source_value: Option<String>,
    /// Other alternatives of `source_value` preceding this facet's path,
    /// each followed by the OR delimiter
    pub alternatives_before: String,
    /// Other alternatives of `source_value` following this facet's path,
    /// each preceded by the OR delimiter
    pub alternatives_after: String,
}

impl FacetFieldMeta {
    fn fixed(field: &str, parameter: Param, kind: FacetKind) -> Self {
        Self {
            field: field.to_string(),
            parameter,
            kind,
            family: parameter.family(),
            parent_label: None,
            raw_prefix: Vec::new(),
            source_value: None,
            alternatives_before: String::new(),
            alternatives_after: String::new(),
        }
    }

    /// Parameter value that swaps this facet's alternative for `drilled`
    /// and keeps the others.
    pub fn drilled_value(&self, drilled: &str) -> String {
        format!("{}{drilled}{}", self.alternatives_before, self.alternatives_after)
    }
}

/// A filter value the compiler dropped instead of failing the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFilter {
    pub parameter: String,
    pub value: String,
    pub reason: String,
}

/// Result of compiling one request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub query: String,
    pub fragment: QueryFragment,
    pub facet_meta: BTreeMap<String, FacetFieldMeta>,
    pub range_states: BTreeMap<String, RangeState>,
    pub rejected_filters: Vec<RejectedFilter>,
    /// Identifiers that matched no entity
    pub unresolved: Vec<String>,
    pub sort: Vec<SortTerm>,
    pub rows: usize,
    pub start: usize,
    pub return_fields: Vec<String>,
    pub chrono_depth: Option<usize>,
    pub geo_depth: Option<usize>,
}

impl CompiledQuery {
    fn new(rows: usize) -> Self {
        Self {
            query: MATCH_ALL.to_string(),
            fragment: QueryFragment::new(),
            facet_meta: BTreeMap::new(),
            range_states: BTreeMap::new(),
            rejected_filters: Vec::new(),
            unresolved: Vec::new(),
            sort: default_sort(),
            rows,
            start: 0,
            return_fields: schema::DEFAULT_RETURN_FIELDS
                .iter()
                .map(|field| (*field).to_string())
                .collect(),
            chrono_depth: None,
            geo_depth: None,
        }
    }

    /// Some range field is still waiting for index statistics.
    pub fn needs_prequery(&self) -> bool {
        self.range_states.values().any(RangeState::is_awaiting)
    }

    pub fn awaiting_fields(&self) -> Vec<&str> {
        self.range_states
            .iter()
            .filter(|(_, state)| state.is_awaiting())
            .map(|(field, _)| field.as_str())
            .collect()
    }

    pub fn to_engine_request(&self) -> EngineRequest {
        EngineRequest {
            query: self.query.clone(),
            filter_clauses: self.fragment.filter_clauses.clone(),
            facet_fields: self.fragment.facet_fields.clone(),
            stats_fields: self.fragment.stats_fields.clone(),
            range_requests: self.fragment.range_requests.clone(),
            highlight_queries: self.fragment.highlight_queries.clone(),
            return_fields: self.return_fields.clone(),
            sort: self.sort.iter().map(SortTerm::spec).collect(),
            rows: self.rows,
            start: self.start,
            ..EngineRequest::default()
        }
    }

    /// Statistics-only request for the fields awaiting bounds.
    pub fn prequery_request(&self) -> EngineRequest {
        EngineRequest {
            query: self.query.clone(),
            filter_clauses: self.fragment.filter_clauses.clone(),
            stats_fields: self.fragment.prequery_stats.clone(),
            rows: 0,
            ..EngineRequest::default()
        }
    }

    fn register_facet(&mut self, meta: FacetFieldMeta) {
        self.facet_meta.entry(meta.field.clone()).or_insert(meta);
    }
}

enum PathOutcome {
    Compiled(QueryFragment),
    Unresolved(String),
}

/// Where a path is being compiled from.
struct PathSource<'a> {
    param: Param,
    family: FieldFamily,
    raw_value: &'a str,
    alternatives_before: String,
    alternatives_after: String,
}

pub struct QueryCompiler {
    resolver: Arc<HierarchyResolver>,
    config: CompilerConfig,
}

impl QueryCompiler {
    pub fn new(resolver: Arc<HierarchyResolver>, config: CompilerConfig) -> Self {
        Self { resolver, config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn resolver(&self) -> &HierarchyResolver {
        &self.resolver
    }

    /// Compile a whole request. Distinct parameters are AND-combined.
    pub fn compile(&self, params: &RequestParams, stats: &StatsTable) -> Result<CompiledQuery> {
        let mut compiled = CompiledQuery::new(self.config.default_rows);
        for (name, values) in params.iter() {
            let Some(param) = Param::from_name(name) else {
                debug!(parameter = name, "ignoring unknown parameter");
                continue;
            };
            match param {
                Param::Path | Param::Prop | Param::Proj => {
                    self.compile_hierarchy(param, values, stats, &mut compiled)?;
                }
                Param::Type => self.compile_types(values, &mut compiled)?,
                Param::Q => compile_text(values, &mut compiled),
                Param::Id => self.compile_ids(values, &mut compiled)?,
                Param::FormChronotile | Param::DiscGeotile => {
                    self.compile_tiles(param, values, &mut compiled)?;
                }
                Param::FormStart | Param::FormStop => {
                    self.compile_years(param, values, &mut compiled)?;
                }
                Param::Sort => {
                    if let Some(raw) = values.last() {
                        compiled.sort = parse_sort(raw)?;
                    }
                }
                Param::Attributes => self.compile_attributes(values, &mut compiled)?,
                Param::Rows => {
                    if let Some(raw) = values.last() {
                        compiled.rows = self.parse_rows(raw)?;
                    }
                }
                Param::Start => {
                    if let Some(raw) = values.last() {
                        compiled.start = parse_count(param, raw)?;
                    }
                }
                Param::Chronodeep => {
                    if let Some(raw) = values.last() {
                        compiled.chrono_depth = Some(parse_count(param, raw)?.min(chrono::MAX_DEPTH));
                    }
                }
                Param::Geodeep => {
                    if let Some(raw) = values.last() {
                        compiled.geo_depth = Some(parse_count(param, raw)?.min(geo::MAX_ZOOM));
                    }
                }
            }
        }
        add_default_facets(params, &mut compiled);
        Ok(compiled)
    }

    /// Compile the expanded paths of one hierarchical parameter.
    ///
    /// Alternatives are OR-combined. An alternative with an unresolved
    /// identifier is dropped; if every alternative is dropped the
    /// parameter matches nothing.
    pub fn compile_parameter(
        &self,
        param: Param,
        raw_values: &[String],
        stats: &StatsTable,
    ) -> Result<CompiledQuery> {
        let mut compiled = CompiledQuery::new(self.config.default_rows);
        self.compile_hierarchy(param, raw_values, stats, &mut compiled)?;
        Ok(compiled)
    }

    fn compile_hierarchy(
        &self,
        param: Param,
        raw_values: &[String],
        stats: &StatsTable,
        compiled: &mut CompiledQuery,
    ) -> Result<()> {
        let (Some(family), Some(delimiter)) = (param.family(), param.hierarchy_delimiter()) else {
            return Ok(());
        };
        let mut alternatives = Vec::new();
        let mut missing = Vec::new();
        let mut expanded = 0;
        for raw_value in raw_values {
            let paths = expand_with_limit(
                param.name(),
                slice::from_ref(raw_value),
                Some(delimiter),
                &self.config.or_delimiter,
                self.config.max_alternatives,
            )?;
            expanded += paths.len();
            if expanded > self.config.max_alternatives {
                return Err(ParseError::TooManyAlternatives {
                    count: expanded,
                    limit: self.config.max_alternatives,
                }
                .into());
            }
            let or = self.config.or_delimiter.as_str();
            let rendered: Vec<String> = paths.iter().map(|path| path.join(delimiter)).collect();
            for (index, path) in paths.iter().enumerate() {
                let source = PathSource {
                    param,
                    family,
                    raw_value,
                    alternatives_before: rendered[..index]
                        .iter()
                        .map(|other| format!("{other}{or}"))
                        .collect(),
                    alternatives_after: rendered[index + 1..]
                        .iter()
                        .map(|other| format!("{or}{other}"))
                        .collect(),
                };
                match self.compile_path(&source, path, stats, compiled)? {
                    PathOutcome::Compiled(fragment) => alternatives.push(fragment),
                    PathOutcome::Unresolved(identifier) => {
                        if !missing.contains(&identifier) {
                            missing.push(identifier);
                        }
                    }
                }
            }
        }

        if alternatives.is_empty() {
            if !missing.is_empty() {
                debug!(parameter = param.name(), ?missing, "no alternative resolved");
                compiled.fragment.and_clause(MATCH_NOTHING);
            }
        } else {
            compiled.fragment.merge(QueryFragment::any_of(alternatives));
        }
        for identifier in missing {
            if !compiled.unresolved.contains(&identifier) {
                compiled.unresolved.push(identifier);
            }
        }
        Ok(())
    }

    fn compile_path(
        &self,
        source: &PathSource<'_>,
        path: &[String],
        stats: &StatsTable,
        compiled: &mut CompiledQuery,
    ) -> Result<PathOutcome> {
        let mut fragment = QueryFragment::new();
        let mut field = FieldPath::root(source.family);
        let mut prefix: Vec<String> = Vec::new();

        for (position, raw_identifier) in path.iter().enumerate() {
            if field.kind().is_literal() {
                if position + 1 != path.len() {
                    return Err(ParseError::malformed(
                        source.param.name(),
                        format!("'{}' follows the literal '{raw_identifier}'", path[position + 1]),
                    )
                    .into());
                }
                self.compile_literal(
                    source,
                    &field,
                    Some(raw_identifier.as_str()),
                    &prefix,
                    stats,
                    &mut fragment,
                    compiled,
                )?;
                return Ok(PathOutcome::Compiled(fragment));
            }

            let (identifier, linked) = match raw_identifier.strip_prefix(&self.config.related_prefix) {
                Some(stripped) => (stripped, true),
                None => (raw_identifier.as_str(), false),
            };
            let node = match self.resolver.resolve(identifier) {
                Ok(node) => node,
                Err(ResolveError::NotFound(_)) => {
                    debug!(
                        parameter = source.param.name(),
                        identifier, "dropping alternative with unresolved identifier"
                    );
                    return Ok(PathOutcome::Unresolved(identifier.to_string()));
                }
                Err(ResolveError::Store(err)) => return Err(CompileError::Store(err)),
            };
            fragment.and_clause(format!("{}:{}", field.render(), escape_term(&node.slug)));
            let related_prefix =
                (linked || node.related).then_some(self.config.related_prefix.as_str());
            field = field.child(&node, related_prefix);
            prefix.push(raw_identifier.clone());
        }

        if field.kind().is_literal() {
            self.compile_literal(source, &field, None, &prefix, stats, &mut fragment, compiled)?;
        } else {
            let name = field.render();
            fragment.facet_fields.insert(name.clone());
            compiled.register_facet(FacetFieldMeta {
                field: name,
                parameter: source.param,
                kind: FacetKind::Entity,
                family: Some(source.family),
                parent_label: field.parent().map(|step| step.label.clone()),
                raw_prefix: prefix,
                source_value: Some(source.raw_value.to_string()),
                alternatives_before: source.alternatives_before.clone(),
                alternatives_after: source.alternatives_after.clone(),
            });
        }
        Ok(PathOutcome::Compiled(fragment))
    }

    /// Compile the value of a literal predicate, or register the
    /// predicate's range facet when no value was given.
    #[allow(clippy::too_many_arguments)]
    fn compile_literal(
        &self,
        source: &PathSource<'_>,
        field: &FieldPath,
        raw: Option<&str>,
        prefix: &[String],
        stats: &StatsTable,
        fragment: &mut QueryFragment,
        compiled: &mut CompiledQuery,
    ) -> Result<()> {
        let name = field.render();
        let kind = match field.kind() {
            DataKind::Numeric => RangeKind::Numeric,
            DataKind::Date => RangeKind::Date,
            DataKind::String => {
                for term in raw.map(tokenize).unwrap_or_default() {
                    fragment.and_clause(format!("{name}:{term}"));
                    if !fragment.highlight_queries.contains(&term) {
                        fragment.highlight_queries.push(term);
                    }
                }
                return Ok(());
            }
            DataKind::Id => return Ok(()),
        };

        let literal = match raw {
            Some(raw) => LiteralRange::parse(kind, raw)?,
            None => LiteralRange::open(kind),
        };
        let state = match (literal.low, literal.high) {
            (Some(min), Some(max)) => RangeState::Bound(RangeBounds {
                min,
                max,
                count: None,
            }),
            _ => RangeState::Unbounded.advance(&name, kind, stats),
        };

        match state.bounds() {
            Some(bounds) if bounds.is_empty() => {
                debug!(field = %name, "index holds no values for range field");
                if raw.is_some() {
                    fragment.and_clause(format!(
                        "{name}:[{} TO {}]",
                        literal.low.map_or_else(|| "*".to_string(), |low| render_point(kind, low)),
                        literal.high.map_or_else(|| "*".to_string(), |high| render_point(kind, high)),
                    ));
                }
            }
            Some(bounds) => {
                let (low, high) = literal.within(bounds.min, bounds.max);
                if raw.is_some() {
                    fragment.and_clause(format!(
                        "{name}:[{} TO {}]",
                        render_point(kind, low),
                        render_point(kind, high)
                    ));
                }
                if low < high {
                    let groups = self.config.groups_for(bounds.count);
                    fragment.range_requests.insert(
                        name.clone(),
                        RangeRequest {
                            kind,
                            start: render_point(kind, low),
                            end: render_point(kind, high),
                            gap: render_gap(kind, high - low, groups),
                            sort_by_index: true,
                        },
                    );
                    fragment.stats_fields.insert(name.clone());
                    compiled.register_facet(FacetFieldMeta {
                        field: name.clone(),
                        parameter: source.param,
                        kind: FacetKind::Range(kind),
                        family: Some(source.family),
                        parent_label: field.parent().map(|step| step.label.clone()),
                        raw_prefix: prefix.to_vec(),
                        source_value: Some(source.raw_value.to_string()),
                        alternatives_before: source.alternatives_before.clone(),
                        alternatives_after: source.alternatives_after.clone(),
                    });
                }
            }
            None => {
                debug!(field = %name, "range field needs index statistics");
                fragment.prequery_stats.insert(name.clone());
            }
        }
        compiled.range_states.insert(name, state);
        Ok(())
    }

    fn compile_types(&self, raw_values: &[String], compiled: &mut CompiledQuery) -> Result<()> {
        let values = self.expand_flat(Param::Type, raw_values)?;
        let mut alternatives = Vec::new();
        let mut missing = Vec::new();
        for value in values {
            match ItemType::from_token(&value) {
                Some(item_type) => {
                    let mut fragment = QueryFragment::new();
                    fragment.and_clause(format!("{}:{}", schema::ITEM_TYPE, item_type.token()));
                    alternatives.push(fragment);
                }
                None => {
                    debug!(item_type = %value, "dropping unknown item type");
                    missing.push(value);
                }
            }
        }
        if alternatives.is_empty() && !missing.is_empty() {
            compiled.fragment.and_clause(MATCH_NOTHING);
        } else {
            compiled.fragment.merge(QueryFragment::any_of(alternatives));
        }
        compiled.unresolved.extend(missing);
        Ok(())
    }

    fn compile_ids(&self, raw_values: &[String], compiled: &mut CompiledQuery) -> Result<()> {
        let alternatives = self
            .expand_flat(Param::Id, raw_values)?
            .into_iter()
            .map(|value| {
                let mut fragment = QueryFragment::new();
                fragment.and_clause(format!(
                    "({}:{} OR {}:{})",
                    schema::UUID,
                    escape_term(&value),
                    schema::PERSISTENT_URI,
                    quote_phrase(&value)
                ));
                fragment
            })
            .collect();
        compiled.fragment.merge(QueryFragment::any_of(alternatives));
        Ok(())
    }

    fn compile_tiles(
        &self,
        param: Param,
        raw_values: &[String],
        compiled: &mut CompiledQuery,
    ) -> Result<()> {
        let field = match param {
            Param::DiscGeotile => schema::GEO_TILE,
            _ => schema::CHRONO_TILE,
        };
        let mut alternatives = Vec::new();
        for value in self.expand_flat(param, raw_values)? {
            let checked = match param {
                Param::DiscGeotile => geo::decode(&value).map(|_| value.clone()),
                _ => {
                    let value = value.to_ascii_lowercase();
                    chrono::decode(&value).map(|_| value)
                }
            };
            match checked {
                Ok(path) => {
                    let mut fragment = QueryFragment::new();
                    fragment.and_clause(format!("{field}:{}*", escape_term(&path)));
                    alternatives.push(fragment);
                }
                Err(err) => {
                    warn!(parameter = param.name(), %value, error = %err, "rejecting tile filter");
                    compiled.rejected_filters.push(RejectedFilter {
                        parameter: param.name().to_string(),
                        value,
                        reason: err.to_string(),
                    });
                }
            }
        }
        compiled.fragment.merge(QueryFragment::any_of(alternatives));
        Ok(())
    }

    /// `form-start` keeps records still in use at or after the year;
    /// `form-stop` keeps records already in use by the year.
    fn compile_years(
        &self,
        param: Param,
        raw_values: &[String],
        compiled: &mut CompiledQuery,
    ) -> Result<()> {
        let mut alternatives = Vec::new();
        for value in self.expand_flat(param, raw_values)? {
            let year: i64 = value
                .parse()
                .map_err(|_| ParseError::InvalidNumber(format!("{}={value}", param.name())))?;
            let clause = match param {
                Param::FormStart => format!("{}:[{year} TO *]", schema::CHRONO_LATEST),
                _ => format!("{}:[* TO {year}]", schema::CHRONO_EARLIEST),
            };
            let mut fragment = QueryFragment::new();
            fragment.and_clause(clause);
            alternatives.push(fragment);
        }
        compiled.fragment.merge(QueryFragment::any_of(alternatives));
        Ok(())
    }

    fn compile_attributes(&self, raw_values: &[String], compiled: &mut CompiledQuery) -> Result<()> {
        let identifiers = raw_values
            .iter()
            .flat_map(|raw| raw.split(','))
            .map(str::trim)
            .filter(|identifier| !identifier.is_empty());
        for identifier in identifiers {
            let node = match self.resolver.resolve(identifier) {
                Ok(node) => node,
                Err(ResolveError::NotFound(_)) => {
                    debug!(identifier, "dropping unresolved attribute");
                    continue;
                }
                Err(ResolveError::Store(err)) => return Err(CompileError::Store(err)),
            };
            let field = FieldPath::root(FieldFamily::Pred).child(&node, None).render();
            if !compiled.return_fields.contains(&field) {
                compiled.return_fields.push(field);
            }
        }
        Ok(())
    }

    fn expand_flat(&self, param: Param, raw_values: &[String]) -> Result<Vec<String>> {
        let paths = expand_with_limit(
            param.name(),
            raw_values,
            None,
            &self.config.or_delimiter,
            self.config.max_alternatives,
        )?;
        Ok(paths.into_iter().flatten().collect())
    }

    fn parse_rows(&self, raw: &str) -> Result<usize> {
        let rows = parse_count(Param::Rows, raw)?;
        if rows > self.config.max_rows {
            debug!(rows, max_rows = self.config.max_rows, "clamping page size");
        }
        Ok(rows.min(self.config.max_rows))
    }
}

fn compile_text(raw_values: &[String], compiled: &mut CompiledQuery) {
    let terms: Vec<String> = raw_values.iter().flat_map(|raw| tokenize(raw)).collect();
    if terms.is_empty() {
        return;
    }
    compiled.query = terms
        .iter()
        .map(|term| format!("{}:{term}", schema::TEXT))
        .collect::<Vec<_>>()
        .join(" AND ");
    for term in terms {
        if !compiled.fragment.highlight_queries.contains(&term) {
            compiled.fragment.highlight_queries.push(term);
        }
    }
}

fn parse_count(param: Param, raw: &str) -> std::result::Result<usize, ParseError> {
    raw.trim()
        .parse()
        .map_err(|_| ParseError::InvalidPaging(format!("{}={raw}", param.name())))
}

/// Facets every response carries so a client can start drilling down.
fn add_default_facets(params: &RequestParams, compiled: &mut CompiledQuery) {
    for param in [Param::Path, Param::Prop, Param::Proj] {
        if params.contains(param.name()) {
            continue;
        }
        if let Some(family) = param.family() {
            let field = FieldPath::root(family).render();
            compiled.fragment.facet_fields.insert(field.clone());
            compiled.register_facet(FacetFieldMeta::fixed(&field, param, FacetKind::Entity));
        }
    }
    let fixed = [
        (schema::ITEM_TYPE, Param::Type, FacetKind::ItemType),
        (schema::CHRONO_TILE, Param::FormChronotile, FacetKind::ChronoTile),
        (schema::GEO_TILE, Param::DiscGeotile, FacetKind::GeoTile),
    ];
    for (field, param, kind) in fixed {
        compiled.fragment.facet_fields.insert(field.to_string());
        compiled.register_facet(FacetFieldMeta::fixed(field, param, kind));
    }
}
