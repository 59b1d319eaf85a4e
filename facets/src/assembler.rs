use crate::active::active_filters;
use crate::active::active_identities;
use crate::config::FacetsConfig;
use crate::entity::ActiveIdentities;
use crate::entity::EntityFacetInput;
use crate::entity::entity_facet;
use crate::error::Result;
use crate::links::LinkBuilder;
use crate::model::EntityFacet;
use crate::model::FacetOption;
use crate::model::OptionGroup;
use crate::model::RejectedFilterModel;
use crate::model::ResponseModel;
use crate::paging::paging;
use crate::ranges::range_facet;
use crate::sorting::sort_descriptor;
use crate::tiles::chrono_facet;
use crate::tiles::effective_depth;
use crate::tiles::geo_facet;
use std::collections::HashMap;
use std::sync::Arc;
use strata_hierarchy::DataKind;
use strata_hierarchy::HierarchyResolver;
use strata_hierarchy::ItemType;
use strata_protocol::EngineResponse;
use strata_protocol::FacetCount;
use strata_query::CompiledQuery;
use strata_query::CompilerConfig;
use strata_query::FacetKind;
use strata_query::Param;
use strata_query::RequestParams;
use strata_query::schema;
use strata_tiles::chrono;
use strata_tiles::geo;
use tracing::debug;

/// Turns raw engine output into the navigable [`ResponseModel`].
pub struct FacetAssembler {
    resolver: Arc<HierarchyResolver>,
    config: FacetsConfig,
    compiler: CompilerConfig,
    links: LinkBuilder,
}

impl FacetAssembler {
    pub fn new(
        resolver: Arc<HierarchyResolver>,
        config: FacetsConfig,
        compiler: CompilerConfig,
    ) -> Self {
        let links = LinkBuilder::new(config.base_url.clone());
        Self {
            resolver,
            config,
            compiler,
            links,
        }
    }

    pub fn config(&self) -> &FacetsConfig {
        &self.config
    }

    pub fn assemble(
        &self,
        params: &RequestParams,
        compiled: &CompiledQuery,
        response: &EngineResponse,
    ) -> Result<ResponseModel> {
        let mut identities: HashMap<Param, ActiveIdentities> = HashMap::new();
        let mut facets = Vec::new();
        let mut range_facets = Vec::new();
        let mut chrono_tiles = None;
        let mut geo_tiles = None;

        for (field, meta) in &compiled.facet_meta {
            match meta.kind {
                FacetKind::Entity => {
                    let Some(counts) = non_empty(response.facet(field)) else {
                        continue;
                    };
                    if !identities.contains_key(&meta.parameter) {
                        let active = active_identities(
                            &self.resolver,
                            &self.compiler,
                            params,
                            meta.parameter,
                        )?;
                        identities.insert(meta.parameter, active);
                    }
                    let Some(active) = identities.get(&meta.parameter) else {
                        continue;
                    };
                    let facet = entity_facet(
                        &self.resolver,
                        &self.links,
                        params,
                        EntityFacetInput {
                            meta,
                            counts,
                            active,
                            max_options: self.config.max_facet_options,
                        },
                    )?;
                    if facet.groups.is_empty() {
                        debug!(%field, "every facet option is already filtered on");
                    } else {
                        facets.push(facet);
                    }
                }
                FacetKind::Range(kind) => {
                    let (Some(raw), Some(request)) = (
                        response.facet_ranges.get(field),
                        compiled.fragment.range_requests.get(field),
                    ) else {
                        continue;
                    };
                    let count = compiled
                        .range_states
                        .get(field)
                        .and_then(|state| state.bounds())
                        .and_then(|bounds| bounds.count);
                    let target = self.compiler.groups_for(count);
                    let facet =
                        range_facet(&self.links, params, meta, kind, request, raw, target);
                    if !facet.options.is_empty() {
                        range_facets.push(facet);
                    }
                }
                FacetKind::ItemType => {
                    if let Some(counts) = non_empty(response.facet(field)) {
                        let facet = self.item_type_facet(params, counts);
                        if !facet.groups.is_empty() {
                            facets.push(facet);
                        }
                    }
                }
                FacetKind::ChronoTile => {
                    if let Some(counts) = non_empty(response.facet(field)) {
                        let depth = effective_depth(
                            compiled.chrono_depth.unwrap_or(self.config.chrono_depth),
                            params.get(Param::FormChronotile.name()),
                            chrono::MAX_DEPTH,
                        );
                        chrono_tiles = Some(chrono_facet(&self.links, params, counts, depth));
                    }
                }
                FacetKind::GeoTile => {
                    if let Some(counts) = non_empty(response.facet(field)) {
                        let depth = effective_depth(
                            compiled.geo_depth.unwrap_or(self.config.geo_depth),
                            params.get(Param::DiscGeotile.name()),
                            geo::MAX_ZOOM,
                        );
                        geo_tiles = Some(geo_facet(&self.links, params, counts, depth));
                    }
                }
            }
        }

        Ok(ResponseModel {
            id: self.links.link(params),
            total: response.num_found,
            start: compiled.start,
            rows: compiled.rows,
            paging: paging(
                &self.links,
                params,
                response.num_found,
                compiled.start,
                compiled.rows,
            ),
            sort: sort_descriptor(&self.links, params, &compiled.sort),
            active_filters: active_filters(&self.resolver, &self.links, params, &self.compiler)?,
            facets,
            range_facets,
            chrono_tiles,
            geo_tiles,
            records: response.docs.clone(),
            unresolved: compiled.unresolved.clone(),
            rejected_filters: compiled
                .rejected_filters
                .iter()
                .map(|rejected| RejectedFilterModel {
                    parameter: rejected.parameter.clone(),
                    value: rejected.value.clone(),
                    reason: rejected.reason.clone(),
                })
                .collect(),
        })
    }

    fn item_type_facet(&self, params: &RequestParams, counts: &[FacetCount]) -> EntityFacet {
        let active: Vec<ItemType> = params
            .get(Param::Type.name())
            .iter()
            .flat_map(|value| value.split(self.compiler.or_delimiter.as_str()))
            .filter_map(ItemType::from_token)
            .collect();
        let options: Vec<FacetOption> = counts
            .iter()
            .filter(|count| {
                ItemType::from_token(&count.value).is_none_or(|item_type| !active.contains(&item_type))
            })
            .take(self.config.max_facet_options)
            .map(|count| FacetOption {
                slug: count.value.clone(),
                label: count.value.clone(),
                uri: String::new(),
                count: count.count,
                link: self
                    .links
                    .filter_link(&params.with_value(Param::Type.name(), &count.value)),
            })
            .collect();
        EntityFacet {
            field: schema::ITEM_TYPE.to_string(),
            parameter: Param::Type.name().to_string(),
            label: "Item type".to_string(),
            groups: if options.is_empty() {
                Vec::new()
            } else {
                vec![OptionGroup {
                    kind: DataKind::Id,
                    options,
                }]
            },
        }
    }
}

fn non_empty(counts: Option<&[FacetCount]>) -> Option<&[FacetCount]> {
    counts.filter(|counts| !counts.is_empty())
}
