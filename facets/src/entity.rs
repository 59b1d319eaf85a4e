//! Entity facets built from composite `slug___kind___uri___label` values.

use crate::error::FacetError;
use crate::error::Result;
use crate::links::LinkBuilder;
use crate::model::EntityFacet;
use crate::model::FacetOption;
use crate::model::OptionGroup;
use std::collections::BTreeMap;
use std::collections::HashSet;
use strata_hierarchy::DataKind;
use strata_hierarchy::HierarchyResolver;
use strata_hierarchy::ResolveError;
use strata_protocol::FacetCount;
use strata_query::FacetFieldMeta;
use strata_query::Param;
use strata_query::RequestParams;
use strata_query::field::FIELD_DELIMITER;
use tracing::debug;

/// Parsed composite facet value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeValue {
    pub slug: String,
    pub kind: DataKind,
    pub uri: String,
    pub label: String,
}

impl CompositeValue {
    /// Values without the composite layout are taken as a bare slug.
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.splitn(4, FIELD_DELIMITER);
        let slug = parts.next().unwrap_or_default().to_string();
        let kind = parts
            .next()
            .and_then(DataKind::from_suffix)
            .unwrap_or(DataKind::Id);
        let uri = parts.next().unwrap_or_default().to_string();
        let label = parts.next().unwrap_or_default().to_string();
        Self {
            slug,
            kind,
            uri,
            label,
        }
    }
}

/// Everything an option may be identified by when it is already filtered on.
#[derive(Debug, Default)]
pub struct ActiveIdentities {
    identities: HashSet<String>,
}

impl ActiveIdentities {
    pub fn insert(&mut self, identity: impl Into<String>) {
        let identity = identity.into();
        if !identity.is_empty() {
            self.identities.insert(identity);
        }
    }

    pub fn contains(&self, value: &CompositeValue) -> bool {
        self.identities.contains(&value.slug)
            || (!value.uri.is_empty() && self.identities.contains(&value.uri))
    }
}

pub struct EntityFacetInput<'a> {
    pub meta: &'a FacetFieldMeta,
    pub counts: &'a [FacetCount],
    pub active: &'a ActiveIdentities,
    pub max_options: usize,
}

pub fn entity_facet(
    resolver: &HierarchyResolver,
    links: &LinkBuilder,
    params: &RequestParams,
    input: EntityFacetInput<'_>,
) -> Result<EntityFacet> {
    let meta = input.meta;
    let delimiter = meta.parameter.hierarchy_delimiter().unwrap_or_default();
    let mut groups: BTreeMap<DataKind, Vec<FacetOption>> = BTreeMap::new();
    let mut listed = 0;

    for count in input.counts {
        if listed >= input.max_options {
            break;
        }
        let value = CompositeValue::parse(&count.value);
        if value.slug.is_empty() || input.active.contains(&value) {
            continue;
        }
        let label = if value.label.is_empty() {
            label_for(resolver, &value.slug)?
        } else {
            value.label.clone()
        };
        let mut path = meta.raw_prefix.clone();
        path.push(value.slug.clone());
        let drilled = meta.drilled_value(&path.join(delimiter));
        let next = match meta.source_value.as_deref() {
            Some(source) => params.replace_value(meta.parameter.name(), source, &drilled),
            None => params.with_value(meta.parameter.name(), &drilled),
        };
        groups.entry(value.kind).or_default().push(FacetOption {
            slug: value.slug,
            label,
            uri: value.uri,
            count: count.count,
            link: links.filter_link(&next),
        });
        listed += 1;
    }

    Ok(EntityFacet {
        field: meta.field.clone(),
        parameter: meta.parameter.name().to_string(),
        label: meta
            .parent_label
            .clone()
            .unwrap_or_else(|| default_label(meta.parameter).to_string()),
        groups: groups
            .into_iter()
            .map(|(kind, options)| OptionGroup { kind, options })
            .collect(),
    })
}

/// Display label of an identifier, or the identifier itself when no
/// entity matches.
pub fn label_for(resolver: &HierarchyResolver, identifier: &str) -> Result<String> {
    match resolver.resolve(identifier) {
        Ok(node) => Ok(node.label),
        Err(ResolveError::NotFound(_)) => {
            debug!(identifier, "no entity to label facet value");
            Ok(identifier.to_string())
        }
        Err(ResolveError::Store(err)) => Err(FacetError::Store(err)),
    }
}

fn default_label(param: Param) -> &'static str {
    match param {
        Param::Path => "Context",
        Param::Prop => "Descriptions",
        Param::Proj => "Projects",
        Param::Type => "Item type",
        _ => param.name(),
    }
}
