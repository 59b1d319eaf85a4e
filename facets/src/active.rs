//! Descriptors of the filters a request applies, with links that remove
//! or broaden each one.

use crate::entity::ActiveIdentities;
use crate::entity::label_for;
use crate::error::Result;
use crate::links::LinkBuilder;
use crate::model::ActiveFilter;
use strata_hierarchy::HierarchyResolver;
use strata_hierarchy::ItemType;
use strata_hierarchy::ResolveError;
use strata_query::CompilerConfig;
use strata_query::Param;
use strata_query::RequestParams;

const LEVEL_SEPARATOR: &str = " :: ";
const OR_SEPARATOR: &str = " OR ";

pub fn active_filters(
    resolver: &HierarchyResolver,
    links: &LinkBuilder,
    params: &RequestParams,
    compiler: &CompilerConfig,
) -> Result<Vec<ActiveFilter>> {
    let mut filters = Vec::new();
    for (name, values) in params.iter() {
        let Some(param) = Param::from_name(name) else {
            continue;
        };
        if !param.is_filter() {
            continue;
        }
        for value in values {
            if value.trim().is_empty() {
                continue;
            }
            let label = filter_label(resolver, compiler, param, value)?;
            let broaden_link = param
                .hierarchy_delimiter()
                .and_then(|delimiter| broader(value, delimiter))
                .map(|parent| links.filter_link(&params.replace_value(name, value, &parent)));
            filters.push(ActiveFilter {
                parameter: name.to_string(),
                value: value.clone(),
                label,
                removal_link: links.filter_link(&params.without_value(name, value)),
                broaden_link,
            });
        }
    }
    Ok(filters)
}

/// Identities already filtered on through `param`: every raw segment and
/// the slug and URI of each segment that resolves.
pub fn active_identities(
    resolver: &HierarchyResolver,
    compiler: &CompilerConfig,
    params: &RequestParams,
    param: Param,
) -> Result<ActiveIdentities> {
    let mut active = ActiveIdentities::default();
    for value in params.get(param.name()) {
        for identifier in segments(compiler, param, value) {
            let identifier = identifier
                .strip_prefix(&compiler.related_prefix)
                .unwrap_or(identifier);
            active.insert(identifier);
            match resolver.resolve(identifier) {
                Ok(node) => {
                    active.insert(node.slug);
                    active.insert(node.canonical_uri);
                }
                Err(ResolveError::NotFound(_)) => {}
                Err(ResolveError::Store(err)) => return Err(err.into()),
            }
        }
    }
    Ok(active)
}

fn filter_label(
    resolver: &HierarchyResolver,
    compiler: &CompilerConfig,
    param: Param,
    value: &str,
) -> Result<String> {
    match param.hierarchy_delimiter() {
        Some(delimiter) => {
            let mut levels = Vec::new();
            for level in trimmed(value, delimiter).split(delimiter) {
                let mut alternatives = Vec::new();
                for alternative in level.split(compiler.or_delimiter.as_str()) {
                    let alternative = alternative.trim();
                    let identifier = alternative
                        .strip_prefix(&compiler.related_prefix)
                        .unwrap_or(alternative);
                    alternatives.push(label_for(resolver, identifier)?);
                }
                levels.push(alternatives.join(OR_SEPARATOR));
            }
            Ok(levels.join(LEVEL_SEPARATOR))
        }
        None if param == Param::Type => Ok(value
            .split(compiler.or_delimiter.as_str())
            .map(|token| match ItemType::from_token(token) {
                Some(item_type) => item_type.token().to_string(),
                None => token.trim().to_string(),
            })
            .collect::<Vec<_>>()
            .join(OR_SEPARATOR)),
        None => Ok(value.to_string()),
    }
}

fn segments<'a>(compiler: &'a CompilerConfig, param: Param, value: &'a str) -> Vec<&'a str> {
    let levels: Vec<&str> = match param.hierarchy_delimiter() {
        Some(delimiter) => trimmed(value, delimiter).split(delimiter).collect(),
        None => vec![value],
    };
    levels
        .into_iter()
        .flat_map(|level| level.split(compiler.or_delimiter.as_str()))
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

fn trimmed<'a>(value: &'a str, delimiter: &str) -> &'a str {
    value
        .trim()
        .trim_start_matches(delimiter)
        .trim_end_matches(delimiter)
}

/// `value` without its last hierarchy level, if it has more than one.
pub fn broader(value: &str, delimiter: &str) -> Option<String> {
    trimmed(value, delimiter)
        .rsplit_once(delimiter)
        .map(|(parent, _)| parent.to_string())
}
