use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::error::Result;
use crate::model::AncestorChain;
use crate::model::EntityNode;
use crate::model::HierarchyKind;
use crate::model::Metadata;
use crate::model::MetadataKind;
use crate::store::EntityStore;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use strata_utils_cache::SharedCache;
use strata_utils_cache::cache_key;
use tracing::debug;
use tracing::warn;

/// Metadata found on a node or one of its ancestors.
#[derive(Clone, Debug, PartialEq)]
pub struct InheritedMetadata {
    /// Identifier of the node that exposed the metadata
    pub source: String,
    pub metadata: Metadata,
}

type ChainKey = (HierarchyKind, String);

/// Resolves identifiers to entities and ancestor chains.
///
/// Lookups are memoized in-process and read through the injected shared
/// cache. The resolver never mutates the entity store.
pub struct HierarchyResolver {
    store: Arc<dyn EntityStore>,
    cache: Arc<dyn SharedCache>,
    config: ResolverConfig,
    entities: Mutex<HashMap<String, Option<EntityNode>>>,
    chains: Mutex<HashMap<ChainKey, Vec<AncestorChain>>>,
}

struct Walk {
    chains: Vec<Vec<EntityNode>>,
    /// False when a depth cap or cycle cut the walk short; the chain cap
    /// leaves it set, so capped walks are still memoized.
    complete: bool,
}

impl HierarchyResolver {
    pub fn new(
        store: Arc<dyn EntityStore>,
        cache: Arc<dyn SharedCache>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            store,
            cache,
            config,
            entities: Mutex::new(HashMap::new()),
            chains: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn is_root(&self, identifier: &str) -> bool {
        identifier == self.config.root_sentinel
    }

    /// Resolve an identifier, slug or URI to its entity.
    pub fn resolve(&self, identifier: &str) -> Result<EntityNode> {
        let identifier = identifier.trim();
        if identifier.is_empty() || self.is_root(identifier) {
            return Err(ResolveError::NotFound(identifier.to_string()));
        }
        if let Some(memoized) = lock(&self.entities).get(identifier).cloned() {
            return memoized.ok_or_else(|| ResolveError::NotFound(identifier.to_string()));
        }

        let key = cache_key(&self.config.cache_namespace, identifier);
        if let Some(node) = self.read_cache(&key) {
            self.remember(identifier, Some(node.clone()));
            return Ok(node);
        }

        let found = self.store.lookup(identifier)?;
        self.remember(identifier, found.clone());
        match found {
            Some(node) => {
                self.write_cache(&key, &node);
                Ok(node)
            }
            None => Err(ResolveError::NotFound(identifier.to_string())),
        }
    }

    /// Every path from `identifier` toward the root of its hierarchy.
    ///
    /// Depth-cap exhaustion and cycles yield the ancestors found so far.
    /// Concepts stop collecting at `max_chains` chains.
    pub fn ancestor_chains(
        &self,
        identifier: &str,
        kind: HierarchyKind,
    ) -> Result<Vec<AncestorChain>> {
        let node = self.resolve(identifier)?;
        if let Some(chains) = self.memoized_chains(kind, &node.identifier) {
            return Ok(chains);
        }
        let key = (kind, node.identifier.clone());
        let chains = match kind {
            HierarchyKind::Concept => {
                let walk = self.concept_walk(&node, 0, &[])?;
                walk.chains
                    .into_iter()
                    .map(|nodes| AncestorChain::new(kind, nodes))
                    .collect()
            }
            HierarchyKind::Spatial | HierarchyKind::Project => {
                vec![self.linear_chain(node, kind)?]
            }
        };
        lock(&self.chains).insert(key, chains.clone());
        Ok(chains)
    }

    /// Nearest metadata of `metadata_kind`, checking the node itself first
    /// and then its ancestors from nearest to most general.
    pub fn nearest_ancestor_with(
        &self,
        identifier: &str,
        kind: HierarchyKind,
        metadata_kind: MetadataKind,
    ) -> Result<Option<InheritedMetadata>> {
        let node = self.resolve(identifier)?;
        if let Some(metadata) = node.metadata.get(metadata_kind) {
            return Ok(Some(InheritedMetadata {
                source: node.identifier,
                metadata,
            }));
        }

        if let Some(chains) = self.memoized_chains(kind, &node.identifier) {
            return Ok(nearest_in_chains(&chains, metadata_kind));
        }

        let mut seen = HashSet::from([node.identifier.clone()]);
        let mut frontier = vec![node];
        let mut depth = 0;
        while !frontier.is_empty() {
            if depth >= self.config.max_depth {
                warn!(
                    identifier,
                    max_depth = self.config.max_depth,
                    "ancestor metadata search hit the depth cap"
                );
                break;
            }
            let mut next = Vec::new();
            for current in &frontier {
                for parent_ref in self.parent_refs(current, kind) {
                    let parent = match self.resolve(parent_ref) {
                        Ok(parent) => parent,
                        Err(ResolveError::NotFound(missing)) => {
                            debug!(%missing, "skipping unresolved parent");
                            continue;
                        }
                        Err(err) => return Err(err),
                    };
                    if !seen.insert(parent.identifier.clone()) {
                        continue;
                    }
                    if let Some(metadata) = parent.metadata.get(metadata_kind) {
                        return Ok(Some(InheritedMetadata {
                            source: parent.identifier,
                            metadata,
                        }));
                    }
                    next.push(parent);
                }
            }
            frontier = next;
            depth += 1;
        }
        Ok(None)
    }

    fn parent_refs<'a>(&self, node: &'a EntityNode, kind: HierarchyKind) -> Vec<&'a str> {
        let refs = node
            .parent_refs
            .iter()
            .map(String::as_str)
            .filter(|parent| !self.is_root(parent));
        if kind.is_dag() {
            refs.collect()
        } else {
            refs.take(1).collect()
        }
    }

    fn concept_walk(&self, node: &EntityNode, depth: usize, trail: &[&str]) -> Result<Walk> {
        if depth >= self.config.max_depth {
            warn!(
                identifier = %node.identifier,
                max_depth = self.config.max_depth,
                "concept hierarchy hit the depth cap"
            );
            return Ok(Walk {
                chains: vec![vec![node.clone()]],
                complete: false,
            });
        }

        let mut trail = trail.to_vec();
        trail.push(node.identifier.as_str());
        let mut chains = Vec::new();
        let mut complete = true;
        let mut truncated = false;
        for parent_ref in self.parent_refs(node, HierarchyKind::Concept) {
            let parent = match self.resolve(parent_ref) {
                Ok(parent) => parent,
                Err(ResolveError::NotFound(missing)) => {
                    debug!(%missing, child = %node.identifier, "skipping unresolved parent");
                    continue;
                }
                Err(err) => return Err(err),
            };
            if trail.contains(&parent.identifier.as_str()) {
                warn!(
                    identifier = %node.identifier,
                    parent = %parent.identifier,
                    "cycle in concept hierarchy"
                );
                complete = false;
                continue;
            }
            let parent_chains = match self.memoized_chains(HierarchyKind::Concept, &parent.identifier)
            {
                Some(memoized) => memoized
                    .into_iter()
                    .map(|chain| chain.nodes().to_vec())
                    .collect(),
                None => {
                    let walk = self.concept_walk(&parent, depth + 1, &trail)?;
                    if walk.complete {
                        let memo = walk
                            .chains
                            .iter()
                            .cloned()
                            .map(|nodes| AncestorChain::new(HierarchyKind::Concept, nodes))
                            .collect();
                        lock(&self.chains)
                            .insert((HierarchyKind::Concept, parent.identifier.clone()), memo);
                    } else {
                        complete = false;
                    }
                    walk.chains
                }
            };
            for chain in parent_chains {
                if chains.len() >= self.config.max_chains {
                    truncated = true;
                    break;
                }
                let mut full = Vec::with_capacity(chain.len() + 1);
                full.push(node.clone());
                full.extend(chain);
                chains.push(full);
            }
            if truncated {
                warn!(
                    identifier = %node.identifier,
                    max_chains = self.config.max_chains,
                    "concept hierarchy hit the chain cap"
                );
                break;
            }
        }
        if chains.is_empty() {
            chains.push(vec![node.clone()]);
        }
        Ok(Walk { chains, complete })
    }

    fn linear_chain(&self, node: EntityNode, kind: HierarchyKind) -> Result<AncestorChain> {
        let mut seen = HashSet::new();
        let mut nodes = Vec::new();
        let mut current = node;
        loop {
            seen.insert(current.identifier.clone());
            let parent_ref = self
                .parent_refs(&current, kind)
                .first()
                .map(|parent| (*parent).to_string());
            nodes.push(current);
            let Some(parent_ref) = parent_ref else {
                break;
            };
            if nodes.len() >= self.config.max_depth {
                warn!(
                    max_depth = self.config.max_depth,
                    ?kind,
                    "hierarchy walk hit the depth cap"
                );
                break;
            }
            match self.resolve(&parent_ref) {
                Ok(parent) if seen.contains(&parent.identifier) => {
                    warn!(parent = %parent.identifier, ?kind, "cycle in hierarchy");
                    break;
                }
                Ok(parent) => current = parent,
                Err(ResolveError::NotFound(missing)) => {
                    debug!(%missing, ?kind, "hierarchy walk stopped at unresolved parent");
                    break;
                }
                Err(err) => return Err(err),
            }
        }
        nodes.reverse();
        Ok(AncestorChain::new(kind, nodes))
    }

    fn memoized_chains(&self, kind: HierarchyKind, identifier: &str) -> Option<Vec<AncestorChain>> {
        lock(&self.chains)
            .get(&(kind, identifier.to_string()))
            .cloned()
    }

    fn remember(&self, identifier: &str, node: Option<EntityNode>) {
        let mut entities = lock(&self.entities);
        if let Some(found) = &node
            && found.identifier != identifier
        {
            entities.insert(found.identifier.clone(), node.clone());
        }
        entities.insert(identifier.to_string(), node);
    }

    fn read_cache(&self, key: &str) -> Option<EntityNode> {
        match self.cache.get(key) {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(node) => Some(node),
                Err(err) => {
                    debug!(key, error = %err, "ignoring undecodable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                debug!(key, error = %err, "shared cache read failed");
                None
            }
        }
    }

    fn write_cache(&self, key: &str, node: &EntityNode) {
        let bytes = match serde_json::to_vec(node) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(key, error = %err, "entity not cacheable");
                return;
            }
        };
        if let Err(err) = self.cache.set(key, bytes) {
            debug!(key, error = %err, "shared cache write failed");
        }
    }
}

fn nearest_in_chains(
    chains: &[AncestorChain],
    metadata_kind: MetadataKind,
) -> Option<InheritedMetadata> {
    let ordered: Vec<Vec<&EntityNode>> = chains.iter().map(AncestorChain::nearest_first).collect();
    let longest = ordered.iter().map(Vec::len).max().unwrap_or(0);
    for level in 1..longest {
        for chain in &ordered {
            if let Some(node) = chain.get(level)
                && let Some(metadata) = node.metadata.get(metadata_kind)
            {
                return Some(InheritedMetadata {
                    source: node.identifier.clone(),
                    metadata,
                });
            }
        }
    }
    None
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
