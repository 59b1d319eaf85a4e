use crate::error::StoreError;
use crate::model::EntityNode;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// External entity lookup collaborator.
///
/// Implementations accept an identifier, slug or canonical URI and return
/// the matching entity, or `None` when nothing matches.
pub trait EntityStore: Send + Sync {
    fn lookup(&self, identifier: &str) -> Result<Option<EntityNode>, StoreError>;
}

/// Entity store backed by a fixed set of nodes.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    nodes: Vec<EntityNode>,
    index: HashMap<String, usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: impl IntoIterator<Item = EntityNode>) -> Self {
        let mut store = Self::new();
        for node in nodes {
            store.insert(node);
        }
        store
    }

    /// Load a JSON array of entity nodes.
    pub fn from_json(data: &str) -> Result<Self, StoreError> {
        let nodes: Vec<EntityNode> = serde_json::from_str(data)?;
        Ok(Self::from_nodes(nodes))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, StoreError> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn insert(&mut self, node: EntityNode) {
        let position = self.nodes.len();
        for key in [&node.identifier, &node.slug, &node.canonical_uri] {
            self.index.entry(key.clone()).or_insert(position);
        }
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl EntityStore for InMemoryStore {
    fn lookup(&self, identifier: &str) -> Result<Option<EntityNode>, StoreError> {
        Ok(self
            .index
            .get(identifier)
            .and_then(|position| self.nodes.get(*position))
            .cloned())
    }
}
