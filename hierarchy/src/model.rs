use serde::Deserialize;
use serde::Serialize;
use serde_with::skip_serializing_none;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Subject,
    Predicate,
    Concept,
    Project,
    Person,
    Media,
    Document,
    #[serde(other)]
    Other,
}

impl ItemType {
    /// Value stored in the index `item_type` field.
    pub const fn token(self) -> &'static str {
        match self {
            ItemType::Subject => "subjects",
            ItemType::Predicate => "predicates",
            ItemType::Concept => "types",
            ItemType::Project => "projects",
            ItemType::Person => "persons",
            ItemType::Media => "media",
            ItemType::Document => "documents",
            ItemType::Other => "other",
        }
    }

    pub fn from_token(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "subjects" | "subject" => Some(ItemType::Subject),
            "predicates" | "predicate" => Some(ItemType::Predicate),
            "types" | "type" | "concepts" | "concept" => Some(ItemType::Concept),
            "projects" | "project" => Some(ItemType::Project),
            "persons" | "person" => Some(ItemType::Person),
            "media" => Some(ItemType::Media),
            "documents" | "document" => Some(ItemType::Document),
            _ => None,
        }
    }
}

/// Kind of value an attribute holds; doubles as the field-name suffix.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Id,
    Numeric,
    Date,
    String,
}

impl DataKind {
    pub const fn suffix(self) -> &'static str {
        match self {
            DataKind::Id => "id",
            DataKind::Numeric => "numeric",
            DataKind::Date => "date",
            DataKind::String => "string",
        }
    }

    pub fn from_suffix(raw: &str) -> Option<Self> {
        match raw {
            "id" => Some(DataKind::Id),
            "numeric" => Some(DataKind::Numeric),
            "date" => Some(DataKind::Date),
            "string" => Some(DataKind::String),
            _ => None,
        }
    }

    pub const fn is_literal(self) -> bool {
        !matches!(self, DataKind::Id)
    }

    /// Literal kinds that are queried as ranges.
    pub const fn is_ranged(self) -> bool {
        matches!(self, DataKind::Numeric | DataKind::Date)
    }
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GeoMetadata {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub geotile: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChronoMetadata {
    pub earliest_year: i64,
    pub latest_year: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    Geo,
    Chrono,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Metadata {
    Geo(GeoMetadata),
    Chrono(ChronoMetadata),
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct NodeMetadata {
    #[serde(default)]
    pub geo: Option<GeoMetadata>,
    #[serde(default)]
    pub chrono: Option<ChronoMetadata>,
}

impl NodeMetadata {
    pub fn get(&self, kind: MetadataKind) -> Option<Metadata> {
        match kind {
            MetadataKind::Geo => self.geo.clone().map(Metadata::Geo),
            MetadataKind::Chrono => self.chrono.clone().map(Metadata::Chrono),
        }
    }
}

/// Read-only projection of an entity from the external store.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EntityNode {
    pub identifier: String,
    pub canonical_uri: String,
    pub slug: String,
    pub label: String,
    pub item_type: ItemType,
    #[serde(default)]
    pub data_type: Option<DataKind>,
    #[serde(default)]
    pub parent_refs: Vec<String>,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default)]
    pub related: bool,
    #[serde(default)]
    pub metadata: NodeMetadata,
}

impl EntityNode {
    pub fn new(
        identifier: impl Into<String>,
        slug: impl Into<String>,
        label: impl Into<String>,
        item_type: ItemType,
    ) -> Self {
        let identifier = identifier.into();
        Self {
            canonical_uri: format!("/{}/{identifier}", item_type.token()),
            identifier,
            slug: slug.into(),
            label: label.into(),
            item_type,
            data_type: None,
            parent_refs: Vec::new(),
            has_children: false,
            related: false,
            metadata: NodeMetadata::default(),
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.canonical_uri = uri.into();
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_refs.push(parent.into());
        self
    }

    pub fn with_data_type(mut self, data_type: DataKind) -> Self {
        self.data_type = Some(data_type);
        self
    }

    pub fn with_children(mut self) -> Self {
        self.has_children = true;
        self
    }

    /// Mark the entity as a link to related records.
    pub fn with_related(mut self) -> Self {
        self.related = true;
        self
    }

    pub fn with_geo(mut self, lat: f64, lon: f64) -> Self {
        self.metadata.geo = Some(GeoMetadata {
            lat,
            lon,
            geotile: None,
        });
        self
    }

    pub fn with_chrono(mut self, earliest_year: i64, latest_year: i64) -> Self {
        self.metadata.chrono = Some(ChronoMetadata {
            earliest_year,
            latest_year,
        });
        self
    }

    pub fn is_predicate(&self) -> bool {
        self.item_type == ItemType::Predicate
    }

    /// Kind of the field this entity's children are stored under.
    ///
    /// Predicates with children stay navigable as id fields even when they
    /// declare a literal data type.
    pub fn field_kind(&self) -> DataKind {
        if self.is_predicate() && self.has_children {
            return DataKind::Id;
        }
        self.data_type.unwrap_or(DataKind::Id)
    }

    /// True when `raw` names this entity by identifier, slug or URI.
    pub fn matches(&self, raw: &str) -> bool {
        raw == self.identifier || raw == self.slug || raw == self.canonical_uri
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyKind {
    /// Multi-parent concept taxonomies
    Concept,
    /// Single-parent spatial containment
    Spatial,
    /// Single-parent project nesting
    Project,
}

impl HierarchyKind {
    pub const fn is_dag(self) -> bool {
        matches!(self, HierarchyKind::Concept)
    }
}

/// One path from a node toward its hierarchy root.
///
/// Concept chains are stored most-specific first; spatial and project
/// chains most-general first.
#[derive(Clone, Debug, PartialEq)]
pub struct AncestorChain {
    kind: HierarchyKind,
    nodes: Vec<EntityNode>,
}

impl AncestorChain {
    pub fn new(kind: HierarchyKind, nodes: Vec<EntityNode>) -> Self {
        Self { kind, nodes }
    }

    pub fn kind(&self) -> HierarchyKind {
        self.kind
    }

    pub fn nodes(&self) -> &[EntityNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nearest_first(&self) -> Vec<&EntityNode> {
        if self.kind.is_dag() {
            self.nodes.iter().collect()
        } else {
            self.nodes.iter().rev().collect()
        }
    }

    pub fn most_general_first(&self) -> Vec<&EntityNode> {
        let mut nodes = self.nearest_first();
        nodes.reverse();
        nodes
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .map(|node| node.identifier.as_str())
            .collect()
    }
}
