//! Typed index field names.
//!
//! A field name is derived from the entity resolved one step earlier in a
//! path: `weight___pred_numeric` holds values of the `weight` predicate and
//! `root___context_id` holds top-level places. [`FieldPath`] keeps the
//! resolved steps and only renders the wire name on demand.

use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use strata_hierarchy::DataKind;
use strata_hierarchy::EntityNode;

pub const ROOT_SLUG: &str = "root";
pub const FIELD_DELIMITER: &str = "___";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFamily {
    /// Spatial containment
    Context,
    /// Descriptive properties
    Pred,
    /// Project nesting
    Project,
}

impl FieldFamily {
    pub const fn token(self) -> &'static str {
        match self {
            FieldFamily::Context => "context",
            FieldFamily::Pred => "pred",
            FieldFamily::Project => "project",
        }
    }
}

/// One resolved entity along a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStep {
    pub identifier: String,
    pub slug: String,
    pub label: String,
    pub kind: DataKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    family: FieldFamily,
    related_prefix: Option<String>,
    steps: Vec<FieldStep>,
}

impl FieldPath {
    pub fn root(family: FieldFamily) -> Self {
        Self {
            family,
            related_prefix: None,
            steps: Vec::new(),
        }
    }

    /// Path one step deeper, keyed by `node`.
    ///
    /// Once a related prefix is set it applies to every deeper field.
    pub fn child(&self, node: &EntityNode, related_prefix: Option<&str>) -> Self {
        let mut path = self.clone();
        if path.related_prefix.is_none() {
            path.related_prefix = related_prefix.map(str::to_string);
        }
        path.steps.push(FieldStep {
            identifier: node.identifier.clone(),
            slug: node.slug.clone(),
            label: node.label.clone(),
            kind: node.field_kind(),
        });
        path
    }

    pub fn family(&self) -> FieldFamily {
        self.family
    }

    pub fn steps(&self) -> &[FieldStep] {
        &self.steps
    }

    pub fn parent(&self) -> Option<&FieldStep> {
        self.steps.last()
    }

    pub fn is_related(&self) -> bool {
        self.related_prefix.is_some()
    }

    /// Kind of the values stored under this field.
    pub fn kind(&self) -> DataKind {
        self.parent().map_or(DataKind::Id, |step| step.kind)
    }

    pub fn render(&self) -> String {
        let parent = self
            .parent()
            .map_or_else(|| ROOT_SLUG.to_string(), |step| field_safe(&step.slug));
        format!(
            "{}{parent}{FIELD_DELIMITER}{}_{}",
            self.related_prefix.as_deref().unwrap_or_default(),
            self.family.token(),
            self.kind().suffix()
        )
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Index-safe form of a slug.
pub fn field_safe(slug: &str) -> String {
    slug.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}
