//! The `sort` parameter: `interest--desc---item--asc`.

use crate::error::ParseError;
use crate::schema;
use strata_protocol::SortOrder;
use strata_protocol::SortSpec;

pub const TERM_DELIMITER: &str = "---";
pub const ORDER_DELIMITER: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Item,
    Interest,
    Updated,
    Published,
    Context,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Item,
        SortKey::Interest,
        SortKey::Updated,
        SortKey::Published,
        SortKey::Context,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            SortKey::Item => "item",
            SortKey::Interest => "interest",
            SortKey::Updated => "updated",
            SortKey::Published => "published",
            SortKey::Context => "context",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SortKey::Item => "Item",
            SortKey::Interest => "Interest score",
            SortKey::Updated => "Updated",
            SortKey::Published => "Published",
            SortKey::Context => "Context",
        }
    }

    /// Index field the key sorts on.
    pub const fn field(self) -> &'static str {
        match self {
            SortKey::Item => schema::SLUG_TYPE_URI_LABEL,
            SortKey::Interest => schema::INTEREST_SCORE,
            SortKey::Updated => schema::UPDATED,
            SortKey::Published => schema::PUBLISHED,
            SortKey::Context => schema::CONTEXT_PATH,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortTerm {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortTerm {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    pub fn spec(&self) -> SortSpec {
        SortSpec::new(self.key.field(), self.order)
    }

    pub fn render(&self) -> String {
        format!("{}{ORDER_DELIMITER}{}", self.key.name(), self.order)
    }
}

pub fn default_sort() -> Vec<SortTerm> {
    vec![SortTerm::new(SortKey::Interest, SortOrder::Desc)]
}

/// Parse a sort value; a term without an order sorts ascending.
pub fn parse_sort(raw: &str) -> Result<Vec<SortTerm>, ParseError> {
    let mut terms: Vec<SortTerm> = Vec::new();
    for piece in raw.split(TERM_DELIMITER) {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let (name, order) = match piece.rsplit_once(ORDER_DELIMITER) {
            Some((name, order)) => (
                name,
                SortOrder::parse(order)
                    .ok_or_else(|| ParseError::InvalidSort(format!("unknown order in '{piece}'")))?,
            ),
            None => (piece, SortOrder::Asc),
        };
        let key = SortKey::from_name(name.trim())
            .ok_or_else(|| ParseError::InvalidSort(format!("unknown sort key '{name}'")))?;
        if terms.iter().any(|term| term.key == key) {
            return Err(ParseError::InvalidSort(format!(
                "'{}' appears more than once",
                key.name()
            )));
        }
        terms.push(SortTerm::new(key, order));
    }
    if terms.is_empty() {
        return Ok(default_sort());
    }
    Ok(terms)
}

pub fn render_sort(terms: &[SortTerm]) -> String {
    terms
        .iter()
        .map(SortTerm::render)
        .collect::<Vec<_>>()
        .join(TERM_DELIMITER)
}
