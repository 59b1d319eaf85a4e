//! Client request parameters and the registry of names the compiler knows.

use crate::field::FieldFamily;
use indexmap::IndexMap;
use url::form_urlencoded;

/// Recognized request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Param {
    Path,
    Prop,
    Proj,
    Type,
    Q,
    Id,
    FormChronotile,
    DiscGeotile,
    FormStart,
    FormStop,
    Sort,
    Attributes,
    Rows,
    Start,
    Chronodeep,
    Geodeep,
}

impl Param {
    pub const ALL: [Param; 16] = [
        Param::Path,
        Param::Prop,
        Param::Proj,
        Param::Type,
        Param::Q,
        Param::Id,
        Param::FormChronotile,
        Param::DiscGeotile,
        Param::FormStart,
        Param::FormStop,
        Param::Sort,
        Param::Attributes,
        Param::Rows,
        Param::Start,
        Param::Chronodeep,
        Param::Geodeep,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Param::Path => "path",
            Param::Prop => "prop",
            Param::Proj => "proj",
            Param::Type => "type",
            Param::Q => "q",
            Param::Id => "id",
            Param::FormChronotile => "form-chronotile",
            Param::DiscGeotile => "disc-geotile",
            Param::FormStart => "form-start",
            Param::FormStop => "form-stop",
            Param::Sort => "sort",
            Param::Attributes => "attributes",
            Param::Rows => "rows",
            Param::Start => "start",
            Param::Chronodeep => "chronodeep",
            Param::Geodeep => "geodeep",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|param| param.name() == name)
    }

    /// Separator between path segments; `None` for flat parameters.
    pub const fn hierarchy_delimiter(self) -> Option<&'static str> {
        match self {
            Param::Path => Some("/"),
            Param::Prop | Param::Proj => Some("---"),
            _ => None,
        }
    }

    /// Field family of hierarchical parameters.
    pub const fn family(self) -> Option<FieldFamily> {
        match self {
            Param::Path => Some(FieldFamily::Context),
            Param::Prop => Some(FieldFamily::Pred),
            Param::Proj => Some(FieldFamily::Project),
            _ => None,
        }
    }

    /// Parameters that narrow the result set and can be removed by a link.
    pub const fn is_filter(self) -> bool {
        !matches!(
            self,
            Param::Sort
                | Param::Attributes
                | Param::Rows
                | Param::Start
                | Param::Chronodeep
                | Param::Geodeep
        )
    }
}

/// Ordered multimap of request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    values: IndexMap<String, Vec<String>>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a URL query string; a leading `?` is ignored.
    pub fn parse(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut params = Self::new();
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            params.push(name.as_ref(), value.as_ref());
        }
        params
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut params = Self::new();
        for (name, value) in pairs {
            params.push(name, value);
        }
        params
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, values) in &self.values {
            for value in values {
                serializer.append_pair(name, value);
            }
        }
        serializer.finish()
    }

    pub fn push(&mut self, name: &str, value: &str) {
        self.values
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }

    pub fn get(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).first().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        !self.get(name).is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(Vec::is_empty)
    }

    /// Copy with `value` added unless already present.
    pub fn with_value(&self, name: &str, value: &str) -> Self {
        let mut params = self.clone();
        if !params.get(name).iter().any(|existing| existing == value) {
            params.push(name, value);
        }
        params
    }

    /// Copy with one value removed; the name disappears with its last value.
    pub fn without_value(&self, name: &str, value: &str) -> Self {
        let mut params = self.clone();
        if let Some(values) = params.values.get_mut(name) {
            values.retain(|existing| existing != value);
            if values.is_empty() {
                params.values.shift_remove(name);
            }
        }
        params
    }

    /// Copy with `old` swapped for `new` in place, or `new` appended when
    /// `old` is absent.
    pub fn replace_value(&self, name: &str, old: &str, new: &str) -> Self {
        let mut params = self.clone();
        let values = params.values.entry(name.to_string()).or_default();
        match values.iter().position(|existing| existing == old) {
            Some(index) => values[index] = new.to_string(),
            None => values.push(new.to_string()),
        }
        values.dedup();
        params
    }

    /// Copy with every value of `name` replaced by a single value.
    pub fn with_single(&self, name: &str, value: &str) -> Self {
        let mut params = self.clone();
        params
            .values
            .insert(name.to_string(), vec![value.to_string()]);
        params
    }

    pub fn without(&self, name: &str) -> Self {
        let mut params = self.clone();
        params.values.shift_remove(name);
        params
    }
}
