use serde::Deserialize;
use serde::Serialize;

/// Configuration for query compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Separator between OR alternatives inside one path segment
    #[serde(default = "default_or_delimiter")]
    pub or_delimiter: String,

    /// Maximum number of expanded paths per parameter
    #[serde(default = "default_max_alternatives")]
    pub max_alternatives: usize,

    /// Page size when the request does not ask for one
    #[serde(default = "default_rows")]
    pub default_rows: usize,

    /// Largest page size a request may ask for
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,

    /// Range buckets requested for well-populated fields
    #[serde(default = "default_range_groups")]
    pub range_groups: usize,

    /// Range buckets requested when few documents have a value
    #[serde(default = "default_small_range_groups")]
    pub small_range_groups: usize,

    /// Value count below which `small_range_groups` applies
    #[serde(default = "default_small_count_threshold")]
    pub small_count_threshold: u64,

    /// Marker for identifiers that link to related records
    #[serde(default = "default_related_prefix")]
    pub related_prefix: String,
}

fn default_or_delimiter() -> String {
    "||".to_string()
}

fn default_max_alternatives() -> usize {
    64
}

fn default_rows() -> usize {
    20
}

fn default_max_rows() -> usize {
    1000
}

fn default_range_groups() -> usize {
    10
}

fn default_small_range_groups() -> usize {
    4
}

fn default_small_count_threshold() -> u64 {
    25
}

fn default_related_prefix() -> String {
    "rel--".to_string()
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            or_delimiter: default_or_delimiter(),
            max_alternatives: default_max_alternatives(),
            default_rows: default_rows(),
            max_rows: default_max_rows(),
            range_groups: default_range_groups(),
            small_range_groups: default_small_range_groups(),
            small_count_threshold: default_small_count_threshold(),
            related_prefix: default_related_prefix(),
        }
    }
}

impl CompilerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.or_delimiter.is_empty() {
            return Err("or_delimiter must not be empty".to_string());
        }
        if self.max_alternatives == 0 {
            return Err("max_alternatives must be > 0".to_string());
        }
        if self.default_rows > self.max_rows {
            return Err(format!(
                "default_rows ({}) must be <= max_rows ({})",
                self.default_rows, self.max_rows
            ));
        }
        if self.range_groups == 0 || self.small_range_groups == 0 {
            return Err("range group counts must be > 0".to_string());
        }
        if self.related_prefix.is_empty() {
            return Err("related_prefix must not be empty".to_string());
        }
        Ok(())
    }

    /// Number of range buckets to request for a field with `count` values.
    pub fn groups_for(&self, count: Option<u64>) -> usize {
        match count {
            Some(count) if count < self.small_count_threshold => self.small_range_groups,
            _ => self.range_groups,
        }
    }
}
