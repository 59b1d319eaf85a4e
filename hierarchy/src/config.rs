use serde::Deserialize;
use serde::Serialize;

/// Configuration for hierarchy resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Maximum number of hops walked from a node toward its root
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum number of chains collected for one concept
    #[serde(default = "default_max_chains")]
    pub max_chains: usize,

    /// Parent reference that terminates spatial and project walks
    #[serde(default = "default_root_sentinel")]
    pub root_sentinel: String,

    /// Namespace prepended to shared cache keys
    #[serde(default = "default_cache_namespace")]
    pub cache_namespace: String,

    /// Capacity of the in-process shared cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_max_depth() -> usize {
    30
}

fn default_max_chains() -> usize {
    256
}

fn default_root_sentinel() -> String {
    "root".to_string()
}

fn default_cache_namespace() -> String {
    "entity".to_string()
}

fn default_cache_capacity() -> usize {
    strata_utils_cache::DEFAULT_CAPACITY
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_chains: default_max_chains(),
            root_sentinel: default_root_sentinel(),
            cache_namespace: default_cache_namespace(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl ResolverConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("max_depth must be > 0".to_string());
        }
        if self.max_depth > 256 {
            return Err(format!(
                "max_depth must be <= 256, got {}",
                self.max_depth
            ));
        }
        if self.max_chains == 0 {
            return Err("max_chains must be > 0".to_string());
        }
        if self.root_sentinel.trim().is_empty() {
            return Err("root_sentinel must not be empty".to_string());
        }
        if self.cache_namespace.trim().is_empty() {
            return Err("cache_namespace must not be empty".to_string());
        }
        Ok(())
    }
}
