use serde::Deserialize;
use serde::Serialize;

/// Configuration for response assembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetsConfig {
    /// Path every generated link starts with
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Digits kept when aggregating chronological tiles
    #[serde(default = "default_chrono_depth")]
    pub chrono_depth: usize,

    /// Digits kept when aggregating geographic tiles
    #[serde(default = "default_geo_depth")]
    pub geo_depth: usize,

    /// Options listed per facet field
    #[serde(default = "default_max_facet_options")]
    pub max_facet_options: usize,
}

fn default_base_url() -> String {
    "/query/".to_string()
}

fn default_chrono_depth() -> usize {
    16
}

fn default_geo_depth() -> usize {
    10
}

fn default_max_facet_options() -> usize {
    100
}

impl Default for FacetsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chrono_depth: default_chrono_depth(),
            geo_depth: default_geo_depth(),
            max_facet_options: default_max_facet_options(),
        }
    }
}

impl FacetsConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }
        if self.chrono_depth == 0 || self.chrono_depth > strata_tiles::chrono::MAX_DEPTH {
            return Err(format!(
                "chrono_depth must be within 1..={}",
                strata_tiles::chrono::MAX_DEPTH
            ));
        }
        if self.geo_depth == 0 || self.geo_depth > strata_tiles::geo::MAX_ZOOM {
            return Err(format!(
                "geo_depth must be within 1..={}",
                strata_tiles::geo::MAX_ZOOM
            ));
        }
        if self.max_facet_options == 0 {
            return Err("max_facet_options must be > 0".to_string());
        }
        Ok(())
    }
}
