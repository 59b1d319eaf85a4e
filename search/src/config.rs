use crate::error::ConfigError;
use serde::Deserialize;
use serde::Serialize;
use std::fs;
use std::path::Path;
use strata_engine::EngineConfig;
use strata_facets::FacetsConfig;
use strata_hierarchy::ResolverConfig;
use strata_query::CompilerConfig;

/// Complete configuration, one section per component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrataConfig {
    #[serde(default)]
    pub compiler: CompilerConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub facets: FacetsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl StrataConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: StrataConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |section: &'static str| move |reason: String| ConfigError::Invalid { section, reason };
        self.compiler.validate().map_err(invalid("compiler"))?;
        self.resolver.validate().map_err(invalid("resolver"))?;
        self.engine.validate().map_err(invalid("engine"))?;
        self.facets.validate().map_err(invalid("facets"))?;
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid {
                section: "logging",
                reason: "level must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
