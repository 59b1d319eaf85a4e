//! The `strata` command line: compile requests, run searches and work with
//! tile paths without a hosting server.

mod compile_cmd;
mod search_cmd;
mod tile_cmd;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use strata_engine::HttpSearchEngine;
use strata_hierarchy::InMemoryStore;
use strata_search::SearchService;
use strata_search::StrataConfig;
use strata_search::init_tracing;

pub use compile_cmd::CompileArgs;
pub use search_cmd::SearchArgs;
pub use tile_cmd::TileCli;

#[derive(Debug, Parser)]
#[command(name = "strata", version, about = "Faceted search query compiler")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a request into the index request it would send
    Compile(CompileArgs),

    /// Run a request against a search index and print the result model
    Search(SearchArgs),

    /// Encode and decode chronological tile paths
    Tile(TileCli),
}

/// Options shared by commands that compile requests.
#[derive(Debug, clap::Args)]
pub struct SourceArgs {
    /// JSON array of entities to resolve identifiers against
    #[arg(long, value_name = "PATH")]
    pub entities: PathBuf,

    /// Request query string, e.g. `path=turkey/domuztepe&prop=weight`
    #[arg(short, long, value_name = "QUERY", default_value = "")]
    pub query: String,

    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Compile(args) => compile_cmd::run(args),
            Command::Search(args) => search_cmd::run(args),
            Command::Tile(cli) => cli.run(),
        }
    }
}

impl SourceArgs {
    fn load_config(&self) -> Result<StrataConfig> {
        let config = match &self.config {
            Some(path) => StrataConfig::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => StrataConfig::default(),
        };
        init_tracing(&config.logging);
        Ok(config)
    }

    fn service(&self, config: StrataConfig) -> Result<SearchService> {
        let store = load_entities(&self.entities)?;
        let engine = HttpSearchEngine::new(&config.engine)
            .context("failed to create search index client")?;
        Ok(SearchService::new(
            Arc::new(store),
            Arc::new(engine),
            config,
        ))
    }
}

fn load_entities(path: &Path) -> Result<InMemoryStore> {
    let store = InMemoryStore::from_json_file(path)
        .with_context(|| format!("failed to load entities from {}", path.display()))?;
    tracing::debug!(entities = store.len(), "entity store loaded");
    Ok(store)
}
