use crate::SourceArgs;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use strata_query::RequestParams;

#[derive(Debug, Parser)]
pub struct SearchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Search index core URL, overriding the configured one
    #[arg(long, value_name = "URL")]
    pub engine_url: Option<String>,

    /// Search index timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

pub(crate) fn run(args: SearchArgs) -> Result<()> {
    let mut config = args.source.load_config()?;
    if let Some(url) = args.engine_url {
        config.engine.base_url = url;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.engine.timeout_ms = timeout_ms;
    }
    config
        .validate()
        .context("invalid search configuration")?;

    let service = args.source.service(config)?;
    let model = service
        .search(&RequestParams::parse(&args.source.query))
        .with_context(|| format!("search for '{}' failed", args.source.query))?;
    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}
