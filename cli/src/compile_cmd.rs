use crate::SourceArgs;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use strata_protocol::FieldStats;
use strata_query::RequestParams;
use strata_query::StatsTable;
use strata_search::Plan;

#[derive(Debug, Parser)]
pub struct CompileArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// JSON object of field statistics from an earlier prequery
    #[arg(long, value_name = "PATH")]
    pub stats: Option<PathBuf>,
}

pub(crate) fn run(args: CompileArgs) -> Result<()> {
    let config = args.source.load_config()?;
    let service = args.source.service(config)?;
    let stats = match &args.stats {
        Some(path) => load_stats(path)?,
        None => StatsTable::new(),
    };
    let params = RequestParams::parse(&args.source.query);
    let plan = service
        .plan(&params, &stats)
        .with_context(|| format!("failed to compile '{}'", args.source.query))?;
    let output = match plan {
        Plan::Prequery(request) => json!({ "phase": "prequery", "request": request }),
        Plan::Query(request) => json!({ "phase": "query", "request": request }),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_stats(path: &Path) -> Result<StatsTable> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read stats from {}", path.display()))?;
    let fields: BTreeMap<String, FieldStats> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse stats in {}", path.display()))?;
    let mut stats = StatsTable::new();
    for (field, field_stats) in fields {
        stats.insert(field, field_stats);
    }
    stats.mark_answered();
    Ok(stats)
}
