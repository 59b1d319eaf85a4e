use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use serde_json::json;
use strata_tiles::chrono;

#[derive(Debug, Parser)]
pub struct TileCli {
    #[command(subcommand)]
    pub command: TileCommand,
}

#[derive(Debug, Subcommand)]
pub enum TileCommand {
    /// Encode an interval into a tile path
    #[command(allow_negative_numbers = true)]
    Encode(EncodeArgs),

    /// Decode a tile path into the interval it covers
    Decode(DecodeArgs),
}

#[derive(Debug, Parser)]
pub struct EncodeArgs {
    /// Most ancient end of the interval
    pub earliest: i64,

    /// Most recent end of the interval
    pub latest: i64,

    /// Magnitude prefix such as `10m`
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Read the bounds as calendar years (negative for BCE) instead of BP
    #[arg(long)]
    pub years: bool,
}

#[derive(Debug, Parser)]
pub struct DecodeArgs {
    /// Tile path, optionally prefixed (`10m-0123`)
    pub path: String,
}

impl TileCli {
    pub fn run(self) -> Result<()> {
        match self.command {
            TileCommand::Encode(args) => {
                let path = if args.years {
                    chrono::encode_years(args.earliest, args.latest, &args.prefix)
                } else {
                    chrono::encode(args.earliest, args.latest, &args.prefix)
                }
                .with_context(|| {
                    format!("cannot encode {} to {}", args.earliest, args.latest)
                })?;
                println!("{path}");
            }
            TileCommand::Decode(args) => {
                let bounds = chrono::decode(&args.path)
                    .with_context(|| format!("cannot decode '{}'", args.path))?;
                let output = json!({
                    "path": args.path,
                    "earliest": bounds.earliest,
                    "latest": bounds.latest,
                    "earliest_year": bounds.earliest_year(),
                    "latest_year": bounds.latest_year(),
                    "max_bound": bounds.max_bound,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }
        Ok(())
    }
}
