use clap::Parser;
use strata_cli::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().run()
}
