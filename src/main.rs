use anyhow::Result;
use beedle::commands::logic::{self, CommonOpts, LogicCommand};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "beedle", version, about = "Item-gated reachability and bottleneck analysis for overworld tile maps")]
struct Cli {
    #[command(flatten)]
    common: CommonOpts,
    #[command(subcommand)]
    command: LogicCommand,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logic::cmd_logic(cli.common, cli.command)
}
