use std::{fs, path::PathBuf};

use clap::{Args, Subcommand};
use rebate_app::{context::AppContext, domain::usage::data::CompletedOrder};

use super::print_json;

#[derive(Debug, Args)]
pub(crate) struct UsageCommand {
    #[command(subcommand)]
    command: UsageSubcommand,
}

#[derive(Debug, Subcommand)]
enum UsageSubcommand {
    Record(RecordUsageArgs),
}

#[derive(Debug, Args)]
struct RecordUsageArgs {
    /// JSON file holding a completed order: `{"orderUuid": .., "items": [..]}`
    #[arg(long)]
    order: PathBuf,
}

pub(crate) async fn run(ctx: &AppContext, command: UsageCommand) -> Result<(), String> {
    match command.command {
        UsageSubcommand::Record(args) => record(ctx, args).await,
    }
}

async fn record(ctx: &AppContext, args: RecordUsageArgs) -> Result<(), String> {
    let raw = fs::read_to_string(&args.order)
        .map_err(|error| format!("failed to read {}: {error}", args.order.display()))?;

    let order: CompletedOrder =
        serde_json::from_str(&raw).map_err(|error| format!("invalid order: {error}"))?;

    let report = ctx
        .usage
        .record_usage(order)
        .await
        .map_err(|error| format!("failed to record usage: {error}"))?;

    print_json(&report)
}
