use clap::{Parser, Subcommand};
use rebate_app::{
    config::{DatabaseConfig, EngineConfig, LoggingConfig},
    context::AppContext,
};
use serde::Serialize;

mod price;
mod promotions;
mod sweep;
mod usage;

#[derive(Debug, Parser)]
#[command(name = "rebate-app", about = "Rebate promotion engine CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(flatten)]
    database: DatabaseConfig,

    #[command(flatten)]
    engine: EngineConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Retire expired and exhausted promotions
    Sweep(sweep::SweepArgs),

    /// Record promotion usage for completed orders
    Usage(usage::UsageCommand),

    /// Inspect promotions
    Promotions(promotions::PromotionsCommand),

    /// Price products and categories with their current promotions
    Price(price::PriceCommand),
}

impl Cli {
    pub(crate) fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        let ctx = self.context().await?;

        match self.command {
            Commands::Sweep(args) => sweep::run(&ctx, args).await,
            Commands::Usage(command) => usage::run(&ctx, command).await,
            Commands::Promotions(command) => promotions::run(&ctx, command).await,
            Commands::Price(command) => price::run(&ctx, command).await,
        }
    }

    async fn context(&self) -> Result<AppContext, String> {
        let url = self
            .database
            .database_url
            .as_deref()
            .ok_or_else(|| "DATABASE_URL or --database-url is required".to_string())?;

        AppContext::from_database_url(url, &self.engine)
            .await
            .map_err(|error| format!("failed to initialise: {error}"))
    }
}

/// Print `value` as pretty JSON on stdout.
fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|error| format!("failed to serialise output: {error}"))?;

    println!("{json}");

    Ok(())
}
