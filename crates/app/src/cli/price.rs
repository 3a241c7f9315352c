use clap::{Args, Subcommand};
use jiff::Timestamp;
use rebate_app::{
    context::AppContext,
    domain::{
        pricing::PricingServiceError,
        products::records::{CategoryUuid, ProductUuid},
        promotions::records::PromotionUuid,
    },
};
use uuid::Uuid;

use super::print_json;

#[derive(Debug, Args)]
pub(crate) struct PriceCommand {
    /// Price as of this instant instead of now
    #[arg(long)]
    as_of: Option<Timestamp>,

    #[command(subcommand)]
    command: PriceSubcommand,
}

#[derive(Debug, Subcommand)]
enum PriceSubcommand {
    /// A single product
    Product {
        #[arg(long)]
        uuid: Uuid,
    },

    /// Every product, optionally within one category
    Products {
        #[arg(long)]
        category: Option<Uuid>,
    },

    /// A category and whether it has a promotion
    Category {
        #[arg(long)]
        uuid: Uuid,
    },

    /// Products targeted by a promotion
    Promotion {
        #[arg(long)]
        uuid: Uuid,
    },
}

pub(crate) async fn run(ctx: &AppContext, command: PriceCommand) -> Result<(), String> {
    let as_of = command.as_of.unwrap_or_else(Timestamp::now);
    let failed = |error: PricingServiceError| format!("failed to price: {error}");

    match command.command {
        PriceSubcommand::Product { uuid } => print_json(
            &ctx.pricing
                .price_product(ProductUuid::from_uuid(uuid), as_of)
                .await
                .map_err(failed)?,
        ),
        PriceSubcommand::Products { category } => print_json(
            &ctx.pricing
                .price_products(category.map(CategoryUuid::from_uuid), as_of)
                .await
                .map_err(failed)?,
        ),
        PriceSubcommand::Category { uuid } => print_json(
            &ctx.pricing
                .price_category(CategoryUuid::from_uuid(uuid), as_of)
                .await
                .map_err(failed)?,
        ),
        PriceSubcommand::Promotion { uuid } => print_json(
            &ctx.pricing
                .price_promotion_products(PromotionUuid::from_uuid(uuid), as_of)
                .await
                .map_err(failed)?,
        ),
    }
}
