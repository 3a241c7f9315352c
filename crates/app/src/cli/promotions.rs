use clap::{Args, Subcommand};
use rebate::promotions::PromotionStatus;
use rebate_app::{
    context::AppContext,
    domain::promotions::{
        data::{DEFAULT_PAGE_SIZE, PromotionFilter},
        records::PromotionUuid,
    },
};
use uuid::Uuid;

use super::print_json;

#[derive(Debug, Args)]
pub(crate) struct PromotionsCommand {
    #[command(subcommand)]
    command: PromotionsSubcommand,
}

#[derive(Debug, Subcommand)]
enum PromotionsSubcommand {
    List(ListPromotionsArgs),
    Get(GetPromotionArgs),
}

#[derive(Debug, Args)]
struct ListPromotionsArgs {
    /// Only promotions with this stored status (active, inactive, expired)
    #[arg(long, value_parser = parse_status)]
    status: Option<PromotionStatus>,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: u32,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct GetPromotionArgs {
    #[arg(long)]
    uuid: Option<Uuid>,

    #[arg(long)]
    slug: Option<String>,
}

fn parse_status(value: &str) -> Result<PromotionStatus, String> {
    PromotionStatus::parse(value).ok_or_else(|| format!("unknown status {value}"))
}

pub(crate) async fn run(ctx: &AppContext, command: PromotionsCommand) -> Result<(), String> {
    match command.command {
        PromotionsSubcommand::List(args) => {
            let page = ctx
                .promotions
                .list_promotions(PromotionFilter {
                    status: args.status,
                    page: args.page,
                    page_size: args.page_size,
                })
                .await
                .map_err(|error| format!("failed to list promotions: {error}"))?;

            print_json(&page)
        }
        PromotionsSubcommand::Get(args) => {
            let promotion = match (args.uuid, args.slug) {
                (Some(uuid), _) => {
                    ctx.promotions
                        .get_promotion(PromotionUuid::from_uuid(uuid))
                        .await
                }
                (None, Some(slug)) => ctx.promotions.get_promotion_by_slug(&slug).await,
                (None, None) => return Err("--uuid or --slug is required".to_string()),
            }
            .map_err(|error| format!("failed to get promotion: {error}"))?;

            print_json(&promotion)
        }
    }
}
