//! Test Helpers

use jiff::{SignedDuration, Timestamp};
use rebate::promotions::PromotionStatus;
use rust_decimal::Decimal;

use crate::{
    domain::{
        products::{
            ProductsService, ProductsServiceError,
            data::{NewCategory, NewProduct},
            records::{CategoryRecord, CategoryUuid, ProductRecord, ProductUuid},
        },
        promotions::{
            data::{Banner, NewPromotion, SimpleDiscount},
            records::PromotionUuid,
        },
    },
    test::TestContext,
};

pub(crate) async fn create_category(
    ctx: &TestContext,
    name: &str,
) -> Result<CategoryRecord, ProductsServiceError> {
    ctx.products
        .create_category(NewCategory {
            uuid: CategoryUuid::new(),
            name: name.to_string(),
        })
        .await
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    category: Option<CategoryUuid>,
    price: u64,
) -> Result<ProductRecord, ProductsServiceError> {
    let uuid = ProductUuid::new();

    ctx.products
        .create_product(NewProduct {
            uuid,
            name: format!("Product {uuid}"),
            category_uuid: category,
            price,
        })
        .await
}

/// An active 20% promotion, open from an hour ago for a day, targeting nothing.
pub(crate) fn new_promotion(name: &str) -> NewPromotion {
    let now = Timestamp::now();

    NewPromotion {
        uuid: PromotionUuid::new(),
        name: name.to_string(),
        description: format!("{name} promotion"),
        banner: Banner {
            url: "https://cdn.example.com/banner.png".to_string(),
            public_id: "banner".to_string(),
        },
        discount: SimpleDiscount::PercentageOff {
            percentage: Decimal::from(20),
        },
        max_discount: None,
        starts_at: now - SignedDuration::from_hours(1),
        ends_at: now + SignedDuration::from_hours(24),
        applicable_products: Vec::new(),
        applicable_categories: Vec::new(),
        status: PromotionStatus::Active,
        usage_limit: None,
    }
}

/// Overwrite a promotion's used count without touching its status.
pub(crate) async fn set_used_count(
    ctx: &TestContext,
    promotion: PromotionUuid,
    used_count: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE promotions SET used_count = $2 WHERE uuid = $1")
        .bind(promotion.into_uuid())
        .bind(used_count)
        .execute(ctx.db.pool())
        .await?;

    Ok(())
}
