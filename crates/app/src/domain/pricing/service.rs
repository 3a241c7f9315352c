//! Pricing Service

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rebate::{
    eligibility::find_applicable,
    pricing::best_discount,
    promotions::{Promotion, PromotionError},
};
use rusty_money::{Money, iso::Currency};
use rustc_hash::FxHashSet;

use crate::domain::{
    pricing::{
        PricingServiceError,
        models::{AppliedPromotion, PricedCategory, PricedProduct, PromotionInfo},
    },
    products::{
        ProductsService, ProductsServiceError,
        records::{CategoryUuid, ProductRecord, ProductUuid},
    },
    promotions::{
        PromotionsService,
        records::{PromotionRecord, PromotionUuid},
    },
};

#[derive(Clone)]
pub struct CatalogPricingService {
    products: Arc<dyn ProductsService>,
    promotions: Arc<dyn PromotionsService>,
    currency: &'static Currency,
}

impl CatalogPricingService {
    #[must_use]
    pub fn new(
        products: Arc<dyn ProductsService>,
        promotions: Arc<dyn PromotionsService>,
        currency: &'static Currency,
    ) -> Self {
        Self {
            products,
            promotions,
            currency,
        }
    }

    async fn price_records(
        &self,
        products: Vec<ProductRecord>,
        as_of: Timestamp,
    ) -> Result<Vec<PricedProduct>, PricingServiceError> {
        let product_ids: Vec<ProductUuid> = products.iter().map(|product| product.uuid).collect();

        let category_ids: Vec<CategoryUuid> = products
            .iter()
            .filter_map(|product| product.category_uuid)
            .collect::<FxHashSet<_>>()
            .into_iter()
            .collect();

        let records = self
            .promotions
            .find_candidates(&product_ids, &category_ids, as_of)
            .await?;

        let engine = records
            .iter()
            .map(|record| record.to_engine(self.currency))
            .collect::<Result<Vec<_>, PromotionError>>()?;

        products
            .into_iter()
            .map(|product| price_one(product, &records, &engine, self.currency, as_of))
            .collect()
    }
}

fn price_one(
    product: ProductRecord,
    records: &[PromotionRecord],
    engine: &[Promotion<'static>],
    currency: &'static Currency,
    as_of: Timestamp,
) -> Result<PricedProduct, PricingServiceError> {
    let price = i64::try_from(product.price).map_err(|_| PricingServiceError::PriceOutOfRange)?;

    let applicable = find_applicable(
        engine,
        product.uuid.into_uuid(),
        product.category_uuid.map(CategoryUuid::into_uuid),
        as_of,
    );

    let promotion = match best_discount(Money::from_minor(price, currency), applicable)? {
        Some(best) => {
            let final_price = u64::try_from(best.final_price.to_minor_units())
                .map_err(|_| PricingServiceError::PriceOutOfRange)?;

            records
                .iter()
                .find(|record| record.uuid.into_uuid() == best.promotion.uuid)
                .map(|record| AppliedPromotion {
                    final_price,
                    promotion_info: PromotionInfo::from(record),
                })
        }
        None => None,
    };

    Ok(PricedProduct {
        is_promotion: promotion.is_some(),
        promotion,
        product,
    })
}

#[async_trait]
impl PricingService for CatalogPricingService {
    #[tracing::instrument(
        name = "pricing.service.price_product",
        skip(self),
        fields(product_uuid = %product, as_of = %as_of),
        err
    )]
    async fn price_product(
        &self,
        product: ProductUuid,
        as_of: Timestamp,
    ) -> Result<PricedProduct, PricingServiceError> {
        let product = self.products.get_product(product).await?;

        let mut priced = self.price_records(vec![product], as_of).await?;

        priced
            .pop()
            .ok_or(PricingServiceError::Products(ProductsServiceError::NotFound))
    }

    #[tracing::instrument(
        name = "pricing.service.price_products",
        skip(self),
        fields(category_uuid = ?category, as_of = %as_of),
        err
    )]
    async fn price_products(
        &self,
        category: Option<CategoryUuid>,
        as_of: Timestamp,
    ) -> Result<Vec<PricedProduct>, PricingServiceError> {
        let products = self.products.list_products(category).await?;

        self.price_records(products, as_of).await
    }

    #[tracing::instrument(
        name = "pricing.service.price_category",
        skip(self),
        fields(category_uuid = %category, as_of = %as_of),
        err
    )]
    async fn price_category(
        &self,
        category: CategoryUuid,
        as_of: Timestamp,
    ) -> Result<PricedCategory, PricingServiceError> {
        let record = self.products.get_category(category).await?;

        let promotion = self
            .promotions
            .category_promotion(category, as_of)
            .await?
            .as_ref()
            .map(PromotionInfo::from);

        Ok(PricedCategory {
            category: record,
            is_promotion: promotion.is_some(),
            promotion,
        })
    }

    #[tracing::instrument(
        name = "pricing.service.price_promotion_products",
        skip(self),
        fields(promotion_uuid = %promotion, as_of = %as_of),
        err
    )]
    async fn price_promotion_products(
        &self,
        promotion: PromotionUuid,
        as_of: Timestamp,
    ) -> Result<Vec<PricedProduct>, PricingServiceError> {
        let products = self.products.list_promotion_products(promotion).await?;

        self.price_records(products, as_of).await
    }
}

#[automock]
#[async_trait]
pub trait PricingService: Send + Sync {
    /// A single product with its best promotion at `as_of`.
    async fn price_product(
        &self,
        product: ProductUuid,
        as_of: Timestamp,
    ) -> Result<PricedProduct, PricingServiceError>;

    /// Every product, or those of one category, priced at `as_of`.
    async fn price_products(
        &self,
        category: Option<CategoryUuid>,
        as_of: Timestamp,
    ) -> Result<Vec<PricedProduct>, PricingServiceError>;

    /// A category flagged with a promotion targeting it at `as_of`.
    async fn price_category(
        &self,
        category: CategoryUuid,
        as_of: Timestamp,
    ) -> Result<PricedCategory, PricingServiceError>;

    /// Products targeted by a promotion, each priced at `as_of`.
    async fn price_promotion_products(
        &self,
        promotion: PromotionUuid,
        as_of: Timestamp,
    ) -> Result<Vec<PricedProduct>, PricingServiceError>;
}
