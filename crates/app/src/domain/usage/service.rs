//! Usage Service

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rebate::usage::{OrderLine, promotions_to_charge};
use rusty_money::Money;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{Span, info, warn};
use uuid::Uuid;

use crate::{
    database::{Db, retry_on_conflict},
    domain::{
        products::{
            ProductsService,
            records::{CategoryUuid, ProductUuid},
        },
        promotions::{
            PgPromotionsRepository, PgRedemptionsRepository, PromotionsService,
            records::{PromotionRecord, PromotionUuid},
        },
        usage::{
            UsageServiceError,
            data::{
                CompletedOrder, SkipReason, SkippedPromotion, UsageFailure, UsageReport,
                UsageSettings,
            },
        },
    },
};

/// Result of charging a single promotion.
#[derive(Debug)]
enum Charge {
    Updated(PromotionRecord),
    Skipped(SkipReason),
}

#[derive(Clone)]
pub struct PgUsageService {
    db: Db,
    products: Arc<dyn ProductsService>,
    promotions: Arc<dyn PromotionsService>,
    promotions_repository: PgPromotionsRepository,
    redemptions: PgRedemptionsRepository,
    settings: UsageSettings,
}

impl PgUsageService {
    #[must_use]
    pub fn new(
        db: Db,
        products: Arc<dyn ProductsService>,
        promotions: Arc<dyn PromotionsService>,
        settings: UsageSettings,
    ) -> Self {
        Self {
            db,
            products,
            promotions,
            promotions_repository: PgPromotionsRepository::new(),
            redemptions: PgRedemptionsRepository::new(),
            settings,
        }
    }

    /// Promotions the order consumes, per the configured policy.
    async fn select_promotions(
        &self,
        order: &CompletedOrder,
        now: Timestamp,
    ) -> Result<Vec<PromotionUuid>, UsageServiceError> {
        let product_ids: Vec<ProductUuid> = order
            .items
            .iter()
            .map(|item| item.product_uuid)
            .collect::<FxHashSet<_>>()
            .into_iter()
            .collect();

        let products = self.products.get_products(&product_ids).await?;

        let categories: FxHashMap<ProductUuid, Option<CategoryUuid>> = products
            .iter()
            .map(|product| (product.uuid, product.category_uuid))
            .collect();

        if let Some(missing) = product_ids.iter().find(|id| !categories.contains_key(*id)) {
            return Err(UsageServiceError::ProductNotFound(*missing));
        }

        let category_ids: Vec<CategoryUuid> = categories
            .values()
            .flatten()
            .copied()
            .collect::<FxHashSet<_>>()
            .into_iter()
            .collect();

        let records = self
            .promotions
            .find_candidates(&product_ids, &category_ids, now)
            .await?;

        let engine = records
            .iter()
            .map(|record| record.to_engine(self.settings.currency))
            .collect::<Result<Vec<_>, _>>()?;

        let lines = order
            .items
            .iter()
            .map(|item| -> Result<OrderLine<'static>, UsageServiceError> {
                let unit_price = i64::try_from(item.unit_price)
                    .map_err(|_| UsageServiceError::PriceOutOfRange)?;

                Ok(OrderLine {
                    product: item.product_uuid.into_uuid(),
                    category: categories
                        .get(&item.product_uuid)
                        .copied()
                        .flatten()
                        .map(CategoryUuid::into_uuid),
                    quantity: item.quantity,
                    unit_price: Money::from_minor(unit_price, self.settings.currency),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let charged = promotions_to_charge(&lines, &engine, now, self.settings.policy)?;

        Ok(charged
            .into_iter()
            .map(|promotion| PromotionUuid::from_uuid(promotion.uuid))
            .collect())
    }

    /// Record `order` against `promotion` in its own transaction.
    async fn charge_once(
        &self,
        promotion: PromotionUuid,
        order: Uuid,
    ) -> Result<Charge, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        if !self
            .redemptions
            .insert_redemption(&mut tx, promotion, order)
            .await?
        {
            tx.rollback().await?;

            return Ok(Charge::Skipped(SkipReason::AlreadyRecorded));
        }

        match self
            .promotions_repository
            .increment_usage(&mut tx, promotion)
            .await?
        {
            Some(record) => {
                tx.commit().await?;

                Ok(Charge::Updated(record))
            }
            None => {
                tx.rollback().await?;

                Ok(Charge::Skipped(SkipReason::NoLongerActive))
            }
        }
    }

    /// [`Self::charge_once`], retried while it loses serialization races.
    #[tracing::instrument(
        name = "usage.service.charge",
        skip_all,
        fields(promotion_uuid = %promotion, order_uuid = %order)
    )]
    async fn charge(
        &self,
        promotion: PromotionUuid,
        order: Uuid,
    ) -> Result<Charge, UsageServiceError> {
        Ok(retry_on_conflict(self.settings.max_attempts, |_| {
            self.charge_once(promotion, order)
        })
        .await?)
    }
}

#[async_trait]
impl UsageService for PgUsageService {
    #[tracing::instrument(
        name = "usage.service.record_usage",
        skip(self, order),
        fields(
            order_uuid = %order.order_uuid,
            item_count = order.items.len(),
            policy = ?self.settings.policy,
            charged = tracing::field::Empty
        ),
        err
    )]
    async fn record_usage(&self, order: CompletedOrder) -> Result<UsageReport, UsageServiceError> {
        let promotions = self.select_promotions(&order, Timestamp::now()).await?;

        Span::current().record("charged", promotions.len());

        let mut report = UsageReport::default();

        for promotion in promotions {
            match self.charge(promotion, order.order_uuid).await {
                Ok(Charge::Updated(record)) => {
                    info!(
                        promotion_uuid = %record.uuid,
                        used_count = record.used_count,
                        status = record.status.as_str(),
                        "recorded promotion usage"
                    );

                    report.updated.push(record);
                }
                Ok(Charge::Skipped(reason)) => {
                    warn!(promotion_uuid = %promotion, ?reason, "skipped promotion usage");

                    report.skipped.push(SkippedPromotion {
                        promotion_uuid: promotion,
                        reason,
                    });
                }
                Err(error) => {
                    warn!(promotion_uuid = %promotion, error = %error, "failed to record promotion usage");

                    report.failures.push(UsageFailure {
                        promotion_uuid: promotion,
                        reason: error.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}

#[automock]
#[async_trait]
pub trait UsageService: Send + Sync {
    /// Count one redemption of every promotion `order` consumed.
    ///
    /// A failure on one promotion is reported and does not stop the others.
    async fn record_usage(&self, order: CompletedOrder) -> Result<UsageReport, UsageServiceError>;
}
