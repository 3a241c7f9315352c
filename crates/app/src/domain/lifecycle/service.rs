//! Lifecycle Service

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rusty_money::iso::Currency;
use tracing::{Span, info, warn};

use crate::{
    database::Db,
    domain::{
        lifecycle::LifecycleServiceError,
        promotions::{PgPromotionsRepository, records::PromotionRecord},
    },
};

#[derive(Debug, Clone)]
pub struct PgLifecycleService {
    db: Db,
    currency: &'static Currency,
    promotions: PgPromotionsRepository,
}

impl PgLifecycleService {
    #[must_use]
    pub fn new(db: Db, currency: &'static Currency) -> Self {
        Self {
            db,
            currency,
            promotions: PgPromotionsRepository::new(),
        }
    }
}

#[async_trait]
impl LifecycleService for PgLifecycleService {
    #[tracing::instrument(
        name = "lifecycle.service.sweep",
        skip(self),
        fields(as_of = %as_of, scanned = tracing::field::Empty, changed = tracing::field::Empty),
        err
    )]
    async fn sweep(&self, as_of: Timestamp) -> Result<Vec<PromotionRecord>, LifecycleServiceError> {
        let mut tx = self.db.begin().await?;

        let active = self.promotions.list_active_promotions(&mut tx).await?;

        let mut changed = Vec::new();

        for record in &active {
            let promotion = match record.to_engine(self.currency) {
                Ok(promotion) => promotion,
                Err(error) => {
                    warn!(promotion_uuid = %record.uuid, error = %error, "skipping malformed promotion");
                    continue;
                }
            };

            if promotion.sweep_transition(as_of).is_none() {
                continue;
            }

            if let Some(updated) = self
                .promotions
                .retire_promotion(&mut tx, record.uuid, as_of)
                .await?
            {
                info!(
                    promotion_uuid = %updated.uuid,
                    status = updated.status.as_str(),
                    "retired promotion"
                );

                changed.push(updated);
            }
        }

        tx.commit().await?;

        let span = Span::current();

        span.record("scanned", active.len());
        span.record("changed", changed.len());

        Ok(changed)
    }
}

#[automock]
#[async_trait]
pub trait LifecycleService: Send + Sync {
    /// Move active promotions past their end to `Expired` and those at their
    /// usage limit to `Inactive`. Returns the promotions that changed.
    async fn sweep(&self, as_of: Timestamp) -> Result<Vec<PromotionRecord>, LifecycleServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use rebate::promotions::PromotionStatus;
    use rusty_money::iso::VND;
    use testresult::TestResult;

    use crate::{
        domain::promotions::{PromotionsService, data::PromotionUpdate},
        test::{TestContext, helpers},
    };

    use super::*;

    #[tokio::test]
    async fn sweep_expires_ended_promotions() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .promotions
            .create_promotion(helpers::new_promotion("Weekend"))
            .await?;

        let changed = ctx
            .lifecycle
            .sweep(created.ends_at + SignedDuration::from_secs(1))
            .await?;

        assert_eq!(changed.len(), 1);
        assert_eq!(
            changed.first().map(|p| p.status),
            Some(PromotionStatus::Expired)
        );

        Ok(())
    }

    #[tokio::test]
    async fn sweep_deactivates_exhausted_promotions() -> TestResult {
        let ctx = TestContext::new().await;

        let mut promotion = helpers::new_promotion("Limited");
        promotion.usage_limit = Some(2);

        let created = ctx.promotions.create_promotion(promotion).await?;

        helpers::set_used_count(&ctx, created.uuid, 2).await?;

        let changed = ctx.lifecycle.sweep(Timestamp::now()).await?;

        assert_eq!(
            changed.iter().map(|p| (p.uuid, p.status)).collect::<Vec<_>>(),
            vec![(created.uuid, PromotionStatus::Inactive)]
        );

        Ok(())
    }

    #[tokio::test]
    async fn sweep_prefers_expiry_when_both_apply() -> TestResult {
        let ctx = TestContext::new().await;

        let mut promotion = helpers::new_promotion("Both");
        promotion.usage_limit = Some(1);

        let created = ctx.promotions.create_promotion(promotion).await?;

        helpers::set_used_count(&ctx, created.uuid, 1).await?;

        let changed = ctx
            .lifecycle
            .sweep(created.ends_at + SignedDuration::from_secs(1))
            .await?;

        assert_eq!(
            changed.first().map(|p| p.status),
            Some(PromotionStatus::Expired)
        );

        Ok(())
    }

    #[tokio::test]
    async fn sweep_is_idempotent() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .promotions
            .create_promotion(helpers::new_promotion("Twice"))
            .await?;

        let as_of = created.ends_at + SignedDuration::from_hours(1);

        assert_eq!(ctx.lifecycle.sweep(as_of).await?.len(), 1);
        assert!(ctx.lifecycle.sweep(as_of).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn retire_rechecks_window_edited_after_read() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .promotions
            .create_promotion(helpers::new_promotion("Extended"))
            .await?;

        let as_of = created.ends_at + SignedDuration::from_secs(1);

        let mut tx = ctx.db.pool().begin().await?;
        let stale = PgPromotionsRepository::new()
            .list_active_promotions(&mut tx)
            .await?;
        tx.commit().await?;

        let stale = stale
            .into_iter()
            .find(|record| record.uuid == created.uuid)
            .ok_or("promotion should be listed as active")?;

        assert_eq!(
            stale.to_engine(VND)?.sweep_transition(as_of),
            Some(PromotionStatus::Expired)
        );

        ctx.promotions
            .update_promotion(
                created.uuid,
                PromotionUpdate {
                    ends_at: Some(as_of + SignedDuration::from_hours(24 * 7)),
                    ..PromotionUpdate::default()
                },
            )
            .await?;

        let mut tx = ctx.db.pool().begin().await?;
        let retired = PgPromotionsRepository::new()
            .retire_promotion(&mut tx, created.uuid, as_of)
            .await?;
        tx.commit().await?;

        assert!(retired.is_none());
        assert_eq!(
            ctx.promotions.get_promotion(created.uuid).await?.status,
            PromotionStatus::Active
        );

        Ok(())
    }

    #[tokio::test]
    async fn retire_rechecks_usage_limit_raised_after_read() -> TestResult {
        let ctx = TestContext::new().await;

        let mut promotion = helpers::new_promotion("Raised");
        promotion.usage_limit = Some(1);

        let created = ctx.promotions.create_promotion(promotion).await?;

        helpers::set_used_count(&ctx, created.uuid, 1).await?;

        ctx.promotions
            .update_promotion(
                created.uuid,
                PromotionUpdate {
                    usage_limit: Some(Some(10)),
                    ..PromotionUpdate::default()
                },
            )
            .await?;

        let mut tx = ctx.db.pool().begin().await?;
        let retired = PgPromotionsRepository::new()
            .retire_promotion(&mut tx, created.uuid, Timestamp::now())
            .await?;
        tx.commit().await?;

        assert!(retired.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn sweep_leaves_inactive_and_live_promotions_alone() -> TestResult {
        let ctx = TestContext::new().await;

        let mut paused = helpers::new_promotion("Paused");
        paused.status = PromotionStatus::Inactive;

        let paused = ctx.promotions.create_promotion(paused).await?;
        let live = ctx
            .promotions
            .create_promotion(helpers::new_promotion("Live"))
            .await?;

        assert!(ctx.lifecycle.sweep(Timestamp::now()).await?.is_empty());
        assert_eq!(
            ctx.promotions.get_promotion(paused.uuid).await?.status,
            PromotionStatus::Inactive
        );
        assert_eq!(
            ctx.promotions.get_promotion(live.uuid).await?.status,
            PromotionStatus::Active
        );

        Ok(())
    }
}
