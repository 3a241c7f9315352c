//! Promotions Service

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rebate::{
    eligibility,
    promotions::{Promotion, PromotionStatus, ValidityWindow, status_on_write},
    slug::slugify,
};
use rusty_money::iso::Currency;
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::{
        products::records::{CategoryUuid, ProductUuid},
        promotions::{
            PromotionsServiceError,
            data::{NewPromotion, Page, PromotionFilter, PromotionUpdate},
            records::{PromotionRecord, PromotionUuid},
            repositories::{PgPromotionsRepository, PromotionWrite},
            validation::{ValidationError, validate},
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgPromotionsService {
    db: Db,
    currency: &'static Currency,
    promotions: PgPromotionsRepository,
}

impl PgPromotionsService {
    #[must_use]
    pub fn new(db: Db, currency: &'static Currency) -> Self {
        Self {
            db,
            currency,
            promotions: PgPromotionsRepository::new(),
        }
    }

    fn to_engine(
        &self,
        records: &[PromotionRecord],
    ) -> Result<Vec<Promotion<'static>>, PromotionsServiceError> {
        records
            .iter()
            .map(|record| record.to_engine(self.currency))
            .collect::<Result<_, _>>()
            .map_err(PromotionsServiceError::from)
    }
}

/// Slug and status to store for `promotion` at `now`.
fn prepare_write(
    promotion: &NewPromotion,
    now: Timestamp,
) -> Result<(String, PromotionStatus), ValidationError> {
    let slug = slugify(&promotion.name);

    validate(promotion, &slug)?;

    let window = ValidityWindow::new(promotion.starts_at, promotion.ends_at)
        .map_err(|_| ValidationError::InvalidWindow)?;

    Ok((slug, status_on_write(promotion.status, &window, now)))
}

/// Keep the records whose engine counterpart survived filtering.
fn retain_matching(records: Vec<PromotionRecord>, kept: &[&Promotion<'_>]) -> Vec<PromotionRecord> {
    records
        .into_iter()
        .filter(|record| {
            kept.iter()
                .any(|promotion| promotion.uuid == record.uuid.into_uuid())
        })
        .collect()
}

#[async_trait]
impl PromotionsService for PgPromotionsService {
    #[tracing::instrument(
        name = "promotions.service.create_promotion",
        skip(self, promotion),
        fields(
            promotion_uuid = %promotion.uuid,
            slug = tracing::field::Empty,
            status = tracing::field::Empty
        ),
        err
    )]
    async fn create_promotion(
        &self,
        promotion: NewPromotion,
    ) -> Result<PromotionRecord, PromotionsServiceError> {
        let (slug, status) = prepare_write(&promotion, Timestamp::now())?;

        let span = Span::current();

        span.record("slug", tracing::field::display(&slug));
        span.record("status", tracing::field::display(status.as_str()));

        let mut tx = self.db.begin().await?;

        let record = self
            .promotions
            .create_promotion(
                &mut tx,
                PromotionWrite {
                    promotion: &promotion,
                    slug: &slug,
                    status,
                },
            )
            .await?;

        tx.commit().await?;

        info!(promotion_uuid = %record.uuid, slug = %record.slug, "created promotion");

        Ok(record)
    }

    #[tracing::instrument(
        name = "promotions.service.get_promotion",
        skip(self),
        fields(promotion_uuid = %promotion),
        err
    )]
    async fn get_promotion(
        &self,
        promotion: PromotionUuid,
    ) -> Result<PromotionRecord, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.promotions.get_promotion(&mut tx, promotion).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(name = "promotions.service.get_promotion_by_slug", skip(self), err)]
    async fn get_promotion_by_slug(
        &self,
        slug: &str,
    ) -> Result<PromotionRecord, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.promotions.get_promotion_by_slug(&mut tx, slug).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "promotions.service.list_promotions",
        skip(self),
        fields(
            status = ?filter.status,
            page = filter.page,
            page_size = filter.page_size
        ),
        err
    )]
    async fn list_promotions(
        &self,
        filter: PromotionFilter,
    ) -> Result<Page<PromotionRecord>, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let (items, total) = self.promotions.list_promotions(&mut tx, filter).await?;

        tx.commit().await?;

        let (limit, _) = filter.limit_offset();

        Ok(Page {
            items,
            total,
            page: filter.page.max(1),
            page_size: u32::try_from(limit).unwrap_or(filter.page_size),
        })
    }

    #[tracing::instrument(
        name = "promotions.service.update_promotion",
        skip(self, update),
        fields(
            promotion_uuid = %promotion,
            slug = tracing::field::Empty,
            status = tracing::field::Empty
        ),
        err
    )]
    async fn update_promotion(
        &self,
        promotion: PromotionUuid,
        update: PromotionUpdate,
    ) -> Result<PromotionRecord, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.promotions.lock_promotion(&mut tx, promotion).await?;
        let merged = update.apply(&current);

        let (slug, status) = prepare_write(&merged, Timestamp::now())?;

        let span = Span::current();

        span.record("slug", tracing::field::display(&slug));
        span.record("status", tracing::field::display(status.as_str()));

        let record = self
            .promotions
            .update_promotion(
                &mut tx,
                PromotionWrite {
                    promotion: &merged,
                    slug: &slug,
                    status,
                },
            )
            .await?;

        tx.commit().await?;

        info!(
            promotion_uuid = %record.uuid,
            status = record.status.as_str(),
            "updated promotion"
        );

        Ok(record)
    }

    #[tracing::instrument(
        name = "promotions.service.delete_promotion",
        skip(self),
        fields(promotion_uuid = %promotion),
        err
    )]
    async fn delete_promotion(&self, promotion: PromotionUuid) -> Result<(), PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.promotions.delete_promotion(&mut tx, promotion).await?;

        if rows_affected == 0 {
            return Err(PromotionsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(promotion_uuid = %promotion, "deleted promotion");

        Ok(())
    }

    #[tracing::instrument(
        name = "promotions.service.find_applicable",
        skip(self),
        fields(product_uuid = %product, category_uuid = ?category, as_of = %as_of),
        err
    )]
    async fn find_applicable(
        &self,
        product: ProductUuid,
        category: Option<CategoryUuid>,
        as_of: Timestamp,
    ) -> Result<Vec<PromotionRecord>, PromotionsServiceError> {
        let categories: Vec<CategoryUuid> = category.into_iter().collect();

        let mut tx = self.db.begin().await?;

        let records = self
            .promotions
            .find_candidates(&mut tx, &[product], &categories, as_of)
            .await?;

        tx.commit().await?;

        let engine = self.to_engine(&records)?;
        let applicable = eligibility::find_applicable(
            &engine,
            product.into_uuid(),
            category.map(CategoryUuid::into_uuid),
            as_of,
        );

        Ok(retain_matching(records, &applicable))
    }

    #[tracing::instrument(
        name = "promotions.service.find_candidates",
        skip(self, products, categories),
        fields(
            product_count = products.len(),
            category_count = categories.len(),
            as_of = %as_of
        ),
        err
    )]
    async fn find_candidates(
        &self,
        products: &[ProductUuid],
        categories: &[CategoryUuid],
        as_of: Timestamp,
    ) -> Result<Vec<PromotionRecord>, PromotionsServiceError> {
        if products.is_empty() && categories.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.db.begin().await?;

        let records = self
            .promotions
            .find_candidates(&mut tx, products, categories, as_of)
            .await?;

        tx.commit().await?;

        Ok(records)
    }

    #[tracing::instrument(
        name = "promotions.service.category_promotion",
        skip(self),
        fields(category_uuid = %category, as_of = %as_of),
        err
    )]
    async fn category_promotion(
        &self,
        category: CategoryUuid,
        as_of: Timestamp,
    ) -> Result<Option<PromotionRecord>, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self
            .promotions
            .find_candidates(&mut tx, &[], &[category], as_of)
            .await?;

        tx.commit().await?;

        let engine = self.to_engine(&records)?;

        let found = eligibility::category_promotion(&engine, category.into_uuid(), as_of)
            .map(|promotion| promotion.uuid);

        Ok(found.and_then(|uuid| {
            records
                .into_iter()
                .find(|record| record.uuid.into_uuid() == uuid)
        }))
    }
}

#[automock]
#[async_trait]
pub trait PromotionsService: Send + Sync {
    /// Validate and store a new promotion.
    async fn create_promotion(
        &self,
        promotion: NewPromotion,
    ) -> Result<PromotionRecord, PromotionsServiceError>;

    async fn get_promotion(
        &self,
        promotion: PromotionUuid,
    ) -> Result<PromotionRecord, PromotionsServiceError>;

    async fn get_promotion_by_slug(
        &self,
        slug: &str,
    ) -> Result<PromotionRecord, PromotionsServiceError>;

    /// Newest first, optionally restricted to one stored status.
    async fn list_promotions(
        &self,
        filter: PromotionFilter,
    ) -> Result<Page<PromotionRecord>, PromotionsServiceError>;

    /// Merge `update` into the stored promotion, validate and store it.
    async fn update_promotion(
        &self,
        promotion: PromotionUuid,
        update: PromotionUpdate,
    ) -> Result<PromotionRecord, PromotionsServiceError>;

    async fn delete_promotion(&self, promotion: PromotionUuid) -> Result<(), PromotionsServiceError>;

    /// Promotions effectively active at `as_of` that target the product or
    /// its category. Each promotion appears once.
    async fn find_applicable(
        &self,
        product: ProductUuid,
        category: Option<CategoryUuid>,
        as_of: Timestamp,
    ) -> Result<Vec<PromotionRecord>, PromotionsServiceError>;

    /// Storage pre-filtered candidates for many products and categories.
    ///
    /// Callers re-check each candidate with the engine before applying it.
    async fn find_candidates(
        &self,
        products: &[ProductUuid],
        categories: &[CategoryUuid],
        as_of: Timestamp,
    ) -> Result<Vec<PromotionRecord>, PromotionsServiceError>;

    /// One promotion currently targeting `category`, if any.
    async fn category_promotion(
        &self,
        category: CategoryUuid,
        as_of: Timestamp,
    ) -> Result<Option<PromotionRecord>, PromotionsServiceError>;
}
