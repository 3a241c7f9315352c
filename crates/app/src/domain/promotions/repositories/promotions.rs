//! Promotions Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rebate::promotions::PromotionStatus;
use rust_decimal::Decimal;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar,
};
use uuid::Uuid;

use crate::{
    database::{
        try_i64_from_u64, try_optional_i64_from_u64, try_optional_u64_from_i64, try_u64_from_i64,
    },
    domain::{
        products::records::{CategoryUuid, ProductUuid},
        promotions::{
            data::{Banner, NewPromotion, PromotionFilter, SimpleDiscount},
            records::{PromotionRecord, PromotionUuid},
        },
    },
};

const COLUMN_MAX_DISCOUNT: &str = "max_discount_amount";
const COLUMN_USAGE_LIMIT: &str = "usage_limit";
const COLUMN_USED_COUNT: &str = "used_count";

const CREATE_PROMOTION_SQL: &str = include_str!("../sql/create_promotion.sql");
const GET_PROMOTION_SQL: &str = include_str!("../sql/get_promotion.sql");
const GET_PROMOTION_BY_SLUG_SQL: &str = include_str!("../sql/get_promotion_by_slug.sql");
const LOCK_PROMOTION_SQL: &str = include_str!("../sql/lock_promotion.sql");
const UPDATE_PROMOTION_SQL: &str = include_str!("../sql/update_promotion.sql");
const DELETE_PROMOTION_SQL: &str = include_str!("../sql/delete_promotion.sql");
const LIST_PROMOTIONS_SQL: &str = include_str!("../sql/list_promotions.sql");
const COUNT_PROMOTIONS_SQL: &str = include_str!("../sql/count_promotions.sql");
const FIND_CANDIDATES_SQL: &str = include_str!("../sql/find_candidates.sql");
const LIST_ACTIVE_PROMOTIONS_SQL: &str = include_str!("../sql/list_active_promotions.sql");
const SET_PROMOTION_STATUS_SQL: &str = include_str!("../sql/set_promotion_status.sql");
const INCREMENT_USAGE_SQL: &str = include_str!("../sql/increment_usage.sql");

/// A validated promotion together with its derived slug and status.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PromotionWrite<'p> {
    pub promotion: &'p NewPromotion,
    pub slug: &'p str,
    pub status: PromotionStatus,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPromotionsRepository;

impl PgPromotionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        write: PromotionWrite<'_>,
    ) -> Result<PromotionRecord, sqlx::Error> {
        bind_write(query_as::<Postgres, PromotionRecord>(CREATE_PROMOTION_SQL), write)?
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionUuid,
    ) -> Result<PromotionRecord, sqlx::Error> {
        query_as::<Postgres, PromotionRecord>(GET_PROMOTION_SQL)
            .bind(promotion.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_promotion_by_slug(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<PromotionRecord, sqlx::Error> {
        query_as::<Postgres, PromotionRecord>(GET_PROMOTION_BY_SLUG_SQL)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await
    }

    /// Read a promotion and hold its row lock until the transaction ends.
    pub(crate) async fn lock_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionUuid,
    ) -> Result<PromotionRecord, sqlx::Error> {
        query_as::<Postgres, PromotionRecord>(LOCK_PROMOTION_SQL)
            .bind(promotion.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        write: PromotionWrite<'_>,
    ) -> Result<PromotionRecord, sqlx::Error> {
        bind_write(query_as::<Postgres, PromotionRecord>(UPDATE_PROMOTION_SQL), write)?
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PROMOTION_SQL)
            .bind(promotion.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_promotions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: PromotionFilter,
    ) -> Result<(Vec<PromotionRecord>, u64), sqlx::Error> {
        let status = filter.status.map(|status| status.as_str());
        let (limit, offset) = filter.limit_offset();

        let items = query_as::<Postgres, PromotionRecord>(LIST_PROMOTIONS_SQL)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut **tx)
            .await?;

        let total: i64 = query_scalar(COUNT_PROMOTIONS_SQL)
            .bind(status)
            .fetch_one(&mut **tx)
            .await?;

        Ok((items, try_u64_from_i64(total, "count")?))
    }

    /// Active, in-window promotions below their usage limit that target any
    /// of the given products or categories.
    pub(crate) async fn find_candidates(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
        categories: &[CategoryUuid],
        as_of: Timestamp,
    ) -> Result<Vec<PromotionRecord>, sqlx::Error> {
        query_as::<Postgres, PromotionRecord>(FIND_CANDIDATES_SQL)
            .bind(ProductUuid::to_uuids(products))
            .bind(CategoryUuid::to_uuids(categories))
            .bind(SqlxTimestamp::from(as_of))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_active_promotions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<PromotionRecord>, sqlx::Error> {
        query_as::<Postgres, PromotionRecord>(LIST_ACTIVE_PROMOTIONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Expire or deactivate an active promotion, judged on the row as it is
    /// when written: `Expired` once its window closed before `as_of`,
    /// otherwise `Inactive` when it is at its usage limit.
    ///
    /// Returns `None` when the promotion no longer qualifies for either.
    pub(crate) async fn retire_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionUuid,
        as_of: Timestamp,
    ) -> Result<Option<PromotionRecord>, sqlx::Error> {
        query_as::<Postgres, PromotionRecord>(SET_PROMOTION_STATUS_SQL)
            .bind(promotion.into_uuid())
            .bind(SqlxTimestamp::from(as_of))
            .fetch_optional(&mut **tx)
            .await
    }

    /// Count one redemption, retiring the promotion when it hits its limit.
    ///
    /// Returns `None` when the promotion is not active or already at its limit.
    pub(crate) async fn increment_usage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionUuid,
    ) -> Result<Option<PromotionRecord>, sqlx::Error> {
        query_as::<Postgres, PromotionRecord>(INCREMENT_USAGE_SQL)
            .bind(promotion.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

type PromotionQuery<'q> =
    sqlx::query::QueryAs<'q, Postgres, PromotionRecord, sqlx::postgres::PgArguments>;

fn bind_write<'q>(
    query: PromotionQuery<'q>,
    write: PromotionWrite<'q>,
) -> Result<PromotionQuery<'q>, sqlx::Error> {
    let promotion = write.promotion;

    let discount_value = match promotion.discount {
        SimpleDiscount::PercentageOff { percentage } => percentage,
        SimpleDiscount::FixedAmountOff { amount } => {
            Decimal::from(try_i64_from_u64(amount, "discount_value")?)
        }
    };

    let max_discount = try_optional_i64_from_u64(promotion.max_discount, COLUMN_MAX_DISCOUNT)?;
    let usage_limit = try_optional_i64_from_u64(promotion.usage_limit, COLUMN_USAGE_LIMIT)?;

    Ok(query
        .bind(promotion.uuid.into_uuid())
        .bind(promotion.name.as_str())
        .bind(write.slug)
        .bind(promotion.description.as_str())
        .bind(promotion.banner.url.as_str())
        .bind(promotion.banner.public_id.as_str())
        .bind(promotion.discount.to_str())
        .bind(discount_value)
        .bind(max_discount)
        .bind(SqlxTimestamp::from(promotion.starts_at))
        .bind(SqlxTimestamp::from(promotion.ends_at))
        .bind(ProductUuid::to_uuids(&promotion.applicable_products))
        .bind(CategoryUuid::to_uuids(&promotion.applicable_categories))
        .bind(write.status.as_str())
        .bind(usage_limit))
}

impl<'r> FromRow<'r, PgRow> for PromotionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("discount_kind")?;
        let value: Decimal = row.try_get("discount_value")?;

        let discount =
            SimpleDiscount::from_parts(&kind, value).ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "discount_kind".to_string(),
                source: format!("unsupported discount {kind} {value}").into(),
            })?;

        let status: String = row.try_get("status")?;

        let status = PromotionStatus::parse(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: format!("unknown promotion status {status}").into(),
        })?;

        Ok(Self {
            uuid: PromotionUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            description: row.try_get("description")?,
            banner: Banner {
                url: row.try_get("banner_url")?,
                public_id: row.try_get("banner_public_id")?,
            },
            discount,
            max_discount: try_optional_u64_from_i64(
                row.try_get(COLUMN_MAX_DISCOUNT)?,
                COLUMN_MAX_DISCOUNT,
            )?,
            starts_at: row.try_get::<SqlxTimestamp, _>("starts_at")?.to_jiff(),
            ends_at: row.try_get::<SqlxTimestamp, _>("ends_at")?.to_jiff(),
            applicable_products: row
                .try_get::<Vec<Uuid>, _>("applicable_products")?
                .into_iter()
                .map(ProductUuid::from_uuid)
                .collect(),
            applicable_categories: row
                .try_get::<Vec<Uuid>, _>("applicable_categories")?
                .into_iter()
                .map(CategoryUuid::from_uuid)
                .collect(),
            status,
            usage_limit: try_optional_u64_from_i64(
                row.try_get(COLUMN_USAGE_LIMIT)?,
                COLUMN_USAGE_LIMIT,
            )?,
            used_count: try_u64_from_i64(row.try_get(COLUMN_USED_COUNT)?, COLUMN_USED_COUNT)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
