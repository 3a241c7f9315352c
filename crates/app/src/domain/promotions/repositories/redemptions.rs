//! Redemption Ledger Repository

use sqlx::{Postgres, Transaction, query};
use uuid::Uuid;

use crate::domain::promotions::records::PromotionUuid;

const INSERT_REDEMPTION_SQL: &str = include_str!("../sql/insert_redemption.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRedemptionsRepository;

impl PgRedemptionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Record that `order` redeemed `promotion`.
    ///
    /// Returns `false` when the pair was already recorded.
    pub(crate) async fn insert_redemption(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionUuid,
        order: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(INSERT_REDEMPTION_SQL)
            .bind(promotion.into_uuid())
            .bind(order)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }
}
