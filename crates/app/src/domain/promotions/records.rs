//! Promotions Records

use jiff::Timestamp;
use rebate::{
    discounts::SimpleDiscount as EngineDiscount,
    promotions::{
        Promotion, PromotionError, PromotionStatus, PromotionTargets, UsageBudget, ValidityWindow,
    },
};
use rusty_money::{Money, iso::Currency};
use serde::Serialize;

use crate::{
    domain::{
        products::records::{CategoryUuid, ProductUuid},
        promotions::data::{Banner, SimpleDiscount},
    },
    uuids::TypedUuid,
};

/// Promotion UUID
pub type PromotionUuid = TypedUuid<PromotionRecord>;

/// Promotion Record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionRecord {
    pub uuid: PromotionUuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub banner: Banner,
    pub discount: SimpleDiscount,
    pub max_discount: Option<u64>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub applicable_products: Vec<ProductUuid>,
    pub applicable_categories: Vec<CategoryUuid>,
    pub status: PromotionStatus,
    pub usage_limit: Option<u64>,
    pub used_count: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PromotionRecord {
    /// Build the engine view of this promotion, priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionError`] when the stored values cannot form a valid
    /// engine promotion.
    pub fn to_engine(
        &self,
        currency: &'static Currency,
    ) -> Result<Promotion<'static>, PromotionError> {
        let discount = match self.discount {
            SimpleDiscount::PercentageOff { percentage } => {
                EngineDiscount::percentage_off(percentage)?
            }
            SimpleDiscount::FixedAmountOff { amount } => {
                EngineDiscount::AmountOff(money(amount, currency)?)
            }
        };

        let max_discount = self
            .max_discount
            .map(|cap| money(cap, currency))
            .transpose()?;

        let budget = match self.usage_limit {
            Some(limit) => UsageBudget::with_limit(limit),
            None => UsageBudget::unlimited(),
        }
        .used(self.used_count);

        Ok(Promotion {
            uuid: self.uuid.into_uuid(),
            discount,
            max_discount,
            window: ValidityWindow::new(self.starts_at, self.ends_at)?,
            targets: PromotionTargets::new(
                ProductUuid::to_uuids(&self.applicable_products),
                CategoryUuid::to_uuids(&self.applicable_categories),
            ),
            status: self.status,
            budget,
        })
    }
}

fn money(minor: u64, currency: &'static Currency) -> Result<Money<'static, Currency>, PromotionError> {
    let minor = i64::try_from(minor).map_err(|_| PromotionError::AmountOverflow)?;

    Ok(Money::from_minor(minor, currency))
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use rust_decimal::Decimal;
    use rusty_money::iso::VND;
    use testresult::TestResult;

    use super::*;

    fn record(discount: SimpleDiscount) -> PromotionRecord {
        let starts_at = Timestamp::UNIX_EPOCH;

        PromotionRecord {
            uuid: PromotionUuid::new(),
            name: "Summer Sale".to_string(),
            slug: "summer-sale".to_string(),
            description: "Hot deals".to_string(),
            banner: Banner {
                url: "https://cdn.example.com/summer.png".to_string(),
                public_id: "summer".to_string(),
            },
            discount,
            max_discount: Some(10_000),
            starts_at,
            ends_at: starts_at + SignedDuration::from_hours(24),
            applicable_products: vec![ProductUuid::new()],
            applicable_categories: Vec::new(),
            status: PromotionStatus::Active,
            usage_limit: Some(5),
            used_count: 2,
            created_at: starts_at,
            updated_at: starts_at,
        }
    }

    #[test]
    fn to_engine_carries_budget_and_cap() -> TestResult {
        let record = record(SimpleDiscount::FixedAmountOff { amount: 30_000 });
        let promotion = record.to_engine(VND)?;

        assert_eq!(promotion.uuid, record.uuid.into_uuid());
        assert_eq!(promotion.budget.remaining(), Some(3));
        assert_eq!(
            promotion.max_discount.map(|cap| cap.to_minor_units()),
            Some(10_000)
        );

        let price = promotion.discounted_price(Money::from_minor(100_000, VND))?;

        assert_eq!(price.to_minor_units(), 90_000);

        Ok(())
    }

    #[test]
    fn to_engine_rejects_out_of_range_percentage() {
        let record = record(SimpleDiscount::PercentageOff {
            percentage: Decimal::from(150),
        });

        assert!(matches!(
            record.to_engine(VND),
            Err(PromotionError::InvalidPercentage)
        ));
    }

    #[test]
    fn to_engine_rejects_amount_overflow() {
        let record = record(SimpleDiscount::FixedAmountOff { amount: u64::MAX });

        assert!(matches!(
            record.to_engine(VND),
            Err(PromotionError::AmountOverflow)
        ));
    }
}
