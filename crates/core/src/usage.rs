//! Usage selection
//!
//! Decides which promotions a completed order consumes. Persisting the
//! increments is the caller's job.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    discounts::DiscountError, eligibility::find_applicable, pricing::best_discount,
    promotions::Promotion,
};

/// Which matching promotions an order is charged for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UsagePolicy {
    /// Every promotion whose scope a purchased product falls into.
    #[default]
    AllMatching,

    /// Only the promotion that would price each line lowest.
    WinningOnly,
}

/// A purchased line, resolved against the catalog.
#[derive(Debug, Clone)]
pub struct OrderLine<'a> {
    /// Purchased product.
    pub product: Uuid,

    /// Category of the product, if any.
    pub category: Option<Uuid>,

    /// Purchased quantity.
    pub quantity: u32,

    /// Price paid per unit.
    pub unit_price: Money<'a, Currency>,
}

/// Promotions to charge one redemption each for `lines`.
///
/// Lines with zero quantity are ignored. Each promotion appears at most once,
/// in first-matched order.
///
/// # Errors
///
/// Returns a [`DiscountError`] if [`UsagePolicy::WinningOnly`] cannot price a line.
pub fn promotions_to_charge<'p, 'a>(
    lines: &[OrderLine<'a>],
    promotions: &'p [Promotion<'a>],
    now: Timestamp,
    policy: UsagePolicy,
) -> Result<Vec<&'p Promotion<'a>>, DiscountError> {
    let mut seen = FxHashSet::default();
    let mut charged = Vec::new();

    for line in lines.iter().filter(|line| line.quantity > 0) {
        let applicable = find_applicable(promotions, line.product, line.category, now);

        match policy {
            UsagePolicy::AllMatching => {
                charged.extend(
                    applicable
                        .into_iter()
                        .filter(|promotion| seen.insert(promotion.uuid)),
                );
            }
            UsagePolicy::WinningOnly => {
                if let Some(best) = best_discount(line.unit_price, applicable)?
                    && seen.insert(best.promotion.uuid)
                {
                    charged.push(best.promotion);
                }
            }
        }
    }

    Ok(charged)
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use rust_decimal::Decimal;
    use rusty_money::iso::VND;
    use testresult::TestResult;

    use crate::{
        discounts::SimpleDiscount,
        promotions::{PromotionStatus, PromotionTargets, UsageBudget, ValidityWindow},
    };

    use super::*;

    fn promotion(percent: i64, targets: PromotionTargets) -> TestResult<Promotion<'static>> {
        let start = Timestamp::UNIX_EPOCH;

        Ok(Promotion {
            uuid: Uuid::now_v7(),
            discount: SimpleDiscount::percentage_off(Decimal::from(percent))?,
            max_discount: None,
            window: ValidityWindow::new(start, start + SignedDuration::from_hours(24))?,
            targets,
            status: PromotionStatus::Active,
            budget: UsageBudget::unlimited(),
        })
    }

    fn line(product: Uuid, category: Option<Uuid>, quantity: u32) -> OrderLine<'static> {
        OrderLine {
            product,
            category,
            quantity,
            unit_price: Money::from_minor(100_000, VND),
        }
    }

    #[test]
    fn all_matching_charges_each_promotion_once() -> TestResult {
        let shoes = Uuid::now_v7();
        let boots = Uuid::now_v7();
        let footwear = Uuid::now_v7();

        let by_category = promotion(10, PromotionTargets::categories([footwear]))?;
        let by_product = promotion(20, PromotionTargets::products([shoes]))?;
        let now = by_category.window.starts_at();
        let promotions = [by_category, by_product];

        let lines = [
            line(shoes, Some(footwear), 2),
            line(boots, Some(footwear), 1),
        ];

        let charged = promotions_to_charge(&lines, &promotions, now, UsagePolicy::AllMatching)?;

        assert_eq!(charged.len(), 2);

        Ok(())
    }

    #[test]
    fn winning_only_charges_the_best_promotion_per_line() -> TestResult {
        let shoes = Uuid::now_v7();
        let footwear = Uuid::now_v7();

        let small = promotion(10, PromotionTargets::categories([footwear]))?;
        let large = promotion(30, PromotionTargets::products([shoes]))?;
        let large_uuid = large.uuid;
        let now = small.window.starts_at();
        let promotions = [small, large];

        let lines = [line(shoes, Some(footwear), 1)];

        let charged = promotions_to_charge(&lines, &promotions, now, UsagePolicy::WinningOnly)?;

        assert_eq!(charged.len(), 1);
        assert_eq!(charged.first().map(|p| p.uuid), Some(large_uuid));

        Ok(())
    }

    #[test]
    fn exhausted_promotions_and_empty_lines_are_not_charged() -> TestResult {
        let product = Uuid::now_v7();

        let mut exhausted = promotion(10, PromotionTargets::products([product]))?;
        exhausted.budget = UsageBudget::with_limit(1).used(1);

        let other = Uuid::now_v7();
        let live = promotion(10, PromotionTargets::products([other]))?;

        let now = live.window.starts_at();
        let promotions = [exhausted, live];
        let lines = [line(product, None, 1), line(other, None, 0)];

        let charged = promotions_to_charge(&lines, &promotions, now, UsagePolicy::AllMatching)?;

        assert!(charged.is_empty());

        Ok(())
    }
}
