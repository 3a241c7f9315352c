//! Pricing
//!
//! Picks the promotion giving the lowest price for a single product price.

use rusty_money::{Money, iso::Currency};

use crate::{discounts::DiscountError, promotions::Promotion};

/// Winning promotion for a price.
#[derive(Debug, Clone)]
pub struct BestDiscount<'p, 'a> {
    /// Price after the winning promotion.
    pub final_price: Money<'a, Currency>,

    /// The promotion that produced `final_price`.
    pub promotion: &'p Promotion<'a>,
}

/// Compute the lowest price `candidates` can produce for `original`.
///
/// Returns `None` when no candidate lowers the price. When several candidates
/// produce the same lowest price the first one wins.
///
/// # Errors
///
/// Returns a [`DiscountError`] if any candidate cannot be evaluated.
pub fn best_discount<'p, 'a>(
    original: Money<'a, Currency>,
    candidates: impl IntoIterator<Item = &'p Promotion<'a>>,
) -> Result<Option<BestDiscount<'p, 'a>>, DiscountError>
where
    'a: 'p,
{
    let mut best: Option<BestDiscount<'p, 'a>> = None;

    for promotion in candidates {
        let final_price = promotion.discounted_price(original)?;
        let minor = final_price.to_minor_units();

        let lowest = best
            .as_ref()
            .map_or(original.to_minor_units(), |best| {
                best.final_price.to_minor_units()
            });

        if minor < lowest {
            best = Some(BestDiscount {
                final_price,
                promotion,
            });
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use rust_decimal::Decimal;
    use rusty_money::iso::VND;
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        discounts::SimpleDiscount,
        promotions::{PromotionStatus, PromotionTargets, UsageBudget, ValidityWindow},
    };

    use super::*;

    fn promotion(discount: SimpleDiscount<'static>) -> TestResult<Promotion<'static>> {
        let start = Timestamp::UNIX_EPOCH;

        Ok(Promotion {
            uuid: Uuid::now_v7(),
            discount,
            max_discount: None,
            window: ValidityWindow::new(start, start + SignedDuration::from_hours(1))?,
            targets: PromotionTargets::default(),
            status: PromotionStatus::Active,
            budget: UsageBudget::unlimited(),
        })
    }

    #[test]
    fn lowest_price_wins() -> TestResult {
        let ten = promotion(SimpleDiscount::percentage_off(Decimal::from(10))?)?;
        let fixed = promotion(SimpleDiscount::AmountOff(Money::from_minor(25_000, VND)))?;
        let twenty = promotion(SimpleDiscount::percentage_off(Decimal::from(20))?)?;
        let candidates = [ten, fixed, twenty];

        let best = best_discount(Money::from_minor(100_000, VND), &candidates)?;
        let best = best.ok_or("expected a winning promotion")?;

        assert_eq!(best.final_price.to_minor_units(), 75_000);
        assert_eq!(best.promotion.discount.kind_as_str(), "FIXED_AMOUNT");

        Ok(())
    }

    #[test]
    fn no_candidates_gives_none() -> TestResult {
        let candidates: [Promotion<'static>; 0] = [];

        assert!(best_discount(Money::from_minor(100, VND), &candidates)?.is_none());

        Ok(())
    }

    #[test]
    fn zero_discount_gives_none() -> TestResult {
        let candidates = [promotion(SimpleDiscount::percentage_off(Decimal::ZERO)?)?];

        assert!(best_discount(Money::from_minor(100_000, VND), &candidates)?.is_none());

        Ok(())
    }

    #[test]
    fn first_seen_wins_ties() -> TestResult {
        let first = promotion(SimpleDiscount::percentage_off(Decimal::from(50))?)?;
        let second = promotion(SimpleDiscount::AmountOff(Money::from_minor(500, VND)))?;
        let first_uuid = first.uuid;
        let candidates = [first, second];

        let best = best_discount(Money::from_minor(1_000, VND), &candidates)?
            .ok_or("expected a winning promotion")?;

        assert_eq!(best.promotion.uuid, first_uuid);

        Ok(())
    }
}
