//! Discount utilities
//!
//! Money arithmetic shared by the discount calculator and the usage selection.
//! All amounts are integer minor units; intermediate values are kept in
//! [`Decimal`] so percentage discounts are only rounded once, after clamping.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// The price and the discount amount are in different currencies.
    #[error("currency mismatch: price is {price}, discount is {discount}")]
    CurrencyMismatch {
        /// Currency of the price being discounted.
        price: &'static str,

        /// Currency of the discount amount or cap.
        discount: &'static str,
    },

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// Discount configuration for a promotion.
#[derive(Debug, Copy, Clone)]
pub enum SimpleDiscount<'a> {
    /// Apply a percentage discount (e.g., "25% off")
    PercentageOff(Percentage),

    /// Subtract a fixed amount from the price (e.g., "30 000 off")
    AmountOff(Money<'a, Currency>),
}

impl SimpleDiscount<'_> {
    /// Short label for the discount kind.
    pub const fn kind_as_str(&self) -> &'static str {
        match self {
            Self::PercentageOff(_) => "PERCENTAGE",
            Self::AmountOff(_) => "FIXED_AMOUNT",
        }
    }
}

/// Calculate the discounted price of `original` in minor units.
///
/// The discount is applied, the granted amount is clamped to `cap`, the result
/// is floored at zero and finally rounded to the nearest minor unit.
///
/// # Errors
///
/// - [`DiscountError::CurrencyMismatch`]: the fixed amount or cap is not in the
///   currency of `original`.
/// - [`DiscountError::PercentConversion`]: the arithmetic overflowed.
pub fn discounted_price<'a>(
    original: Money<'a, Currency>,
    discount: &SimpleDiscount<'a>,
    cap: Option<&Money<'a, Currency>>,
) -> Result<Money<'a, Currency>, DiscountError> {
    let original_minor = Decimal::from(original.to_minor_units());

    let mut discounted = match discount {
        SimpleDiscount::PercentageOff(pct) => {
            let fraction = (*pct) * Decimal::ONE;

            original_minor
                .checked_mul(Decimal::ONE - fraction)
                .ok_or(DiscountError::PercentConversion)?
        }
        SimpleDiscount::AmountOff(amount) => {
            ensure_same_currency(&original, amount)?;

            original_minor
                .checked_sub(Decimal::from(amount.to_minor_units()))
                .ok_or(DiscountError::PercentConversion)?
        }
    };

    if let Some(cap) = cap {
        ensure_same_currency(&original, cap)?;

        let cap_minor = Decimal::from(cap.to_minor_units());

        if original_minor - discounted > cap_minor {
            discounted = original_minor - cap_minor;
        }
    }

    let minor = discounted
        .max(Decimal::ZERO)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)?;

    Ok(Money::from_minor(minor, original.currency()))
}

fn ensure_same_currency(
    price: &Money<'_, Currency>,
    other: &Money<'_, Currency>,
) -> Result<(), DiscountError> {
    let price = price.currency().iso_alpha_code;
    let discount = other.currency().iso_alpha_code;

    if price == discount {
        Ok(())
    } else {
        Err(DiscountError::CurrencyMismatch { price, discount })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::{USD, VND};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percentage_off_reduces_price() -> TestResult {
        let discount = SimpleDiscount::PercentageOff(Percentage::from(0.2));
        let result = discounted_price(Money::from_minor(100_000, VND), &discount, None)?;

        assert_eq!(result, Money::from_minor(80_000, VND));

        Ok(())
    }

    #[test]
    fn amount_off_is_capped() -> TestResult {
        let discount = SimpleDiscount::AmountOff(Money::from_minor(30_000, VND));
        let cap = Money::from_minor(10_000, VND);
        let result = discounted_price(Money::from_minor(100_000, VND), &discount, Some(&cap))?;

        assert_eq!(result, Money::from_minor(90_000, VND));

        Ok(())
    }

    #[test]
    fn percentage_is_rounded_after_discounting() -> TestResult {
        // 101 * 0.5 = 50.5, rounded away from zero
        let discount = SimpleDiscount::PercentageOff(Percentage::from(Decimal::new(5, 1)));
        let result = discounted_price(Money::from_minor(101, VND), &discount, None)?;

        assert_eq!(result.to_minor_units(), 51);

        Ok(())
    }

    #[test]
    fn amount_larger_than_price_floors_at_zero() -> TestResult {
        let discount = SimpleDiscount::AmountOff(Money::from_minor(5_000, VND));
        let result = discounted_price(Money::from_minor(1_000, VND), &discount, None)?;

        assert_eq!(result.to_minor_units(), 0);

        Ok(())
    }

    #[test]
    fn cap_above_granted_discount_has_no_effect() -> TestResult {
        let discount = SimpleDiscount::PercentageOff(Percentage::from(0.1));
        let cap = Money::from_minor(50_000, VND);
        let result = discounted_price(Money::from_minor(100_000, VND), &discount, Some(&cap))?;

        assert_eq!(result.to_minor_units(), 90_000);

        Ok(())
    }

    #[test]
    fn mismatched_currency_is_rejected() {
        let discount = SimpleDiscount::AmountOff(Money::from_minor(100, USD));
        let result = discounted_price(Money::from_minor(1_000, VND), &discount, None);

        assert_eq!(
            result,
            Err(DiscountError::CurrencyMismatch {
                price: "VND",
                discount: "USD",
            })
        );
    }

    #[test]
    fn kind_labels() {
        assert_eq!(
            SimpleDiscount::PercentageOff(Percentage::from(0.1)).kind_as_str(),
            "PERCENTAGE"
        );
        assert_eq!(
            SimpleDiscount::AmountOff(Money::from_minor(1, VND)).kind_as_str(),
            "FIXED_AMOUNT"
        );
    }
}
