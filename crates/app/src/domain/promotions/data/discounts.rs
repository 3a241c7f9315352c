//! Promotion Discounts

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Simple Discount Data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimpleDiscount {
    /// Percentage in `0..=100`, fractions allowed.
    #[serde(rename = "PERCENTAGE")]
    PercentageOff { percentage: Decimal },

    /// Amount in minor units of the catalog currency.
    #[serde(rename = "FIXED_AMOUNT")]
    FixedAmountOff { amount: u64 },
}

impl SimpleDiscount {
    /// Storage representation of the discount kind.
    #[must_use]
    pub const fn to_str(&self) -> &'static str {
        match self {
            Self::PercentageOff { .. } => "percentage_off",
            Self::FixedAmountOff { .. } => "amount_off",
        }
    }

    /// Label shown to customers.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PercentageOff { .. } => "PERCENTAGE",
            Self::FixedAmountOff { .. } => "FIXED_AMOUNT",
        }
    }

    /// Configured value: the percentage, or the amount in minor units.
    #[must_use]
    pub fn value(&self) -> Decimal {
        match self {
            Self::PercentageOff { percentage } => *percentage,
            Self::FixedAmountOff { amount } => Decimal::from(*amount),
        }
    }

    /// Rebuild a discount from its stored kind and value.
    ///
    /// Returns `None` for an unknown kind or an amount that is not a
    /// non-negative whole number.
    #[must_use]
    pub fn from_parts(kind: &str, value: Decimal) -> Option<Self> {
        match kind {
            "percentage_off" => Some(Self::PercentageOff { percentage: value }),
            "amount_off" if value.fract().is_zero() => u64::try_from(value)
                .ok()
                .map(|amount| Self::FixedAmountOff { amount }),
            _ => None,
        }
    }
}
