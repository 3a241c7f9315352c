//! Promotions

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use uuid::Uuid;

use crate::discounts::{DiscountError, SimpleDiscount, discounted_price};

pub mod budget;
pub mod status;
pub mod targets;
pub mod window;

pub use budget::UsageBudget;
pub use status::{PromotionStatus, status_on_write};
pub use targets::PromotionTargets;
pub use window::ValidityWindow;

/// Errors raised while building promotion values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromotionError {
    /// Window start is not strictly before its end.
    #[error("promotion window must start before it ends")]
    InvalidWindow,

    /// Percentage outside `0..=100`.
    #[error("percentage must be between 0 and 100")]
    InvalidPercentage,

    /// Monetary amount too large to represent in minor units.
    #[error("amount does not fit in minor units")]
    AmountOverflow,
}

impl SimpleDiscount<'_> {
    /// Build a percentage discount from a value in `0..=100`.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::InvalidPercentage`] when `value` is out of range.
    pub fn percentage_off(value: Decimal) -> Result<Self, PromotionError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(PromotionError::InvalidPercentage);
        }

        Ok(Self::PercentageOff(Percentage::from(
            value / Decimal::ONE_HUNDRED,
        )))
    }
}

/// A promotion as seen by the engine.
#[derive(Debug, Clone)]
pub struct Promotion<'a> {
    /// Promotion id.
    pub uuid: Uuid,

    /// Discount rule.
    pub discount: SimpleDiscount<'a>,

    /// Cap on the absolute discount granted per price.
    pub max_discount: Option<Money<'a, Currency>>,

    /// Date window.
    pub window: ValidityWindow,

    /// Targeted products and categories.
    pub targets: PromotionTargets,

    /// Stored status.
    pub status: PromotionStatus,

    /// Redemption budget.
    pub budget: UsageBudget,
}

impl<'a> Promotion<'a> {
    /// Status the promotion effectively has at `now`.
    ///
    /// The manual `Inactive` and a stored `Expired` are kept. An `Active`
    /// promotion reads as `Expired` once its window closed, and as `Inactive`
    /// before the window opens or when its usage limit is reached.
    pub fn derive_status(&self, now: Timestamp) -> PromotionStatus {
        match self.status {
            PromotionStatus::Inactive | PromotionStatus::Expired => self.status,
            PromotionStatus::Active if now >= self.window.ends_at() => PromotionStatus::Expired,
            PromotionStatus::Active
                if self.window.is_upcoming(now) || self.budget.is_exhausted() =>
            {
                PromotionStatus::Inactive
            }
            PromotionStatus::Active => PromotionStatus::Active,
        }
    }

    /// Whether the promotion can be applied at `now`.
    pub fn is_effectively_active(&self, now: Timestamp) -> bool {
        self.derive_status(now) == PromotionStatus::Active
    }

    /// Whether the promotion targets a product in an optional category.
    pub fn applies_to(&self, product: Uuid, category: Option<Uuid>) -> bool {
        self.targets.matches(product, category)
    }

    /// Status the lifecycle sweep should write, if it differs from the stored one.
    ///
    /// Only `Active` promotions are considered. Expiry takes precedence over
    /// usage-limit exhaustion.
    pub fn sweep_transition(&self, as_of: Timestamp) -> Option<PromotionStatus> {
        if self.status != PromotionStatus::Active {
            return None;
        }

        if self.window.has_ended(as_of) {
            Some(PromotionStatus::Expired)
        } else if self.budget.is_exhausted() {
            Some(PromotionStatus::Inactive)
        } else {
            None
        }
    }

    /// Price after applying this promotion to `original`.
    ///
    /// # Errors
    ///
    /// See [`discounted_price`].
    pub fn discounted_price(
        &self,
        original: Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        discounted_price(original, &self.discount, self.max_discount.as_ref())
    }
}
