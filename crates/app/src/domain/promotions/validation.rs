//! Promotion validation.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::promotions::data::{NewPromotion, SimpleDiscount};

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("name must contain at least one letter or digit")]
    EmptySlug,

    #[error("description must not be empty")]
    EmptyDescription,

    #[error("start date must be before end date")]
    InvalidWindow,

    #[error("discount value must not be negative")]
    NegativeValue,

    #[error("percentage must not exceed 100")]
    PercentageTooLarge,

    #[error("usage limit must be at least 1")]
    ZeroUsageLimit,
}

/// Check a promotion before it is written.
///
/// # Errors
///
/// Returns the first rule the promotion breaks.
pub fn validate(promotion: &NewPromotion, slug: &str) -> Result<(), ValidationError> {
    if promotion.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }

    if slug.is_empty() {
        return Err(ValidationError::EmptySlug);
    }

    if promotion.description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }

    if promotion.starts_at >= promotion.ends_at {
        return Err(ValidationError::InvalidWindow);
    }

    if let SimpleDiscount::PercentageOff { percentage } = promotion.discount {
        if percentage < Decimal::ZERO {
            return Err(ValidationError::NegativeValue);
        }

        if percentage > Decimal::ONE_HUNDRED {
            return Err(ValidationError::PercentageTooLarge);
        }
    }

    if promotion.usage_limit == Some(0) {
        return Err(ValidationError::ZeroUsageLimit);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use rebate::promotions::PromotionStatus;

    use crate::domain::promotions::{data::Banner, records::PromotionUuid};

    use super::*;

    fn promotion() -> NewPromotion {
        let starts_at = Timestamp::UNIX_EPOCH;

        NewPromotion {
            uuid: PromotionUuid::new(),
            name: "Summer Sale".to_string(),
            description: "Hot deals".to_string(),
            banner: Banner {
                url: "https://cdn.example.com/summer.png".to_string(),
                public_id: "summer".to_string(),
            },
            discount: SimpleDiscount::PercentageOff {
                percentage: Decimal::from(20),
            },
            max_discount: None,
            starts_at,
            ends_at: starts_at + SignedDuration::from_hours(24),
            applicable_products: Vec::new(),
            applicable_categories: Vec::new(),
            status: PromotionStatus::Active,
            usage_limit: None,
        }
    }

    #[test]
    fn accepts_well_formed_promotion() {
        assert_eq!(validate(&promotion(), "summer-sale"), Ok(()));
    }

    #[test]
    fn rejects_blank_name_and_description() {
        let mut blank_name = promotion();
        blank_name.name = "   ".to_string();

        assert_eq!(validate(&blank_name, "x"), Err(ValidationError::EmptyName));

        let mut blank_description = promotion();
        blank_description.description = String::new();

        assert_eq!(
            validate(&blank_description, "summer-sale"),
            Err(ValidationError::EmptyDescription)
        );
    }

    #[test]
    fn rejects_name_without_slug() {
        let mut punctuation = promotion();
        punctuation.name = "!!!".to_string();

        assert_eq!(validate(&punctuation, ""), Err(ValidationError::EmptySlug));
    }

    #[test]
    fn rejects_inverted_or_empty_window() {
        let mut empty = promotion();
        empty.ends_at = empty.starts_at;

        assert_eq!(
            validate(&empty, "summer-sale"),
            Err(ValidationError::InvalidWindow)
        );
    }

    #[test]
    fn rejects_out_of_range_percentages() {
        let mut negative = promotion();
        negative.discount = SimpleDiscount::PercentageOff {
            percentage: Decimal::NEGATIVE_ONE,
        };

        assert_eq!(
            validate(&negative, "summer-sale"),
            Err(ValidationError::NegativeValue)
        );

        let mut too_large = promotion();
        too_large.discount = SimpleDiscount::PercentageOff {
            percentage: Decimal::new(1001, 1),
        };

        assert_eq!(
            validate(&too_large, "summer-sale"),
            Err(ValidationError::PercentageTooLarge)
        );
    }

    #[test]
    fn rejects_zero_usage_limit() {
        let mut limited = promotion();
        limited.usage_limit = Some(0);

        assert_eq!(
            validate(&limited, "summer-sale"),
            Err(ValidationError::ZeroUsageLimit)
        );
    }
}
