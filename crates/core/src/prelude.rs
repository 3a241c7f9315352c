//! Rebate prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    discounts::{DiscountError, SimpleDiscount, discounted_price},
    eligibility::{category_promotion, find_applicable},
    pricing::{BestDiscount, best_discount},
    promotions::{
        Promotion, PromotionError, PromotionStatus, PromotionTargets, UsageBudget,
        ValidityWindow, status_on_write,
    },
    slug::slugify,
    usage::{OrderLine, UsagePolicy, promotions_to_charge},
};
