//! Pricing service errors.

use rebate::{discounts::DiscountError, promotions::PromotionError};
use thiserror::Error;

use crate::domain::{products::ProductsServiceError, promotions::PromotionsServiceError};

#[derive(Debug, Error)]
pub enum PricingServiceError {
    #[error(transparent)]
    Products(#[from] ProductsServiceError),

    #[error(transparent)]
    Promotions(#[from] PromotionsServiceError),

    #[error("stored promotion is malformed")]
    Malformed(#[from] PromotionError),

    #[error("failed to calculate discount")]
    Discount(#[from] DiscountError),

    #[error("price does not fit in minor units")]
    PriceOutOfRange,
}
