//! Usage service errors.

use rebate::{discounts::DiscountError, promotions::PromotionError};
use sqlx::Error;
use thiserror::Error;

use crate::{
    database::{StorageFailure, classify},
    domain::{
        products::{ProductsServiceError, records::ProductUuid},
        promotions::PromotionsServiceError,
    },
};

#[derive(Debug, Error)]
pub enum UsageServiceError {
    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

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

    #[error("concurrent update conflict")]
    Conflict(#[source] Error),

    #[error("storage unavailable")]
    Unavailable(#[source] Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for UsageServiceError {
    fn from(error: Error) -> Self {
        match classify(&error) {
            StorageFailure::Conflict => Self::Conflict(error),
            StorageFailure::Unavailable => Self::Unavailable(error),
            _ => Self::Sql(error),
        }
    }
}
