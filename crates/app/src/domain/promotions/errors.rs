//! Promotions service errors.

use rebate::promotions::PromotionError;
use sqlx::Error;
use thiserror::Error;

use crate::{
    database::{StorageFailure, classify},
    domain::promotions::validation::ValidationError,
};

#[derive(Debug, Error)]
pub enum PromotionsServiceError {
    #[error("promotion already exists")]
    AlreadyExists,

    #[error("promotion not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("stored promotion is malformed")]
    Malformed(#[from] PromotionError),

    #[error("concurrent update conflict")]
    Conflict(#[source] Error),

    #[error("storage unavailable")]
    Unavailable(#[source] Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for PromotionsServiceError {
    fn from(error: Error) -> Self {
        match classify(&error) {
            StorageFailure::NotFound => Self::NotFound,
            StorageFailure::UniqueViolation => Self::AlreadyExists,
            StorageFailure::ForeignKeyViolation => Self::InvalidReference,
            StorageFailure::NotNullViolation => Self::MissingRequiredData,
            StorageFailure::CheckViolation => Self::InvalidData,
            StorageFailure::Conflict => Self::Conflict(error),
            StorageFailure::Unavailable => Self::Unavailable(error),
            StorageFailure::Other => Self::Sql(error),
        }
    }
}
