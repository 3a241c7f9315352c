//! Products service errors.

use sqlx::Error;
use thiserror::Error;

use crate::database::{StorageFailure, classify};

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product already exists")]
    AlreadyExists,

    #[error("product not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage unavailable")]
    Unavailable(#[source] Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ProductsServiceError {
    fn from(error: Error) -> Self {
        match classify(&error) {
            StorageFailure::NotFound => Self::NotFound,
            StorageFailure::UniqueViolation => Self::AlreadyExists,
            StorageFailure::ForeignKeyViolation => Self::InvalidReference,
            StorageFailure::NotNullViolation => Self::MissingRequiredData,
            StorageFailure::CheckViolation => Self::InvalidData,
            StorageFailure::Unavailable => Self::Unavailable(error),
            StorageFailure::Conflict | StorageFailure::Other => Self::Sql(error),
        }
    }
}
