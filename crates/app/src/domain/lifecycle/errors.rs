//! Lifecycle service errors.

use sqlx::Error;
use thiserror::Error;

use crate::database::{StorageFailure, classify};

#[derive(Debug, Error)]
pub enum LifecycleServiceError {
    #[error("concurrent update conflict")]
    Conflict(#[source] Error),

    #[error("storage unavailable")]
    Unavailable(#[source] Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for LifecycleServiceError {
    fn from(error: Error) -> Self {
        match classify(&error) {
            StorageFailure::Conflict => Self::Conflict(error),
            StorageFailure::Unavailable => Self::Unavailable(error),
            _ => Self::Sql(error),
        }
    }
}
