//! Database connection management

use std::future::Future;

use sqlx::{
    Error, PgPool, Postgres, Transaction,
    error::{DatabaseError, ErrorKind},
};
use tracing::warn;

/// SQLSTATE codes for transactions that lost a race and may be retried.
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when a connection cannot be acquired or the transaction cannot start.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, Error> {
        self.pool.begin().await
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, Error> {
    PgPool::connect(database_url).await
}

/// How a storage error should be surfaced by the domain services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StorageFailure {
    NotFound,
    UniqueViolation,
    ForeignKeyViolation,
    NotNullViolation,
    CheckViolation,
    Conflict,
    Unavailable,
    Other,
}

pub(crate) fn classify(error: &Error) -> StorageFailure {
    match error {
        Error::RowNotFound => return StorageFailure::NotFound,
        Error::PoolTimedOut | Error::PoolClosed | Error::Io(_) | Error::WorkerCrashed => {
            return StorageFailure::Unavailable;
        }
        _ => {}
    }

    let Some(database_error) = error.as_database_error() else {
        return StorageFailure::Other;
    };

    if matches!(
        database_error.code().as_deref(),
        Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED)
    ) {
        return StorageFailure::Conflict;
    }

    match DatabaseError::kind(database_error) {
        ErrorKind::UniqueViolation => StorageFailure::UniqueViolation,
        ErrorKind::ForeignKeyViolation => StorageFailure::ForeignKeyViolation,
        ErrorKind::NotNullViolation => StorageFailure::NotNullViolation,
        ErrorKind::CheckViolation => StorageFailure::CheckViolation,
        _ => StorageFailure::Other,
    }
}

/// Run `operation` until it succeeds, fails with anything but a
/// [`StorageFailure::Conflict`], or has been attempted `max_attempts` times.
///
/// `operation` receives the 1-based attempt number. At least one attempt is
/// always made.
pub(crate) async fn retry_on_conflict<T, F, Fut>(
    max_attempts: u32,
    mut operation: F,
) -> Result<T, Error>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Err(error) if classify(&error) == StorageFailure::Conflict && attempt < max_attempts => {
                warn!(attempt, max_attempts, error = %error, "storage conflict, retrying");

                attempt += 1;
            }
            result => return result,
        }
    }
}

/// Convert an unsigned amount into a `BIGINT` bind value.
pub(crate) fn try_i64_from_u64(value: u64, column: &'static str) -> Result<i64, Error> {
    i64::try_from(value).map_err(|e| Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Convert a `BIGINT` column into an unsigned amount.
pub(crate) fn try_u64_from_i64(value: i64, column: &'static str) -> Result<u64, Error> {
    u64::try_from(value).map_err(|e| Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_optional_i64_from_u64(
    value: Option<u64>,
    column: &'static str,
) -> Result<Option<i64>, Error> {
    value.map(|v| try_i64_from_u64(v, column)).transpose()
}

pub(crate) fn try_optional_u64_from_i64(
    value: Option<i64>,
    column: &'static str,
) -> Result<Option<u64>, Error> {
    value.map(|v| try_u64_from_i64(v, column)).transpose()
}
