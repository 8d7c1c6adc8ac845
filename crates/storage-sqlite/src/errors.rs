//! Storage-specific error types for SQLite operations.
//!
//! Wraps Diesel and r2d2 errors and converts them to the
//! database-agnostic error types defined in `fundsync_core`.

use diesel::result::Error as DieselError;
use thiserror::Error;

use fundsync_core::errors::{DatabaseError, Error};

/// Errors internal to the storage layer; converted to
/// `fundsync_core::Error` before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Stored value could not be decoded: {0}")]
    DecodeFailed(String),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(e) => {
                Error::Database(DatabaseError::ConnectionFailed(e.to_string()))
            }
            StorageError::PoolError(e) => {
                Error::Database(DatabaseError::PoolCreationFailed(e.to_string()))
            }
            StorageError::QueryFailed(DieselError::NotFound) => {
                Error::Database(DatabaseError::NotFound("Record not found".to_string()))
            }
            StorageError::QueryFailed(DieselError::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            )) => Error::Database(DatabaseError::UniqueViolation(info.message().to_string())),
            StorageError::QueryFailed(e) => {
                Error::Database(DatabaseError::QueryFailed(e.to_string()))
            }
            StorageError::MigrationFailed(e) => Error::Database(DatabaseError::MigrationFailed(e)),
            StorageError::DecodeFailed(e) => Error::Database(DatabaseError::Internal(e)),
        }
    }
}

/// Extension trait for converting Diesel/r2d2 Results to core Results.
///
/// `From<DieselError> for Error` is blocked by orphan rules, so the
/// conversion goes through `StorageError` via this trait instead.
pub trait IntoCore<T> {
    fn into_core(self) -> fundsync_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, DieselError> {
    fn into_core(self) -> fundsync_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

impl<T> IntoCore<T> for std::result::Result<T, r2d2::Error> {
    fn into_core(self) -> fundsync_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}
