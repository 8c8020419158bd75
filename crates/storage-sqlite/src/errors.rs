//! Failures of the SQLite document store and their mapping onto `balancer_core::Error`.

use balancer_core::errors::{DatabaseError, Error};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Errors raised while opening, migrating, reading or writing document tables.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Cannot open database: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Document query failed: {0}")]
    Query(#[from] DieselError),

    #[error("Migration failed: {0}")]
    Migration(String),

    /// A document column did not hold the JSON of its aggregate.
    #[error("Malformed document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Writer unavailable: {0}")]
    WriterUnavailable(String),

    /// Raised by a write job; rolled back and handed back as is.
    #[error(transparent)]
    Core(Error),
}

impl From<Error> for StorageError {
    fn from(err: Error) -> Self {
        StorageError::Core(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        let database = match err {
            StorageError::Core(e) => return e,
            StorageError::Connection(e) => DatabaseError::ConnectionFailed(e.to_string()),
            StorageError::Pool(e) => DatabaseError::PoolCreationFailed(e.to_string()),
            // Primary key on the document id
            StorageError::Query(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)) => {
                DatabaseError::UniqueViolation(info.message().to_string())
            }
            // SQLITE_BUSY outlasting busy_timeout
            StorageError::Query(DieselError::DatabaseError(_, info))
                if info.message().contains("database is locked") =>
            {
                DatabaseError::TransactionFailed(info.message().to_string())
            }
            StorageError::Query(e) => DatabaseError::QueryFailed(e.to_string()),
            StorageError::Migration(e) => DatabaseError::MigrationFailed(e),
            StorageError::Document(e) => DatabaseError::Serialization(e.to_string()),
            StorageError::WriterUnavailable(e) => DatabaseError::TransactionFailed(e),
        };
        Error::Database(database)
    }
}

/// `.into_core()` for diesel results inside write jobs.
pub trait IntoCore<T> {
    fn into_core(self) -> balancer_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, DieselError> {
    fn into_core(self) -> balancer_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}
