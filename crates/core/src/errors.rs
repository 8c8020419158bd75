//! Core error types for the assets balancer.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use thiserror::Error;

use crate::assets_groups::AssetsGroupError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the balancer.
///
/// Domain errors (`AssetsGroup`, `Validation`, `ConcurrentModification`) are
/// expected conditions a caller maps to a client-visible response. `Database`
/// and `Repository` errors come from the storage port and are not retried.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("{0}")]
    AssetsGroup(#[from] AssetsGroupError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Concurrent modification detected: {0}")]
    ConcurrentModification(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Storage failures, reduced to strings so the core stays free of any
/// database crate.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// Another document already uses the id.
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// The write could not be committed, or the writer is gone.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A stored document could not be encoded or decoded.
    #[error("Document serialization failed: {0}")]
    Serialization(String),
}

/// Rejected input models.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}
