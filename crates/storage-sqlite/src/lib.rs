//! SQLite storage for the assets balancer.
//!
//! This crate provides the database side of the balancer using Diesel with SQLite.
//! It implements the generic repository port defined in `balancer-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - A document repository that stores each aggregate as one JSON row
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//! The `core` crate is database-agnostic and works with traits.
//!
//! ```text
//!      core (domain, services)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod documents;
pub mod errors;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export the repository implementation
pub use documents::{DocumentRow, SqliteDocumentRepository};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from balancer-core for convenience
pub use balancer_core::errors::{DatabaseError, Error, Result};
