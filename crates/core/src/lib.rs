//! Assets Balancer Core - Domain entities, balancing engine, services, and traits.
//!
//! This crate contains the rebalancing business logic. It is database-agnostic
//! and defines the generic repository port that is implemented by the
//! `storage-sqlite` crate (and by the in-memory adapter shipped here).

pub mod assets_groups;
pub mod constants;
pub mod errors;
pub mod repository;

// Re-export the rebalancing domain
pub use assets_groups::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
