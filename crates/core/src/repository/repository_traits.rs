//! Generic repository trait.
//!
//! This trait defines the persistence contract without any database-specific
//! types, allowing for different storage implementations.

use async_trait::async_trait;

use super::repository_model::{Aggregate, Filter};
use crate::errors::Result;

/// Trait defining the contract for whole-aggregate repository operations.
///
/// Implementations bind their collection (table) explicitly at construction
/// and must honor whole-aggregate replace semantics together with every
/// `Filter` variant.
#[async_trait]
pub trait RepositoryTrait<T: Aggregate>: Send + Sync {
    /// Retrieves all aggregates matching the filter, in insertion order.
    fn get_all(&self, filter: &Filter) -> Result<Vec<T>>;

    /// Retrieves a page of the aggregates matching the filter.
    fn get_all_skip_take(&self, filter: &Filter, skip: usize, take: usize) -> Result<Vec<T>>;

    /// Retrieves the first aggregate matching the filter, if any.
    fn get_first(&self, filter: &Filter) -> Result<Option<T>>;

    /// Inserts a new aggregate.
    async fn insert(&self, entity: T) -> Result<T>;

    /// Replaces the first aggregate matching the filter with `entity`.
    ///
    /// Returns the number of matched aggregates (0 or 1).
    async fn replace(&self, filter: &Filter, entity: T) -> Result<usize>;

    /// Deletes every aggregate matching the filter.
    ///
    /// Returns the number of deleted aggregates.
    async fn delete_all(&self, filter: &Filter) -> Result<usize>;
}
