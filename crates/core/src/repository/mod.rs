//! Repository port - the generic persistence contract shared by every store.

mod memory_repository;
mod repository_model;
mod repository_traits;

pub use memory_repository::InMemoryRepository;
pub use repository_model::{Aggregate, Filter};
pub use repository_traits::RepositoryTrait;
