//! Aggregate contract and typed filters understood by every repository.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::Result;

/// An aggregate root that can be stored as a whole document.
///
/// Stores never see partial updates: an aggregate is inserted, replaced or
/// deleted as a unit. Owned children are serialized as an array under
/// `CHILDREN_FIELD`, each child carrying an `id` key.
pub trait Aggregate: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Serialized name of the owned children array.
    const CHILDREN_FIELD: &'static str;

    fn id(&self) -> &str;

    /// Optimistic-concurrency token of the stored aggregate.
    fn version(&self) -> i64;

    /// Whether one of the owned children has the given id.
    fn owns(&self, child_id: &str) -> bool;

    /// Checks that the aggregate can be stored and read back unchanged.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Closed set of predicates a repository must support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every aggregate in the collection.
    All,
    /// The aggregate with the given id.
    ById(String),
    /// The aggregate with the given id, only while it is still at `version`.
    ByIdAndVersion { id: String, version: i64 },
    /// The aggregate with the given id that owns a child with `child_id`.
    ByChildId { id: String, child_id: String },
}

impl Filter {
    pub fn by_id(id: &str) -> Self {
        Filter::ById(id.to_string())
    }

    pub fn by_id_and_version(id: &str, version: i64) -> Self {
        Filter::ByIdAndVersion {
            id: id.to_string(),
            version,
        }
    }

    pub fn by_child_id(id: &str, child_id: &str) -> Self {
        Filter::ByChildId {
            id: id.to_string(),
            child_id: child_id.to_string(),
        }
    }

    /// Reference semantics of the filter, evaluated against a loaded aggregate.
    pub fn matches<T: Aggregate>(&self, entity: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::ById(id) => entity.id() == id,
            Filter::ByIdAndVersion { id, version } => {
                entity.id() == id && entity.version() == *version
            }
            Filter::ByChildId { id, child_id } => entity.id() == id && entity.owns(child_id),
        }
    }
}
