//! Row model for document tables.

use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};

use crate::errors::StorageError;
use balancer_core::repository::Aggregate;
use balancer_core::Result;

/// One stored aggregate. `id` and `version` are mirrored out of the JSON
/// document so filters can run without parsing it.
#[derive(QueryableByName, Debug, Clone, PartialEq)]
pub struct DocumentRow {
    #[diesel(sql_type = Text)]
    pub id: String,
    #[diesel(sql_type = BigInt)]
    pub version: i64,
    #[diesel(sql_type = Text)]
    pub document: String,
}

impl DocumentRow {
    /// Fails for aggregates that would not read back unchanged, such as
    /// non-finite floats that serde_json writes as `null`.
    pub fn encode<T: Aggregate>(entity: &T) -> Result<Self> {
        entity.validate()?;
        let document = serde_json::to_string(entity).map_err(StorageError::from)?;
        Ok(Self {
            id: entity.id().to_string(),
            version: entity.version(),
            document,
        })
    }

    pub fn decode<T: Aggregate>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.document).map_err(StorageError::from)?)
    }
}
