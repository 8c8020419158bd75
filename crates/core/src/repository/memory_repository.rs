//! In-memory implementation of the repository port.

use async_trait::async_trait;
use log::debug;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::repository_model::{Aggregate, Filter};
use super::repository_traits::RepositoryTrait;
use crate::errors::{DatabaseError, Error, Result};

/// Repository keeping aggregates in a process-local vector.
///
/// Every operation takes the lock once, so a versioned `replace` is an atomic
/// compare-and-swap.
pub struct InMemoryRepository<T: Aggregate> {
    collection: String,
    documents: RwLock<Vec<T>>,
}

impl<T: Aggregate> InMemoryRepository<T> {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            documents: RwLock::new(Vec::new()),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<T>>> {
        self.documents
            .read()
            .map_err(|e| Error::Repository(format!("{} lock poisoned: {}", self.collection, e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>> {
        self.documents
            .write()
            .map_err(|e| Error::Repository(format!("{} lock poisoned: {}", self.collection, e)))
    }
}

#[async_trait]
impl<T: Aggregate> RepositoryTrait<T> for InMemoryRepository<T> {
    fn get_all(&self, filter: &Filter) -> Result<Vec<T>> {
        let documents = self.read()?;
        Ok(documents
            .iter()
            .filter(|d| filter.matches(*d))
            .cloned()
            .collect())
    }

    fn get_all_skip_take(&self, filter: &Filter, skip: usize, take: usize) -> Result<Vec<T>> {
        let documents = self.read()?;
        Ok(documents
            .iter()
            .filter(|d| filter.matches(*d))
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    fn get_first(&self, filter: &Filter) -> Result<Option<T>> {
        let documents = self.read()?;
        Ok(documents.iter().find(|d| filter.matches(*d)).cloned())
    }

    async fn insert(&self, entity: T) -> Result<T> {
        let mut documents = self.write()?;
        if documents.iter().any(|d| d.id() == entity.id()) {
            return Err(Error::Database(DatabaseError::UniqueViolation(format!(
                "{}.id = {}",
                self.collection,
                entity.id()
            ))));
        }
        debug!("Inserting {} into {}", entity.id(), self.collection);
        documents.push(entity.clone());
        Ok(entity)
    }

    async fn replace(&self, filter: &Filter, entity: T) -> Result<usize> {
        let mut documents = self.write()?;
        match documents.iter().position(|d| filter.matches(d)) {
            Some(idx) => {
                documents[idx] = entity;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_all(&self, filter: &Filter) -> Result<usize> {
        let mut documents = self.write()?;
        let before = documents.len();
        documents.retain(|d| !filter.matches(d));
        Ok(before - documents.len())
    }
}
