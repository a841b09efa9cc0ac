//! In-memory cache collection implementation

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::cache::CacheCollection;
use crate::domain::store::{Predicate, StoreEntity, StoreKey};

/// Thread-safe in-memory cache collection indexed by entity identifier.
///
/// Predicate queries scan the collection. Entries live until explicitly
/// deleted; there is no eviction.
#[derive(Debug)]
pub struct InMemoryCacheCollection<E>
where
    E: StoreEntity,
{
    records: RwLock<HashMap<String, E>>,
}

impl<E> Default for InMemoryCacheCollection<E>
where
    E: StoreEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryCacheCollection<E>
where
    E: StoreEntity,
{
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, E>>, DomainError> {
        self.records
            .read()
            .map_err(|e| DomainError::cache(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, E>>, DomainError> {
        self.records
            .write()
            .map_err(|e| DomainError::cache(format!("Failed to acquire write lock: {}", e)))
    }
}

#[async_trait]
impl<E> CacheCollection<E> for InMemoryCacheCollection<E>
where
    E: StoreEntity + 'static,
{
    async fn insert(&self, record: E) -> Result<(), DomainError> {
        self.write()?.insert(record.key().to_key(), record);
        Ok(())
    }

    async fn update(&self, record: E) -> Result<(), DomainError> {
        self.write()?.insert(record.key().to_key(), record);
        Ok(())
    }

    async fn delete(&self, record: &E) -> Result<bool, DomainError> {
        Ok(self.write()?.remove(&record.key().to_key()).is_some())
    }

    async fn find_by_id(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        Ok(self.read()?.get(&key.to_key()).cloned())
    }

    async fn find_first(&self, predicate: &Predicate<E>) -> Result<Option<E>, DomainError> {
        Ok(self
            .read()?
            .values()
            .find(|record| predicate.matches(record))
            .cloned())
    }

    async fn find_all(&self, predicate: &Predicate<E>) -> Result<Vec<E>, DomainError> {
        Ok(self
            .read()?
            .values()
            .filter(|record| predicate.matches(record))
            .cloned()
            .collect())
    }

    async fn all(&self) -> Result<Vec<E>, DomainError> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.write()?.clear();
        Ok(())
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.read()?.len())
    }
}
