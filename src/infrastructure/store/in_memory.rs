//! In-memory store implementation

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::store::{Mutation, Store, StoreEntity, StoreKey};

/// Thread-safe in-memory store.
///
/// Useful for testing and development. Data is lost when the process
/// terminates. The whole mutation batch applies under one write lock, which
/// gives `apply` its all-or-nothing guarantee for free.
#[derive(Debug)]
pub struct InMemoryStore<E>
where
    E: StoreEntity,
{
    rows: RwLock<HashMap<String, E>>,
}

impl<E> Default for InMemoryStore<E>
where
    E: StoreEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryStore<E>
where
    E: StoreEntity,
{
    /// Creates a new empty store
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a store pre-populated with rows
    pub fn with_entities(entities: Vec<E>) -> Self {
        let store = Self::new();
        {
            let mut rows = store.rows.write().unwrap();

            for entity in entities {
                rows.insert(entity.key().to_key(), entity);
            }
        }
        store
    }
}

#[async_trait]
impl<E> Store<E> for InMemoryStore<E>
where
    E: StoreEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let rows = self
            .rows
            .read()
            .map_err(|e| DomainError::store(format!("Failed to acquire read lock: {}", e)))?;

        Ok(rows.get(&key.to_key()).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let rows = self
            .rows
            .read()
            .map_err(|e| DomainError::store(format!("Failed to acquire read lock: {}", e)))?;

        Ok(rows.values().cloned().collect())
    }

    async fn apply(&self, mutations: Vec<Mutation<E>>) -> Result<(), DomainError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|e| DomainError::store(format!("Failed to acquire write lock: {}", e)))?;

        // Validate every staged mutation before touching the map, so a
        // failing batch rolls back to the untouched state.
        for mutation in &mutations {
            match mutation {
                Mutation::Added(entity) => {
                    if rows.contains_key(&entity.key().to_key()) {
                        return Err(DomainError::conflict(format!(
                            "Row with key '{}' already exists",
                            entity.key()
                        )));
                    }
                }
                Mutation::Modified(entity) | Mutation::Removed(entity) => {
                    if !rows.contains_key(&entity.key().to_key()) {
                        return Err(DomainError::not_found(format!(
                            "Row with key '{}' not found",
                            entity.key()
                        )));
                    }
                }
            }
        }

        for mutation in mutations {
            match mutation {
                Mutation::Added(entity) | Mutation::Modified(entity) => {
                    rows.insert(entity.key().to_key(), entity);
                }
                Mutation::Removed(entity) => {
                    rows.remove(&entity.key().to_key());
                }
            }
        }

        Ok(())
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        let rows = self
            .rows
            .read()
            .map_err(|e| DomainError::store(format!("Failed to acquire read lock: {}", e)))?;

        Ok(rows.contains_key(&key.to_key()))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let rows = self
            .rows
            .read()
            .map_err(|e| DomainError::store(format!("Failed to acquire read lock: {}", e)))?;

        Ok(rows.len())
    }
}
