//! Store adapter trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::StoreEntity;

/// A staged state transition, applied at commit time.
///
/// Mirrors the add/modify/delete-by-state semantics of the relational
/// store: the transition is recorded against an entity value and only
/// becomes visible when the whole batch commits.
#[derive(Debug, Clone)]
pub enum Mutation<E> {
    /// The entity is new; commit inserts it
    Added(E),
    /// The entity exists; commit overwrites it
    Modified(E),
    /// The entity exists; commit deletes it
    Removed(E),
}

/// Boundary contract for the relational store.
///
/// Reads are plain async calls; all writes go through [`Store::apply`],
/// which commits the staged mutations atomically - either every mutation
/// lands or the store is left untouched.
#[async_trait]
pub trait Store<E>: Send + Sync + Debug
where
    E: StoreEntity + 'static,
{
    /// Retrieves a row by its key
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError>;

    /// Retrieves all rows
    async fn list(&self) -> Result<Vec<E>, DomainError>;

    /// Commits a batch of staged mutations as one atomic unit of work.
    ///
    /// Inserting an existing key fails with `Conflict`; modifying or
    /// removing an absent key fails with `NotFound`. On any failure the
    /// store must remain exactly as it was before the call.
    async fn apply(&self, mutations: Vec<Mutation<E>>) -> Result<(), DomainError>;

    /// Checks whether a row exists
    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }

    /// Returns the number of rows
    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.len())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::store::StoreKey;

    /// Mock store for testing.
    ///
    /// Supports fault injection via `with_error` and counts committed
    /// batches and applied mutations so tests can assert that an operation
    /// performed zero writes.
    #[derive(Debug)]
    pub struct MockStore<E>
    where
        E: StoreEntity,
    {
        rows: Mutex<HashMap<String, E>>,
        error: Mutex<Option<String>>,
        commit_error: Mutex<Option<String>>,
        commits: AtomicUsize,
        mutations: AtomicUsize,
    }

    impl<E> Default for MockStore<E>
    where
        E: StoreEntity,
    {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<E> MockStore<E>
    where
        E: StoreEntity,
    {
        pub fn new() -> Self {
            Self {
                rows: Mutex::new(HashMap::new()),
                error: Mutex::new(None),
                commit_error: Mutex::new(None),
                commits: AtomicUsize::new(0),
                mutations: AtomicUsize::new(0),
            }
        }

        pub fn with_entity(self, entity: E) -> Self {
            self.rows
                .lock()
                .unwrap()
                .insert(entity.key().to_key(), entity);
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        /// Arms fault injection after construction
        pub fn fail_with(&self, error: impl Into<String>) {
            *self.error.lock().unwrap() = Some(error.into());
        }

        /// Fails commits only; reads keep working
        pub fn fail_commits_with(&self, error: impl Into<String>) {
            *self.commit_error.lock().unwrap() = Some(error.into());
        }

        /// Number of successfully committed batches
        pub fn commit_count(&self) -> usize {
            self.commits.load(Ordering::SeqCst)
        }

        /// Number of individual mutations applied across all commits
        pub fn mutation_count(&self) -> usize {
            self.mutations.load(Ordering::SeqCst)
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::store(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl<E> Store<E> for MockStore<E>
    where
        E: StoreEntity + 'static,
    {
        async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
            self.check_error()?;
            Ok(self.rows.lock().unwrap().get(&key.to_key()).cloned())
        }

        async fn list(&self) -> Result<Vec<E>, DomainError> {
            self.check_error()?;
            Ok(self.rows.lock().unwrap().values().cloned().collect())
        }

        async fn apply(&self, mutations: Vec<Mutation<E>>) -> Result<(), DomainError> {
            self.check_error()?;

            if let Some(error) = self.commit_error.lock().unwrap().clone() {
                return Err(DomainError::store(error));
            }

            let mut rows = self.rows.lock().unwrap();

            // Validate the whole batch before touching anything.
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

            let applied = mutations.len();

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

            self.commits.fetch_add(1, Ordering::SeqCst);
            self.mutations.fetch_add(applied, Ordering::SeqCst);

            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde::{Deserialize, Serialize};

        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        struct TestId(String);

        impl std::fmt::Display for TestId {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl StoreKey for TestId {}

        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        struct TestEntity {
            id: TestId,
            name: String,
        }

        impl StoreEntity for TestEntity {
            type Key = TestId;

            fn key(&self) -> &Self::Key {
                &self.id
            }
        }

        fn entity(id: &str, name: &str) -> TestEntity {
            TestEntity {
                id: TestId(id.to_string()),
                name: name.to_string(),
            }
        }

        #[tokio::test]
        async fn test_apply_inserts() {
            let store: MockStore<TestEntity> = MockStore::new();

            store
                .apply(vec![Mutation::Added(entity("1", "A"))])
                .await
                .unwrap();

            let row = store.get(&TestId("1".to_string())).await.unwrap();
            assert_eq!(row.unwrap().name, "A");
            assert_eq!(store.commit_count(), 1);
            assert_eq!(store.mutation_count(), 1);
        }

        #[tokio::test]
        async fn test_apply_batch_is_all_or_nothing() {
            let store: MockStore<TestEntity> = MockStore::new().with_entity(entity("1", "A"));

            // Second mutation conflicts, so the first must not apply.
            let result = store
                .apply(vec![
                    Mutation::Added(entity("2", "B")),
                    Mutation::Added(entity("1", "dup")),
                ])
                .await;

            assert!(matches!(result.unwrap_err(), DomainError::Conflict { .. }));
            assert!(!store.exists(&TestId("2".to_string())).await.unwrap());
            assert_eq!(store.commit_count(), 0);
            assert_eq!(store.mutation_count(), 0);
        }

        #[tokio::test]
        async fn test_apply_modified_missing_row() {
            let store: MockStore<TestEntity> = MockStore::new();

            let result = store
                .apply(vec![Mutation::Modified(entity("1", "A"))])
                .await;

            assert!(matches!(result.unwrap_err(), DomainError::NotFound { .. }));
        }

        #[tokio::test]
        async fn test_apply_removed() {
            let store: MockStore<TestEntity> = MockStore::new().with_entity(entity("1", "A"));

            store
                .apply(vec![Mutation::Removed(entity("1", "A"))])
                .await
                .unwrap();

            assert_eq!(store.count().await.unwrap(), 0);
        }

        #[tokio::test]
        async fn test_with_error() {
            let store: MockStore<TestEntity> = MockStore::new().with_error("connection lost");

            let result = store.list().await;
            assert!(result.is_err());
        }
    }
}
