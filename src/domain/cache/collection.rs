//! Indexed cache collections and the cache-aside read path

use std::fmt::Debug;
use std::future::Future;

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::store::{Predicate, StoreEntity};

/// An indexed cache collection holding mirrors of one entity kind.
///
/// Records are keyed by entity identifier; predicate queries evaluate
/// against the collection without touching the relational store. The
/// collection is a read accelerator only - existence checks that drive
/// business decisions always go to the store.
#[async_trait]
pub trait CacheCollection<E>: Send + Sync + Debug
where
    E: StoreEntity + 'static,
{
    /// Inserts or replaces the record under its identifier.
    ///
    /// Upsert-by-key keeps concurrent duplicate miss repairs idempotent.
    async fn insert(&self, record: E) -> Result<(), DomainError>;

    /// Replaces the record under its identifier
    async fn update(&self, record: E) -> Result<(), DomainError>;

    /// Removes the record; returns whether anything was evicted
    async fn delete(&self, record: &E) -> Result<bool, DomainError>;

    /// Lookup by identifier
    async fn find_by_id(&self, key: &E::Key) -> Result<Option<E>, DomainError>;

    /// First record matching the predicate
    async fn find_first(&self, predicate: &Predicate<E>) -> Result<Option<E>, DomainError>;

    /// All records matching the predicate
    async fn find_all(&self, predicate: &Predicate<E>) -> Result<Vec<E>, DomainError>;

    /// Every record in the collection
    async fn all(&self) -> Result<Vec<E>, DomainError>;

    /// Drops every record
    async fn clear(&self) -> Result<(), DomainError>;

    /// Number of cached records
    async fn len(&self) -> Result<usize, DomainError>;

    async fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len().await? == 0)
    }
}

/// Extension trait providing the cache-aside `get_or_set` operations.
///
/// Reads are served from the collection when it can answer; on a miss the
/// supplied loader fetches from the store and the result is cached before
/// returning. Concurrent misses may invoke the loader more than once; the
/// identifier index deduplicates the inserts.
pub trait CacheCollectionExt<E>: CacheCollection<E>
where
    E: StoreEntity + 'static,
{
    /// Returns the whole collection, populating it from `loader` when the
    /// cache is cold. Not scoped to a single key: one miss loads everything.
    fn get_or_set_all<F, Fut>(
        &self,
        loader: F,
    ) -> impl Future<Output = Result<Vec<E>, DomainError>> + Send
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Vec<E>, DomainError>> + Send,
    {
        async move {
            let cached = self.all().await?;

            if !cached.is_empty() {
                return Ok(cached);
            }

            let loaded = loader().await?;

            for record in &loaded {
                self.insert(record.clone()).await?;
            }

            Ok(loaded)
        }
    }

    /// Returns the first record matching `predicate`, repairing the cache
    /// from `loader` on a miss. A `None` from the loader caches nothing.
    fn get_or_set_first<F, Fut>(
        &self,
        predicate: &Predicate<E>,
        loader: F,
    ) -> impl Future<Output = Result<Option<E>, DomainError>> + Send
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Option<E>, DomainError>> + Send,
    {
        async move {
            if let Some(hit) = self.find_first(predicate).await? {
                return Ok(Some(hit));
            }

            match loader().await? {
                Some(record) => {
                    self.insert(record.clone()).await?;
                    Ok(Some(record))
                }
                None => Ok(None),
            }
        }
    }

    /// Returns every record matching `predicate`, repairing the cache from
    /// `loader` when the collection has no matches.
    fn get_or_set_where<F, Fut>(
        &self,
        predicate: &Predicate<E>,
        loader: F,
    ) -> impl Future<Output = Result<Vec<E>, DomainError>> + Send
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Vec<E>, DomainError>> + Send,
    {
        async move {
            let hits = self.find_all(predicate).await?;

            if !hits.is_empty() {
                return Ok(hits);
            }

            let loaded = loader().await?;

            for record in &loaded {
                self.insert(record.clone()).await?;
            }

            Ok(loaded)
        }
    }
}

// Blanket implementation so the extension works through `dyn CacheCollection`
impl<E, T> CacheCollectionExt<E> for T
where
    E: StoreEntity + 'static,
    T: CacheCollection<E> + ?Sized,
{
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::store::StoreKey;

    /// Mock cache collection for testing.
    ///
    /// Counts mirror calls so tests can assert that an operation touched
    /// the cache exactly as often as expected.
    #[derive(Debug)]
    pub struct MockCacheCollection<E>
    where
        E: StoreEntity,
    {
        records: Mutex<HashMap<String, E>>,
        error: Mutex<Option<String>>,
        inserts: AtomicUsize,
        updates: AtomicUsize,
        deletes: AtomicUsize,
    }

    impl<E> Default for MockCacheCollection<E>
    where
        E: StoreEntity,
    {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<E> MockCacheCollection<E>
    where
        E: StoreEntity,
    {
        pub fn new() -> Self {
            Self {
                records: Mutex::new(HashMap::new()),
                error: Mutex::new(None),
                inserts: AtomicUsize::new(0),
                updates: AtomicUsize::new(0),
                deletes: AtomicUsize::new(0),
            }
        }

        pub fn with_record(self, record: E) -> Self {
            self.records
                .lock()
                .unwrap()
                .insert(record.key().to_key(), record);
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        pub fn insert_count(&self) -> usize {
            self.inserts.load(Ordering::SeqCst)
        }

        pub fn update_count(&self) -> usize {
            self.updates.load(Ordering::SeqCst)
        }

        pub fn delete_count(&self) -> usize {
            self.deletes.load(Ordering::SeqCst)
        }

        /// Total number of mirror calls of any kind
        pub fn mirror_count(&self) -> usize {
            self.insert_count() + self.update_count() + self.delete_count()
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::cache(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl<E> CacheCollection<E> for MockCacheCollection<E>
    where
        E: StoreEntity + 'static,
    {
        async fn insert(&self, record: E) -> Result<(), DomainError> {
            self.check_error()?;
            self.inserts.fetch_add(1, Ordering::SeqCst);
            self.records
                .lock()
                .unwrap()
                .insert(record.key().to_key(), record);
            Ok(())
        }

        async fn update(&self, record: E) -> Result<(), DomainError> {
            self.check_error()?;
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.records
                .lock()
                .unwrap()
                .insert(record.key().to_key(), record);
            Ok(())
        }

        async fn delete(&self, record: &E) -> Result<bool, DomainError> {
            self.check_error()?;
            self.deletes.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .records
                .lock()
                .unwrap()
                .remove(&record.key().to_key())
                .is_some())
        }

        async fn find_by_id(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
            self.check_error()?;
            Ok(self.records.lock().unwrap().get(&key.to_key()).cloned())
        }

        async fn find_first(&self, predicate: &Predicate<E>) -> Result<Option<E>, DomainError> {
            self.check_error()?;
            Ok(self
                .records
                .lock()
                .unwrap()
                .values()
                .find(|record| predicate.matches(record))
                .cloned())
        }

        async fn find_all(&self, predicate: &Predicate<E>) -> Result<Vec<E>, DomainError> {
            self.check_error()?;
            Ok(self
                .records
                .lock()
                .unwrap()
                .values()
                .filter(|record| predicate.matches(record))
                .cloned()
                .collect())
        }

        async fn all(&self) -> Result<Vec<E>, DomainError> {
            self.check_error()?;
            Ok(self.records.lock().unwrap().values().cloned().collect())
        }

        async fn clear(&self) -> Result<(), DomainError> {
            self.check_error()?;
            self.records.lock().unwrap().clear();
            Ok(())
        }

        async fn len(&self) -> Result<usize, DomainError> {
            self.check_error()?;
            Ok(self.records.lock().unwrap().len())
        }
    }
}
