//! Generic repository over one entity kind

use std::sync::Arc;

use crate::domain::DomainError;

use super::adapter::Store;
use super::entity::StoreEntity;
use super::predicate::Predicate;
use super::transaction::Transactional;

/// Typed CRUD/query surface over a single entity kind.
///
/// Reads go straight to the store and propagate errors; every mutating call
/// passes through the [`Transactional`] coordinator, so a failed write
/// surfaces as a sentinel value (`None`/`false`) with the store untouched.
#[derive(Debug, Clone)]
pub struct Repository<E>
where
    E: StoreEntity + 'static,
{
    store: Arc<dyn Store<E>>,
    transactional: Transactional<E>,
}

impl<E> Repository<E>
where
    E: StoreEntity + 'static,
{
    pub fn new(store: Arc<dyn Store<E>>) -> Self {
        Self {
            transactional: Transactional::new(Arc::clone(&store)),
            store,
        }
    }

    /// Full scan of all rows
    pub async fn select_all(&self) -> Result<Vec<E>, DomainError> {
        self.store.list().await
    }

    /// Full scan projected into `R`
    pub async fn select_all_as<R>(&self) -> Result<Vec<R>, DomainError>
    where
        R: From<E>,
    {
        Ok(self.store.list().await?.into_iter().map(R::from).collect())
    }

    /// Lookup by primary key; absence is `None`, not an error
    pub async fn select_by_id(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        self.store.get(key).await
    }

    /// All rows matching the predicate
    pub async fn where_all(&self, predicate: &Predicate<E>) -> Result<Vec<E>, DomainError> {
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|entity| predicate.matches(entity))
            .collect())
    }

    /// First row matching the predicate
    pub async fn where_first(&self, predicate: &Predicate<E>) -> Result<Option<E>, DomainError> {
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .find(|entity| predicate.matches(entity)))
    }

    /// All matching rows projected into `R`
    pub async fn where_all_as<R>(&self, predicate: &Predicate<E>) -> Result<Vec<R>, DomainError>
    where
        R: From<E>,
    {
        Ok(self.where_all(predicate).await?.into_iter().map(R::from).collect())
    }

    /// First matching row projected into `R`
    pub async fn where_first_as<R>(
        &self,
        predicate: &Predicate<E>,
    ) -> Result<Option<R>, DomainError>
    where
        R: From<E>,
    {
        Ok(self.where_first(predicate).await?.map(R::from))
    }

    /// Inserts the entity through the transaction coordinator.
    ///
    /// Returns the inserted entity, or `None` when the transaction failed.
    pub async fn add(&self, entity: E) -> Option<E> {
        self.transactional
            .run(
                move |unit| {
                    unit.mark_added(entity.clone());
                    Ok(Some(entity))
                },
                None,
            )
            .await
    }

    /// Overwrites the entity's row; returns whether the transaction committed
    pub async fn update(&self, entity: E) -> bool {
        self.transactional
            .run(
                move |unit| {
                    unit.mark_modified(entity);
                    Ok(true)
                },
                false,
            )
            .await
    }

    /// Deletes the entity's row; returns whether the transaction committed
    pub async fn remove(&self, entity: E) -> bool {
        self.transactional
            .run(
                move |unit| {
                    unit.mark_removed(entity);
                    Ok(true)
                },
                false,
            )
            .await
    }
}
