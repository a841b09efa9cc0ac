//! Transaction coordination for store writes
//!
//! Every mutating repository call funnels through [`Transactional`]. It is
//! the single point where store-level failures stop propagating as errors:
//! a failed unit of work yields the caller-supplied fallback value instead.

use std::sync::Arc;

use tracing::warn;

use crate::domain::DomainError;

use super::adapter::{Mutation, Store};
use super::entity::StoreEntity;

/// An ephemeral unit of work binding staged mutations to one
/// commit/rollback decision.
///
/// Created per write call and consumed at commit; nothing is visible in the
/// store until the whole batch applies.
#[derive(Debug)]
pub struct UnitOfWork<E> {
    mutations: Vec<Mutation<E>>,
}

impl<E> UnitOfWork<E> {
    fn new() -> Self {
        Self {
            mutations: Vec::new(),
        }
    }

    /// Stages an insert
    pub fn mark_added(&mut self, entity: E) {
        self.mutations.push(Mutation::Added(entity));
    }

    /// Stages an overwrite of an existing row
    pub fn mark_modified(&mut self, entity: E) {
        self.mutations.push(Mutation::Modified(entity));
    }

    /// Stages a delete of an existing row
    pub fn mark_removed(&mut self, entity: E) {
        self.mutations.push(Mutation::Removed(entity));
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    fn into_mutations(self) -> Vec<Mutation<E>> {
        self.mutations
    }
}

/// Wraps a unit of work around a mutation and commits or rolls back
/// atomically.
///
/// Failures during staging or at commit time are logged here and converted
/// into the fallback value; they never cross this boundary as errors, and
/// no retry is attempted.
#[derive(Debug, Clone)]
pub struct Transactional<E>
where
    E: StoreEntity + 'static,
{
    store: Arc<dyn Store<E>>,
}

impl<E> Transactional<E>
where
    E: StoreEntity + 'static,
{
    pub fn new(store: Arc<dyn Store<E>>) -> Self {
        Self { store }
    }

    /// Runs `work` against a fresh unit of work and commits the staged
    /// mutations. Returns the value produced by `work` on success, or
    /// `fallback` if staging or the commit failed.
    pub async fn run<R, F>(&self, work: F, fallback: R) -> R
    where
        R: Send,
        F: FnOnce(&mut UnitOfWork<E>) -> Result<R, DomainError> + Send,
    {
        let mut unit = UnitOfWork::new();

        let value = match work(&mut unit) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "unit of work aborted before commit");
                return fallback;
            }
        };

        if unit.is_empty() {
            return value;
        }

        match self.store.apply(unit.into_mutations()).await {
            Ok(()) => value,
            Err(err) => {
                warn!(error = %err, "transaction rolled back");
                fallback
            }
        }
    }
}
