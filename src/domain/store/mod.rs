//! Store domain - generic persistence abstraction with transactional writes

mod adapter;
mod entity;
mod predicate;
mod repository;
mod transaction;

pub use adapter::{Mutation, Store};
pub use entity::{StoreEntity, StoreKey};
pub use predicate::Predicate;
pub use repository::Repository;
pub use transaction::{Transactional, UnitOfWork};

#[cfg(test)]
pub use adapter::mock;
