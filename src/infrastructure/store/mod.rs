//! Store infrastructure - relational store implementations

mod factory;
mod in_memory;
mod postgres;

pub use factory::{StoreBackend, StoreConfig, StoreFactory};
pub use in_memory::InMemoryStore;
pub use postgres::{PostgresConfig, PostgresStore};
