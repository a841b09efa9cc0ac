//! Store factory for runtime backend selection

use std::sync::Arc;

use crate::config::StoreSettings;
use crate::domain::DomainError;
use crate::domain::store::{Store, StoreEntity};

use super::in_memory::InMemoryStore;
use super::postgres::{PostgresConfig, PostgresStore};

/// Supported store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-memory store (for testing/development)
    InMemory,
    /// PostgreSQL store
    Postgres,
}

impl StoreBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Store configuration
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// In-memory store configuration
    InMemory,
    /// PostgreSQL store configuration
    Postgres(PostgresConfig),
}

impl StoreConfig {
    /// Creates an in-memory store configuration
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Creates a PostgreSQL store configuration
    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    /// Creates a PostgreSQL configuration from a URL
    pub fn postgres_url(url: impl Into<String>) -> Self {
        Self::Postgres(PostgresConfig::new(url))
    }

    /// Builds a store configuration from the application settings
    pub fn from_settings(settings: &StoreSettings) -> Result<Self, DomainError> {
        match StoreBackend::from_str(&settings.backend) {
            Some(StoreBackend::InMemory) => Ok(Self::InMemory),
            Some(StoreBackend::Postgres) => Ok(Self::Postgres(
                PostgresConfig::new(&settings.postgres.url)
                    .with_max_connections(settings.postgres.max_connections)
                    .with_min_connections(settings.postgres.min_connections)
                    .with_connect_timeout(settings.postgres.connect_timeout_secs)
                    .with_idle_timeout(settings.postgres.idle_timeout_secs),
            )),
            None => Err(DomainError::validation(format!(
                "Unknown store backend '{}'",
                settings.backend
            ))),
        }
    }

    /// Returns the backend this configuration selects
    pub fn backend(&self) -> StoreBackend {
        match self {
            Self::InMemory => StoreBackend::InMemory,
            Self::Postgres(_) => StoreBackend::Postgres,
        }
    }
}

/// Factory for creating store instances
#[derive(Debug)]
pub struct StoreFactory;

impl StoreFactory {
    /// Creates a store instance based on the configuration
    pub async fn create<E>(
        config: &StoreConfig,
        table_name: &str,
    ) -> Result<Arc<dyn Store<E>>, DomainError>
    where
        E: StoreEntity + 'static,
    {
        match config {
            StoreConfig::InMemory => Ok(Arc::new(InMemoryStore::<E>::new())),
            StoreConfig::Postgres(pg_config) => {
                let store = PostgresStore::<E>::connect(pg_config, table_name).await?;
                store.ensure_table().await?;
                Ok(Arc::new(store))
            }
        }
    }

    /// Creates an in-memory store
    pub fn create_in_memory<E>() -> Arc<InMemoryStore<E>>
    where
        E: StoreEntity,
    {
        Arc::new(InMemoryStore::new())
    }

    /// Creates a PostgreSQL store over an existing pool
    pub fn create_postgres_with_pool<E>(
        pool: sqlx::PgPool,
        table_name: &str,
    ) -> Arc<PostgresStore<E>>
    where
        E: StoreEntity + 'static,
    {
        Arc::new(PostgresStore::new(pool, table_name))
    }
}
