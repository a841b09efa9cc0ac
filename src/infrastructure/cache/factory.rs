//! Cache factory for runtime backend selection

use std::sync::Arc;

use crate::config::CacheSettings;
use crate::domain::DomainError;
use crate::domain::cache::CacheCollection;
use crate::domain::store::StoreEntity;

use super::in_memory::InMemoryCacheCollection;
use super::redis::{RedisCacheCollection, RedisCollectionConfig};

/// Supported cache backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// In-memory cache (for testing/development)
    InMemory,
    /// Redis cache
    Redis,
}

impl CacheBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "redis" => Some(Self::Redis),
            _ => None,
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone)]
pub enum CacheConfig {
    /// In-memory cache configuration
    InMemory,
    /// Redis cache configuration
    Redis(RedisCollectionConfig),
}

impl CacheConfig {
    /// Creates an in-memory cache configuration
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Creates a Redis cache configuration from a URL
    pub fn redis_url(url: impl Into<String>) -> Self {
        Self::Redis(RedisCollectionConfig::new(url))
    }

    /// Builds a cache configuration from the application settings
    pub fn from_settings(settings: &CacheSettings) -> Result<Self, DomainError> {
        match CacheBackend::from_str(&settings.backend) {
            Some(CacheBackend::InMemory) => Ok(Self::InMemory),
            Some(CacheBackend::Redis) => {
                Ok(Self::Redis(RedisCollectionConfig::new(&settings.redis.url)))
            }
            None => Err(DomainError::validation(format!(
                "Unknown cache backend '{}'",
                settings.backend
            ))),
        }
    }

    /// Returns the backend this configuration selects
    pub fn backend(&self) -> CacheBackend {
        match self {
            Self::InMemory => CacheBackend::InMemory,
            Self::Redis(_) => CacheBackend::Redis,
        }
    }
}

/// Factory for creating cache collections.
///
/// Collections are declared once during startup wiring; services receive
/// the already-constructed handles.
#[derive(Debug)]
pub struct CacheFactory;

impl CacheFactory {
    /// Creates a cache collection based on the configuration
    pub async fn create<E>(
        config: &CacheConfig,
        namespace: &str,
    ) -> Result<Arc<dyn CacheCollection<E>>, DomainError>
    where
        E: StoreEntity + 'static,
    {
        match config {
            CacheConfig::InMemory => Ok(Arc::new(InMemoryCacheCollection::<E>::new())),
            CacheConfig::Redis(redis_config) => {
                let collection = RedisCacheCollection::<E>::connect(redis_config, namespace).await?;
                Ok(Arc::new(collection))
            }
        }
    }

    /// Creates an in-memory cache collection
    pub fn create_in_memory<E>() -> Arc<InMemoryCacheCollection<E>>
    where
        E: StoreEntity,
    {
        Arc::new(InMemoryCacheCollection::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedisSettings;

    #[test]
    fn test_cache_backend_from_str() {
        assert_eq!(
            CacheBackend::from_str("memory"),
            Some(CacheBackend::InMemory)
        );
        assert_eq!(
            CacheBackend::from_str("in-memory"),
            Some(CacheBackend::InMemory)
        );
        assert_eq!(CacheBackend::from_str("redis"), Some(CacheBackend::Redis));
        assert_eq!(CacheBackend::from_str("unknown"), None);
    }

    #[test]
    fn test_cache_config_backends() {
        assert_eq!(CacheConfig::in_memory().backend(), CacheBackend::InMemory);
        assert_eq!(
            CacheConfig::redis_url("redis://localhost").backend(),
            CacheBackend::Redis
        );
    }

    #[test]
    fn test_from_settings() {
        let settings = CacheSettings {
            backend: "memory".to_string(),
            redis: RedisSettings::default(),
        };
        assert_eq!(
            CacheConfig::from_settings(&settings).unwrap().backend(),
            CacheBackend::InMemory
        );

        let settings = CacheSettings {
            backend: "nosuch".to_string(),
            redis: RedisSettings::default(),
        };
        assert!(CacheConfig::from_settings(&settings).is_err());
    }
}
