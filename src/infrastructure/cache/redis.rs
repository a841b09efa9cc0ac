//! Redis cache collection implementation

use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::DomainError;
use crate::domain::cache::CacheCollection;
use crate::domain::store::{Predicate, StoreEntity, StoreKey};

/// Configuration for Redis-backed cache collections
#[derive(Debug, Clone)]
pub struct RedisCollectionConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
}

impl Default for RedisCollectionConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

impl RedisCollectionConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Redis-backed cache collection.
///
/// Each record is one JSON value under `{namespace}:{key}`. Collection
/// reads SCAN the namespace and predicate evaluation happens in-process,
/// against the same [`Predicate`] the store uses. Entries carry no TTL;
/// they live until explicitly deleted.
#[derive(Clone)]
pub struct RedisCacheCollection<E>
where
    E: StoreEntity,
{
    connection: ConnectionManager,
    namespace: String,
    _phantom: PhantomData<E>,
}

impl<E> fmt::Debug for RedisCacheCollection<E>
where
    E: StoreEntity,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCacheCollection")
            .field("namespace", &self.namespace)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl<E> RedisCacheCollection<E>
where
    E: StoreEntity,
{
    /// Connects to Redis and namespaces this collection's keys
    pub async fn connect(
        config: &RedisCollectionConfig,
        namespace: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self::with_connection(connection, namespace))
    }

    /// Wraps an existing connection manager
    pub fn with_connection(connection: ConnectionManager, namespace: impl Into<String>) -> Self {
        Self {
            connection,
            namespace: namespace.into(),
            _phantom: PhantomData,
        }
    }

    fn record_key(&self, key: &E::Key) -> String {
        format!("{}:{}", self.namespace, key.to_key())
    }

    fn scan_pattern(&self) -> String {
        format!("{}:*", self.namespace)
    }

    fn serialize(record: &E) -> Result<String, DomainError> {
        serde_json::to_string(record)
            .map_err(|e| DomainError::cache(format!("Failed to serialize cache record: {}", e)))
    }

    fn deserialize(data: &str) -> Result<E, DomainError> {
        serde_json::from_str(data)
            .map_err(|e| DomainError::cache(format!("Failed to deserialize cache record: {}", e)))
    }

    async fn store_record(&self, record: &E) -> Result<(), DomainError> {
        let key = self.record_key(record.key());
        let data = Self::serialize(record)?;
        let mut conn = self.connection.clone();

        let _: () = conn
            .set(&key, data)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(())
    }

    /// Collects every key in this collection's namespace.
    ///
    /// SCAN instead of KEYS so a large collection does not block the server.
    async fn collection_keys(&self) -> Result<Vec<String>, DomainError> {
        let pattern = self.scan_pattern();
        let mut conn = self.connection.clone();
        let mut cursor = 0u64;
        let mut keys = Vec::new();

        loop {
            let (new_cursor, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    DomainError::cache(format!(
                        "Failed to scan keys with pattern '{}': {}",
                        pattern, e
                    ))
                })?;

            keys.extend(batch);
            cursor = new_cursor;

            if cursor == 0 {
                break;
            }
        }

        Ok(keys)
    }

    async fn fetch_records(&self, keys: &[String]) -> Result<Vec<E>, DomainError> {
        let mut conn = self.connection.clone();
        let mut records = Vec::with_capacity(keys.len());

        for key in keys {
            let data: Option<String> = conn
                .get(key)
                .await
                .map_err(|e| DomainError::cache(format!("Failed to get key '{}': {}", key, e)))?;

            // A record deleted between SCAN and GET is simply skipped.
            if let Some(data) = data {
                records.push(Self::deserialize(&data)?);
            }
        }

        Ok(records)
    }
}

#[async_trait]
impl<E> CacheCollection<E> for RedisCacheCollection<E>
where
    E: StoreEntity + 'static,
{
    async fn insert(&self, record: E) -> Result<(), DomainError> {
        self.store_record(&record).await
    }

    async fn update(&self, record: E) -> Result<(), DomainError> {
        self.store_record(&record).await
    }

    async fn delete(&self, record: &E) -> Result<bool, DomainError> {
        let key = self.record_key(record.key());
        let mut conn = self.connection.clone();

        let deleted: i32 = conn
            .del(&key)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to delete key '{}': {}", key, e)))?;

        Ok(deleted > 0)
    }

    async fn find_by_id(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let record_key = self.record_key(key);
        let mut conn = self.connection.clone();

        let data: Option<String> = conn.get(&record_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to get key '{}': {}", record_key, e))
        })?;

        match data {
            Some(data) => Ok(Some(Self::deserialize(&data)?)),
            None => Ok(None),
        }
    }

    async fn find_first(&self, predicate: &Predicate<E>) -> Result<Option<E>, DomainError> {
        let records = self.all().await?;
        Ok(records.into_iter().find(|record| predicate.matches(record)))
    }

    async fn find_all(&self, predicate: &Predicate<E>) -> Result<Vec<E>, DomainError> {
        let records = self.all().await?;
        Ok(records
            .into_iter()
            .filter(|record| predicate.matches(record))
            .collect())
    }

    async fn all(&self) -> Result<Vec<E>, DomainError> {
        let keys = self.collection_keys().await?;
        self.fetch_records(&keys).await
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let keys = self.collection_keys().await?;

        if keys.is_empty() {
            return Ok(());
        }

        let mut conn = self.connection.clone();
        let _: i32 = conn
            .del(&keys)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to clear collection: {}", e)))?;

        Ok(())
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.collection_keys().await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_collection_config() {
        let config = RedisCollectionConfig::new("redis://cache:6379");
        assert_eq!(config.url, "redis://cache:6379");

        let default = RedisCollectionConfig::default();
        assert_eq!(default.url, "redis://127.0.0.1:6379");
    }
}
