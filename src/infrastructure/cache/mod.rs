//! Cache infrastructure - cache collection implementations

mod factory;
mod in_memory;
mod redis;

pub use factory::{CacheBackend, CacheConfig, CacheFactory};
pub use in_memory::InMemoryCacheCollection;
pub use self::redis::{RedisCacheCollection, RedisCollectionConfig};
