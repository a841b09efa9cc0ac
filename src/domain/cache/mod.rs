//! Cache domain - indexed cache collections with cache-aside reads

mod collection;

pub use collection::{CacheCollection, CacheCollectionExt};

#[cfg(test)]
pub use collection::mock;
