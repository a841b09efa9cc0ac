//! Store entity traits and types

use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::{Serialize, de::DeserializeOwned};

/// Trait for entity identifier types
pub trait StoreKey: Clone + Debug + Display + Send + Sync + Eq + Hash {
    /// Renders the key for backends that address rows by string
    fn to_key(&self) -> String {
        self.to_string()
    }
}

/// Trait for types the relational store can persist
pub trait StoreEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    /// The identifier type for this entity
    type Key: StoreKey;

    /// Returns the entity's identifier
    fn key(&self) -> &Self::Key;
}
