//! Employee role entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{RoleValidationError, validate_role_name};
use crate::domain::store::{StoreEntity, StoreKey};

/// Employee role identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its canonical string form
    pub fn parse(value: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(value)?))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for RoleId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StoreKey for RoleId {}

/// An employee role such as "waiter" or "manager".
///
/// Role names are unique across the restaurant; the uniqueness check runs
/// against the store, never the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRole {
    /// Unique identifier
    id: RoleId,
    /// Display name, unique per restaurant
    name: String,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl EmployeeRole {
    /// Create a new role with a generated identifier
    pub fn new(name: impl Into<String>) -> Result<Self, RoleValidationError> {
        let name = name.into();
        validate_role_name(&name)?;
        let now = Utc::now();

        Ok(Self {
            id: RoleId::generate(),
            name,
            created_at: now,
            updated_at: now,
        })
    }

    // Getters

    pub fn id(&self) -> RoleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Rename the role
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), RoleValidationError> {
        let name = name.into();
        validate_role_name(&name)?;
        self.name = name;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl StoreEntity for EmployeeRole {
    type Key = RoleId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
