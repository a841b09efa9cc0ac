//! Customer entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{
    CustomerValidationError, validate_customer_email, validate_customer_name,
};
use crate::domain::store::{StoreEntity, StoreKey};

/// Customer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(Uuid);

impl CustomerId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(value)?))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for CustomerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StoreKey for CustomerId {}

/// A registered customer.
///
/// Email addresses are unique; the uniqueness check on creation runs
/// against the store, never the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, CustomerValidationError> {
        let name = name.into();
        let email = email.into();
        validate_customer_name(&name)?;
        validate_customer_email(&email)?;
        let now = Utc::now();

        Ok(Self {
            id: CustomerId::generate(),
            name,
            email,
            created_at: now,
            updated_at: now,
        })
    }

    // Getters

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), CustomerValidationError> {
        let name = name.into();
        validate_customer_name(&name)?;
        self.name = name;
        self.touch();
        Ok(())
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), CustomerValidationError> {
        let email = email.into();
        validate_customer_email(&email)?;
        self.email = email;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl StoreEntity for Customer {
    type Key = CustomerId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
