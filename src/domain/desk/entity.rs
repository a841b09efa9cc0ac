//! Desk entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{DeskValidationError, validate_desk_name};
use crate::domain::store::{StoreEntity, StoreKey};

/// Desk identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeskId(Uuid);

impl DeskId {
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

impl From<Uuid> for DeskId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for DeskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StoreKey for DeskId {}

/// A bookable desk in the dining room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Desk {
    id: DeskId,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Desk {
    pub fn new(name: impl Into<String>) -> Result<Self, DeskValidationError> {
        let name = name.into();
        validate_desk_name(&name)?;
        let now = Utc::now();

        Ok(Self {
            id: DeskId::generate(),
            name,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> DeskId {
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

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), DeskValidationError> {
        let name = name.into();
        validate_desk_name(&name)?;
        self.name = name;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl StoreEntity for Desk {
    type Key = DeskId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
