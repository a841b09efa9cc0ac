//! Discriminated operation results returned by domain services
//!
//! Controllers translate these directly into transport responses; no store
//! or cache error detail ever crosses this boundary.

use tracing::error;

use crate::domain::DomainError;

/// Outcome of a service operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceResult<T> {
    /// The operation succeeded and produced a value
    Success(T),
    /// A new record was created
    Created(T),
    /// The operation succeeded with nothing to return
    NoContent,
    /// The referenced record does not exist
    NotFound(String),
    /// Input failed validation; no I/O was performed
    Invalid(String),
    /// A uniqueness constraint would be violated
    Conflict(String),
    /// The underlying write did not commit
    Error(String),
}

impl<T> ServiceResult<T> {
    pub fn success(value: T) -> Self {
        Self::Success(value)
    }

    pub fn created(value: T) -> Self {
        Self::Created(value)
    }

    pub fn no_content() -> Self {
        Self::NoContent
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound(reason.into())
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict(reason.into())
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self::Error(reason.into())
    }

    /// Whether the operation succeeded (with or without a value)
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Created(_) | Self::NoContent)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) | Self::Created(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Success(value) | Self::Created(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<DomainError> for ServiceResult<T> {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::NotFound(message),
            DomainError::Validation { message } => Self::Invalid(message),
            DomainError::Conflict { message } => Self::Conflict(message),
            other => {
                // Internal cause is logged here, never surfaced to the caller.
                error!(error = %other, "data access failure");
                Self::Error("something went wrong, try again later".to_string())
            }
        }
    }
}
