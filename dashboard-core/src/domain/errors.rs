//! Domain and persistence errors

use thiserror::Error;

/// Validation failures on incoming documents
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A required field is missing or blank
    #[error("{entity}.{field} is required")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// A field is present but malformed
    #[error("{entity}.{field} is invalid: {reason}")]
    InvalidField {
        entity: &'static str,
        field: &'static str,
        reason: String,
    },
}

impl DomainError {
    pub fn missing(entity: &'static str, field: &'static str) -> Self {
        Self::MissingField { entity, field }
    }

    pub fn invalid(entity: &'static str, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            entity,
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised by persistence drivers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Document does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Document already exists
    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: &'static str, id: String },

    /// Stored revision moved on since the document was read
    #[error("{kind} {id} was modified concurrently (expected revision {expected}, found {actual})")]
    Conflict {
        kind: &'static str,
        id: String,
        expected: u64,
        actual: u64,
    },

    /// Document could not be (de)serialized
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Database operation failed
    #[error("Database error: {message}")]
    Database { message: String },
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}
