//! Application-level error umbrella

use thiserror::Error;

use crate::domain::auth::AuthError;
use crate::domain::{DomainError, StoreError};

#[derive(Error, Debug, Clone)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Storage error: {0}")]
    Store(StoreError),

    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl ApplicationError {
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

impl From<StoreError> for ApplicationError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { kind, id } => Self::NotFound {
                resource: kind.to_string(),
                id,
            },
            conflict @ StoreError::Conflict { .. } => Self::Conflict {
                message: conflict.to_string(),
            },
            conflict @ StoreError::AlreadyExists { .. } => Self::Conflict {
                message: conflict.to_string(),
            },
            other => Self::Store(other),
        }
    }
}
