//! Configuration validation module

use crate::config::{
    AuthConfig, DatabaseConfig, DriverKind, LoggingConfig, ServerConfig, WebhookConfig,
};
use crate::infrastructure::network::IpAllowList;

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Server configuration error: {message}")]
    Server { message: String },

    #[error("Database configuration error: {message}")]
    Database { message: String },

    #[error("Authentication configuration error: {message}")]
    Auth { message: String },

    #[error("Webhook configuration error: {message}")]
    Webhooks { message: String },

    #[error("Logging configuration error: {message}")]
    Logging { message: String },
}

impl ValidationError {
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub fn webhooks(message: impl Into<String>) -> Self {
        Self::Webhooks {
            message: message.into(),
        }
    }

    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // u16 cannot exceed 65535, so only zero needs rejecting
        if self.port == 0 {
            return Err(ValidationError::server(format!(
                "Port must be in range 1-65535, got {}",
                self.port
            )));
        }

        if self.host.is_empty() {
            return Err(ValidationError::server("Host cannot be empty"));
        }

        if self.request_timeout_seconds == 0 {
            return Err(ValidationError::server(
                "Request timeout must be greater than 0",
            ));
        }

        IpAllowList::parse(&self.ip_allowlist)
            .map_err(|e| ValidationError::server(format!("Invalid ip_allowlist: {}", e)))?;
        IpAllowList::parse(&self.trusted_proxies)
            .map_err(|e| ValidationError::server(format!("Invalid trusted_proxies: {}", e)))?;

        Ok(())
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.driver != DriverKind::Postgres {
            return Ok(());
        }

        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::database(
                "Database URL must start with postgres:// or postgresql://",
            ));
        }

        if self.max_connections == 0 {
            return Err(ValidationError::database(
                "max_connections must be greater than 0",
            ));
        }

        if let Some(min_idle) = self.min_idle
            && min_idle > self.max_connections
        {
            return Err(ValidationError::database(format!(
                "min_idle ({}) cannot exceed max_connections ({})",
                min_idle, self.max_connections
            )));
        }

        if self.connect_timeout_seconds == 0 {
            return Err(ValidationError::database(
                "connect_timeout_seconds must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Validate for AuthConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.session_secret.len() < 32 {
            return Err(ValidationError::auth(
                "session_secret must be at least 32 characters long",
            ));
        }

        if self.session_cookie.trim().is_empty() {
            return Err(ValidationError::auth("session_cookie cannot be empty"));
        }

        if self.session_ttl_hours == 0 {
            return Err(ValidationError::auth(
                "session_ttl_hours must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Validate for WebhookConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.enabled && self.timeout_seconds == 0 {
            return Err(ValidationError::webhooks(
                "timeout_seconds must be greater than 0 when webhooks are enabled",
            ));
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.format.as_str() {
            "json" | "pretty" | "compact" => {}
            other => {
                return Err(ValidationError::logging(format!(
                    "format must be one of json, pretty, compact; got {}",
                    other
                )));
            }
        }

        if self.level.trim().is_empty() {
            return Err(ValidationError::logging("level cannot be empty"));
        }

        Ok(())
    }
}
