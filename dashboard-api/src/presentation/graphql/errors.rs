//! Mapping of application errors onto GraphQL errors with `extensions.code`

use async_graphql::ErrorExtensions;

use dashboard_core::application::ApplicationError;

pub const BAD_USER_INPUT: &str = "BAD_USER_INPUT";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const CONFLICT: &str = "CONFLICT";
pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

/// Convert an application error, hiding internal details when `sanitize` is set
pub fn into_graphql_error(error: ApplicationError, sanitize: bool) -> async_graphql::Error {
    let code = match &error {
        ApplicationError::Domain(_) | ApplicationError::InvalidInput { .. } => BAD_USER_INPUT,
        ApplicationError::NotFound { .. } => NOT_FOUND,
        ApplicationError::Conflict { .. } => CONFLICT,
        ApplicationError::Authentication(_) => UNAUTHENTICATED,
        ApplicationError::Store(_) | ApplicationError::Configuration { .. } => {
            INTERNAL_SERVER_ERROR
        }
    };

    let message = if code == INTERNAL_SERVER_ERROR {
        tracing::error!(error = %error, error_code = code, "Resolver failed");
        if sanitize {
            "Internal server error".to_string()
        } else {
            error.to_string()
        }
    } else {
        tracing::warn!(error = %error, error_code = code, "Resolver rejected request");
        error.to_string()
    };

    async_graphql::Error::new(message).extend_with(|_, e| e.set("code", code))
}

/// `?`-friendly conversion inside resolvers
pub trait ResultExt<T> {
    fn or_graphql(self, sanitize: bool) -> async_graphql::Result<T>;
}

impl<T> ResultExt<T> for Result<T, ApplicationError> {
    fn or_graphql(self, sanitize: bool) -> async_graphql::Result<T> {
        self.map_err(|e| into_graphql_error(e, sanitize))
    }
}
