//! Session JWT service

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::sync::Arc;

use crate::domain::auth::{AuthError, SessionClaims, SessionUser};

/// Issues and verifies HS256 session tokens carried by the session cookie
#[derive(Clone)]
pub struct SessionService {
    secret: Arc<String>,
    ttl_hours: u64,
}

impl SessionService {
    pub fn new(secret: String, ttl_hours: u64) -> Self {
        Self {
            secret: Arc::new(secret),
            ttl_hours,
        }
    }

    /// Sign a session token for `email`
    pub fn issue(&self, email: &str, name: Option<String>) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.ttl_hours as i64);

        let claims = SessionClaims {
            sub: email.to_string(),
            name,
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(|e| {
            tracing::error!("Failed to encode session token: {}", e);
            AuthError::InvalidToken
        })
    }

    /// Verify a session token and return its user
    pub fn validate(&self, token: &str) -> Result<SessionUser, AuthError> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<SessionClaims>(token, &decoding_key, &validation)
            .map(|data| SessionUser::from(data.claims))
            .map_err(|e| {
                tracing::debug!("Session token validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    #[test]
    fn test_issue_and_validate() {
        let service = SessionService::new(SECRET.to_string(), 24);
        let token = service
            .issue("dev@example.com", Some("Dev".to_string()))
            .unwrap();

        let user = service.validate(&token).unwrap();
        assert_eq!(user.email, "dev@example.com");
        assert_eq!(user.name.as_deref(), Some("Dev"));
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let issuer = SessionService::new(SECRET.to_string(), 24);
        let other =
            SessionService::new("another-secret-key-at-least-32-characters".to_string(), 24);
        let token = issuer.issue("dev@example.com", None).unwrap();

        assert_eq!(other.validate(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_garbage_rejected() {
        let service = SessionService::new(SECRET.to_string(), 24);
        assert!(service.validate("not.a.jwt").is_err());
    }
}
