//! Per-process internal token.
//!
//! Generated once at startup and accepted by the auth gate for calls the
//! dashboard makes to itself. It is never persisted and never logged.

use rand::{Rng, distr::Alphanumeric};
use std::fmt;
use std::sync::Arc;

pub const INTERNAL_TOKEN_LENGTH: usize = 16;

#[derive(Clone, PartialEq, Eq)]
pub struct InternalToken(Arc<str>);

impl InternalToken {
    /// Random alphanumeric token of [`INTERNAL_TOKEN_LENGTH`] characters
    pub fn generate() -> Self {
        let token: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(INTERNAL_TOKEN_LENGTH)
            .map(char::from)
            .collect();
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for InternalToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InternalToken([REDACTED])")
    }
}
