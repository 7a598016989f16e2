//! Shared-token matching for the auth gate

use subtle::ConstantTimeEq;

use crate::domain::settings::SiteSettings;

use super::internal_token::InternalToken;

/// Candidate tokens a request may present
pub struct TokenMatcher {
    configured: Vec<String>,
    internal: Option<InternalToken>,
}

impl TokenMatcher {
    pub fn new(settings: &SiteSettings, internal: Option<InternalToken>) -> Self {
        Self {
            configured: settings
                .tokens
                .iter()
                .map(|t| t.value.clone())
                .filter(|v| !v.is_empty())
                .collect(),
            internal,
        }
    }

    /// No tokens configured in site settings. The internal token alone does not enable auth.
    pub fn is_empty(&self) -> bool {
        self.configured.is_empty()
    }

    /// Constant-time comparison against every configured token and the internal token
    pub fn matches(&self, presented: &str) -> bool {
        if presented.is_empty() {
            return false;
        }

        let presented = presented.as_bytes();
        let mut matched = false;
        for candidate in self
            .configured
            .iter()
            .map(String::as_str)
            .chain(self.internal.as_ref().map(InternalToken::expose))
        {
            matched |= bool::from(candidate.as_bytes().ct_eq(presented));
        }
        matched
    }
}
