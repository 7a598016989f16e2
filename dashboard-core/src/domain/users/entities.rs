//! Dashboard users

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Always equal to `email`
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub groups: Option<Vec<String>>,
    #[serde(default)]
    pub default_group: Option<String>,
}

impl User {
    /// Build a user keyed by its email
    pub fn with_email(
        email: impl Into<String>,
        name: Option<String>,
        groups: Option<Vec<String>>,
        default_group: Option<String>,
    ) -> Self {
        let email = email.into();
        Self {
            id: email.clone(),
            email,
            name,
            groups,
            default_group,
        }
    }
}
