//! Site settings repository trait

use async_trait::async_trait;

use crate::domain::StoreError;

use super::entities::SiteSettings;

#[async_trait]
pub trait ISiteSettingsRepository: Send + Sync {
    /// Stored settings, or empty settings when none were ever written
    async fn get(&self) -> Result<SiteSettings, StoreError>;

    async fn update(&self, settings: &SiteSettings) -> Result<(), StoreError>;
}
