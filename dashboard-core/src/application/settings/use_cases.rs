//! Settings and user use cases

use std::sync::Arc;
use tracing::{info, instrument};

use crate::application::errors::ApplicationError;
use crate::application::federation::version_manager::load_member;
use crate::application::webhooks::WebhookNotifier;
use crate::domain::federation::{IApplicationRepository, IGroupRepository};
use crate::domain::settings::{
    ISiteSettingsRepository, SiteSettings, TrackedSettings, WebhookEventType,
};
use crate::domain::users::{IUserRepository, User};

/// Replace the tracked-URL settings of an application
pub struct UpdateApplicationSettingsUseCase {
    applications: Arc<dyn IApplicationRepository>,
    notifier: WebhookNotifier,
}

impl UpdateApplicationSettingsUseCase {
    pub fn new(applications: Arc<dyn IApplicationRepository>, notifier: WebhookNotifier) -> Self {
        Self {
            applications,
            notifier,
        }
    }

    #[instrument(skip(self, settings))]
    pub async fn execute(
        &self,
        group: &str,
        application: &str,
        settings: TrackedSettings,
    ) -> Result<TrackedSettings, ApplicationError> {
        let mut app = load_member(self.applications.as_ref(), group, application).await?;
        app.settings = Some(settings.clone());

        let saved = self.applications.update(&app).await?;
        self.notifier
            .notify(WebhookEventType::UpdateApplication, &saved)
            .await;

        Ok(settings)
    }
}

/// Replace the tracked-URL settings of a group
pub struct UpdateGroupSettingsUseCase {
    groups: Arc<dyn IGroupRepository>,
}

impl UpdateGroupSettingsUseCase {
    pub fn new(groups: Arc<dyn IGroupRepository>) -> Self {
        Self { groups }
    }

    #[instrument(skip(self, settings))]
    pub async fn execute(
        &self,
        group: &str,
        settings: TrackedSettings,
    ) -> Result<TrackedSettings, ApplicationError> {
        let mut stored = self
            .groups
            .find(group)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Group", group))?;
        stored.settings = Some(settings.clone());
        self.groups.update(&stored).await?;
        Ok(settings)
    }
}

/// Persist site settings and hand back what is stored
pub struct UpdateSiteSettingsUseCase {
    site_settings: Arc<dyn ISiteSettingsRepository>,
}

impl UpdateSiteSettingsUseCase {
    pub fn new(site_settings: Arc<dyn ISiteSettingsRepository>) -> Self {
        Self { site_settings }
    }

    /// `None` leaves the stored settings untouched
    #[instrument(skip_all)]
    pub async fn execute(
        &self,
        settings: Option<SiteSettings>,
    ) -> Result<SiteSettings, ApplicationError> {
        if let Some(settings) = settings {
            info!(
                webhooks = settings.webhooks.len(),
                tokens = settings.tokens.len(),
                "Updating site settings"
            );
            self.site_settings.update(&settings).await?;
        }
        Ok(self.site_settings.get().await?)
    }
}

/// Upsert a user keyed by email
pub struct UpdateUserUseCase {
    users: Arc<dyn IUserRepository>,
}

impl UpdateUserUseCase {
    pub fn new(users: Arc<dyn IUserRepository>) -> Self {
        Self { users }
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn execute(&self, user: User) -> Result<User, ApplicationError> {
        if user.email.trim().is_empty() {
            return Err(ApplicationError::invalid_input("email is required"));
        }
        let user = User {
            id: user.email.clone(),
            ..user
        };
        self.users.update(&user).await?;
        Ok(self.users.find(&user.id).await?.unwrap_or(user))
    }
}
