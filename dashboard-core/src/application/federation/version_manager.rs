//! Publishing versions and pinning remotes

use std::sync::Arc;
use tracing::{info, instrument};

use crate::application::errors::ApplicationError;
use crate::application::webhooks::WebhookNotifier;
use crate::domain::federation::{
    Application, ApplicationVersion, IApplicationRepository, IApplicationVersionRepository,
};
use crate::domain::settings::WebhookEventType;

/// Load an application and check it belongs to `group`
pub(crate) async fn load_member(
    applications: &dyn IApplicationRepository,
    group: &str,
    application: &str,
) -> Result<Application, ApplicationError> {
    match applications.find(application).await? {
        Some(app) if app.belongs_to(group) => Ok(app),
        _ => Err(ApplicationError::not_found(
            "Application",
            format!("{}/{}", group, application),
        )),
    }
}

pub struct VersionManager {
    applications: Arc<dyn IApplicationRepository>,
    versions: Arc<dyn IApplicationVersionRepository>,
    notifier: WebhookNotifier,
}

impl VersionManager {
    pub fn new(
        applications: Arc<dyn IApplicationRepository>,
        versions: Arc<dyn IApplicationVersionRepository>,
        notifier: WebhookNotifier,
    ) -> Self {
        Self {
            applications,
            versions,
            notifier,
        }
    }

    /// Mark `version` latest in every environment it was posted to.
    ///
    /// Returns the most recently posted of the promoted records.
    #[instrument(skip(self))]
    pub async fn publish_version(
        &self,
        group: &str,
        application: &str,
        version: &str,
    ) -> Result<ApplicationVersion, ApplicationError> {
        let app = load_member(self.applications.as_ref(), group, application).await?;

        let mut matching: Vec<ApplicationVersion> = self
            .versions
            .find_all(&app.id, None)
            .await?
            .into_iter()
            .filter(|v| v.version == version)
            .collect();

        if matching.is_empty() {
            return Err(ApplicationError::not_found(
                "ApplicationVersion",
                format!("{}@{}", app.id, version),
            ));
        }

        for record in matching.iter_mut() {
            record.latest = true;
            self.versions.save(record).await?;
        }

        let published = matching
            .into_iter()
            .max_by_key(|v| v.posted)
            .ok_or_else(|| ApplicationError::not_found("ApplicationVersion", version))?;

        info!(
            application = %app.id,
            version = %version,
            environment = %published.environment,
            "Version published"
        );
        self.notifier
            .notify(WebhookEventType::UpdateApplicationVersion, &published)
            .await;

        Ok(published)
    }

    /// Pin `remote` to `version` for this application, or unpin it when `version` is `None`
    #[instrument(skip(self))]
    pub async fn set_remote_version(
        &self,
        group: &str,
        application: &str,
        remote: &str,
        version: Option<String>,
    ) -> Result<Application, ApplicationError> {
        let mut app = load_member(self.applications.as_ref(), group, application).await?;
        app.set_remote_override(remote, version);

        let saved = self.applications.update(&app).await?;
        self.notifier
            .notify(WebhookEventType::UpdateApplication, &saved)
            .await;

        Ok(saved)
    }
}
