//! Intake of versions posted by the federation build plugin

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::application::errors::ApplicationError;
use crate::application::webhooks::WebhookNotifier;
use crate::domain::federation::{
    Application, ApplicationVersion, Group, IApplicationRepository, IApplicationVersionRepository,
    IGroupRepository, Metadata,
};
use crate::domain::settings::WebhookEventType;
use crate::domain::{DomainError, StoreError};

/// Application descriptor sent alongside a version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestApplication {
    pub id: String,
    pub name: String,
    pub group: String,
    #[serde(default)]
    pub metadata: Vec<Metadata>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl IngestApplication {
    pub fn validate(&self) -> Result<(), DomainError> {
        for (value, field) in [
            (&self.id, "id"),
            (&self.name, "name"),
            (&self.group, "group"),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::missing("Application", field));
            }
        }
        Ok(())
    }
}

pub struct IngestVersionUseCase {
    groups: Arc<dyn IGroupRepository>,
    applications: Arc<dyn IApplicationRepository>,
    versions: Arc<dyn IApplicationVersionRepository>,
    notifier: WebhookNotifier,
    version_manager: bool,
}

impl IngestVersionUseCase {
    pub fn new(
        groups: Arc<dyn IGroupRepository>,
        applications: Arc<dyn IApplicationRepository>,
        versions: Arc<dyn IApplicationVersionRepository>,
        notifier: WebhookNotifier,
        version_manager: bool,
    ) -> Self {
        Self {
            groups,
            applications,
            versions,
            notifier,
            version_manager,
        }
    }

    /// Validate and store a posted version, creating its group and application when missing.
    ///
    /// Without version management every posted build goes live at once, so
    /// it is stored as latest. With it, the posted flag is kept and
    /// promotion happens through publishing.
    #[instrument(skip(self, application, version), fields(application_id = %application.id, environment = %version.environment))]
    pub async fn execute(
        &self,
        application: IngestApplication,
        mut version: ApplicationVersion,
    ) -> Result<ApplicationVersion, ApplicationError> {
        application.validate()?;
        version.validate(self.version_manager)?;

        if version.application_id != application.id {
            return Err(ApplicationError::invalid_input(format!(
                "version.applicationId '{}' does not match application.id '{}'",
                version.application_id, application.id
            )));
        }

        self.ensure_group(&application.group).await?;
        let app = self.upsert_application(application).await?;

        if !self.version_manager {
            version.latest = true;
        }
        self.versions.save(&version).await?;

        info!(
            version = %version.version,
            latest = version.latest,
            "Application version stored"
        );

        self.notifier
            .notify(WebhookEventType::UpdateApplication, &app)
            .await;
        self.notifier
            .notify(WebhookEventType::UpdateApplicationVersion, &version)
            .await;

        Ok(version)
    }

    async fn ensure_group(&self, name: &str) -> Result<(), ApplicationError> {
        if self.groups.find(name).await?.is_some() {
            return Ok(());
        }
        match self.groups.create(&Group::new(name)).await {
            Ok(_) => {
                debug!(group = %name, "Created group");
                Ok(())
            }
            // lost a creation race, the group is there now
            Err(StoreError::AlreadyExists { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn upsert_application(
        &self,
        incoming: IngestApplication,
    ) -> Result<Application, ApplicationError> {
        match self.applications.find(&incoming.id).await? {
            Some(mut existing) => {
                existing.name = incoming.name;
                existing.group = incoming.group;
                existing.metadata = incoming.metadata;
                existing.tags = incoming.tags;
                Ok(self.applications.update(&existing).await?)
            }
            None => {
                let mut app = Application::new(incoming.id, incoming.name, incoming.group);
                app.metadata = incoming.metadata;
                app.tags = incoming.tags;
                Ok(self.applications.create(&app).await?)
            }
        }
    }
}
