//! Reverse lookups over consumed modules

use futures::future::try_join_all;
use std::sync::Arc;
use tracing::instrument;

use crate::application::errors::ApplicationError;
use crate::domain::federation::{Consume, IApplicationRepository, IApplicationVersionRepository};

pub struct ModuleManager {
    applications: Arc<dyn IApplicationRepository>,
    versions: Arc<dyn IApplicationVersionRepository>,
}

impl ModuleManager {
    pub fn new(
        applications: Arc<dyn IApplicationRepository>,
        versions: Arc<dyn IApplicationVersionRepository>,
    ) -> Self {
        Self {
            applications,
            versions,
        }
    }

    /// Consume records pointing at `module_name` of `application_id`.
    ///
    /// Only latest versions count. `group` narrows the consumers to one
    /// group and `environment` to one environment.
    #[instrument(skip(self))]
    pub async fn consumed_by(
        &self,
        group: Option<&str>,
        environment: Option<&str>,
        application_id: &str,
        module_name: &str,
    ) -> Result<Vec<Consume>, ApplicationError> {
        let applications = match group {
            Some(group) => {
                self.applications
                    .find_in_groups(&[group.to_string()])
                    .await?
            }
            None => self.applications.find_all().await?,
        };

        let per_application = try_join_all(
            applications
                .iter()
                .map(|app| self.versions.find_all(&app.id, environment)),
        )
        .await?;

        Ok(per_application
            .iter()
            .flatten()
            .filter(|v| v.latest)
            .flat_map(|v| v.consumes.iter())
            .filter(|c| c.targets(application_id, module_name))
            .cloned()
            .collect())
    }
}
