//! Read-side lookups used by the GraphQL resolvers

use std::sync::Arc;
use tracing::instrument;

use crate::application::errors::ApplicationError;
use crate::domain::federation::{
    Application, ApplicationVersion, Group, IApplicationRepository, IApplicationVersionRepository,
    IGroupRepository,
};

pub struct FederationQueries {
    groups: Arc<dyn IGroupRepository>,
    applications: Arc<dyn IApplicationRepository>,
    versions: Arc<dyn IApplicationVersionRepository>,
}

impl FederationQueries {
    pub fn new(
        groups: Arc<dyn IGroupRepository>,
        applications: Arc<dyn IApplicationRepository>,
        versions: Arc<dyn IApplicationVersionRepository>,
    ) -> Self {
        Self {
            groups,
            applications,
            versions,
        }
    }

    /// The named group as a singleton (empty when missing), or every group
    #[instrument(skip(self))]
    pub async fn groups(&self, name: Option<&str>) -> Result<Vec<Group>, ApplicationError> {
        match name {
            Some(name) => Ok(self.groups.find_by_name(name).await?.into_iter().collect()),
            None => Ok(self.groups.find_all().await?),
        }
    }

    /// Applications of a group, or the one with `id` when it belongs to the group
    #[instrument(skip(self))]
    pub async fn group_applications(
        &self,
        group: &str,
        id: Option<&str>,
    ) -> Result<Vec<Application>, ApplicationError> {
        match id {
            Some(id) => Ok(self
                .applications
                .find(id)
                .await?
                .filter(|app| app.belongs_to(group))
                .into_iter()
                .collect()),
            None => Ok(self
                .applications
                .find_in_groups(&[group.to_string()])
                .await?),
        }
    }

    pub async fn application(&self, id: &str) -> Result<Option<Application>, ApplicationError> {
        Ok(self.applications.find(id).await?)
    }

    /// Versions of an application, newest first. `latest` keeps only versions
    /// whose flag equals it.
    #[instrument(skip(self))]
    pub async fn application_versions(
        &self,
        application_id: &str,
        environment: Option<&str>,
        latest: Option<bool>,
    ) -> Result<Vec<ApplicationVersion>, ApplicationError> {
        let versions = self.versions.find_all(application_id, environment).await?;
        Ok(match latest {
            Some(latest) => versions.into_iter().filter(|v| v.latest == latest).collect(),
            None => versions,
        })
    }
}
