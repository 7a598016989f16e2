//! Federation repository traits

use async_trait::async_trait;

use crate::domain::StoreError;

use super::entities::{Application, ApplicationVersion, Group};

/// Group persistence
#[async_trait]
pub trait IGroupRepository: Send + Sync {
    /// Find a group by id
    async fn find(&self, id: &str) -> Result<Option<Group>, StoreError>;

    /// Find a group by its display name
    async fn find_by_name(&self, name: &str) -> Result<Option<Group>, StoreError>;

    /// List every group
    async fn find_all(&self) -> Result<Vec<Group>, StoreError>;

    /// Insert a new group at revision 1. Fails with `AlreadyExists` when the id is taken.
    async fn create(&self, group: &Group) -> Result<Group, StoreError>;

    /// Replace a group if its stored revision still equals `group.revision`.
    ///
    /// Returns the stored document with the bumped revision.
    async fn update(&self, group: &Group) -> Result<Group, StoreError>;
}

/// Application persistence
#[async_trait]
pub trait IApplicationRepository: Send + Sync {
    async fn find(&self, id: &str) -> Result<Option<Application>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Application>, StoreError>;

    /// Applications whose group is one of `groups`
    async fn find_in_groups(&self, groups: &[String]) -> Result<Vec<Application>, StoreError>;

    async fn create(&self, application: &Application) -> Result<Application, StoreError>;

    /// Compare-and-swap on `application.revision`, same contract as [`IGroupRepository::update`]
    async fn update(&self, application: &Application) -> Result<Application, StoreError>;
}

/// Application version persistence
#[async_trait]
pub trait IApplicationVersionRepository: Send + Sync {
    async fn find(
        &self,
        application_id: &str,
        environment: &str,
        version: &str,
    ) -> Result<Option<ApplicationVersion>, StoreError>;

    /// Versions of an application, optionally restricted to one environment,
    /// newest `posted` first
    async fn find_all(
        &self,
        application_id: &str,
        environment: Option<&str>,
    ) -> Result<Vec<ApplicationVersion>, StoreError>;

    /// Insert or replace by (application, environment, version).
    ///
    /// Saving a latest version clears `latest` on every sibling in the same
    /// application and environment.
    async fn save(&self, version: &ApplicationVersion) -> Result<(), StoreError>;
}
