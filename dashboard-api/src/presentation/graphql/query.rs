use async_graphql::{Context, Object, Result};

use dashboard_core::application::ApplicationError;

use super::errors::ResultExt;
use super::nodes::GroupNode;
use super::services;
use super::types::{DashboardInfo, SiteSettingsObject, UserObject};

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn dashboard(&self, ctx: &Context<'_>) -> Result<DashboardInfo> {
        Ok(DashboardInfo {
            version_management_enabled: services(ctx)?.version_management_enabled,
        })
    }

    async fn user_by_email(
        &self,
        ctx: &Context<'_>,
        email: Option<String>,
    ) -> Result<Option<UserObject>> {
        let Some(email) = email else {
            return Ok(None);
        };
        let services = services(ctx)?;
        let user = services
            .repositories
            .users
            .find_by_email(&email)
            .await
            .map_err(ApplicationError::from)
            .or_graphql(services.sanitize_errors)?;
        Ok(user.map(UserObject::from))
    }

    /// The group with this name, or every group
    async fn groups(&self, ctx: &Context<'_>, name: Option<String>) -> Result<Vec<GroupNode>> {
        let services = services(ctx)?;
        Ok(services
            .queries
            .groups(name.as_deref())
            .await
            .or_graphql(services.sanitize_errors)?
            .into_iter()
            .map(GroupNode)
            .collect())
    }

    async fn site_settings(&self, ctx: &Context<'_>) -> Result<SiteSettingsObject> {
        let services = services(ctx)?;
        let settings = services
            .repositories
            .site_settings
            .get()
            .await
            .map_err(ApplicationError::from)
            .or_graphql(services.sanitize_errors)?;
        Ok(settings.into())
    }
}
