use async_graphql::{Context, Object, Result};

use dashboard_core::application::metrics::MetricInput;
use dashboard_core::domain::metrics::MetricStats;

use super::errors::ResultExt;
use super::nodes::{ApplicationNode, ResolveScope, VersionNode};
use super::{actor, services};
use super::types::{
    ApplicationSettingsInput, ApplicationSettingsObject, GroupSettingsInput, GroupSettingsObject,
    SiteSettingsInput, SiteSettingsObject, UserInput, UserObject,
};

#[derive(Default)]
pub struct MutationRoot;

#[allow(clippy::too_many_arguments)]
fn metric_input(
    group: String,
    application: Option<String>,
    name: String,
    date: String,
    value: f64,
    url: Option<String>,
    q1: Option<f64>,
    q2: Option<f64>,
    q3: Option<f64>,
    max: Option<f64>,
    min: Option<f64>,
) -> MetricInput {
    MetricInput {
        group,
        application,
        name,
        date,
        value,
        url,
        stats: MetricStats {
            q1,
            q2,
            q3,
            max,
            min,
        },
    }
}

#[Object]
impl MutationRoot {
    async fn update_application_settings(
        &self,
        ctx: &Context<'_>,
        group: String,
        application: String,
        settings: ApplicationSettingsInput,
    ) -> Result<ApplicationSettingsObject> {
        let services = services(ctx)?;
        tracing::info!(
            actor = %actor(ctx),
            group = %group,
            application = %application,
            "Updating application settings"
        );
        let written = services
            .update_application_settings
            .execute(&group, &application, settings.into())
            .await
            .or_graphql(services.sanitize_errors)?;
        Ok(written.into())
    }

    async fn update_group_settings(
        &self,
        ctx: &Context<'_>,
        group: String,
        settings: GroupSettingsInput,
    ) -> Result<GroupSettingsObject> {
        let services = services(ctx)?;
        tracing::info!(actor = %actor(ctx), group = %group, "Updating group settings");
        let written = services
            .update_group_settings
            .execute(&group, settings.into())
            .await
            .or_graphql(services.sanitize_errors)?;
        Ok(written.into())
    }

    /// Mark a version latest in every environment it was posted to
    async fn publish_version(
        &self,
        ctx: &Context<'_>,
        group: String,
        application: String,
        version: String,
    ) -> Result<VersionNode> {
        let services = services(ctx)?;
        tracing::info!(
            actor = %actor(ctx),
            application = %application,
            version = %version,
            "Publishing version"
        );
        let published = services
            .version_manager
            .publish_version(&group, &application, &version)
            .await
            .or_graphql(services.sanitize_errors)?;
        Ok(VersionNode::new(published, ResolveScope::for_group(group)))
    }

    async fn set_remote_version(
        &self,
        ctx: &Context<'_>,
        group: String,
        application: String,
        remote: String,
        version: Option<String>,
    ) -> Result<ApplicationNode> {
        let services = services(ctx)?;
        tracing::info!(
            actor = %actor(ctx),
            application = %application,
            remote = %remote,
            version = ?version,
            "Setting remote version"
        );
        let app = services
            .version_manager
            .set_remote_version(&group, &application, &remote, version)
            .await
            .or_graphql(services.sanitize_errors)?;
        Ok(ApplicationNode::new(app, ResolveScope::for_group(group)))
    }

    async fn update_user(&self, ctx: &Context<'_>, user: UserInput) -> Result<UserObject> {
        let services = services(ctx)?;
        tracing::info!(actor = %actor(ctx), email = %user.email, "Updating user");
        let stored = services
            .update_user
            .execute(user.into())
            .await
            .or_graphql(services.sanitize_errors)?;
        Ok(stored.into())
    }

    /// A null argument only reads back the stored settings
    async fn update_site_settings(
        &self,
        ctx: &Context<'_>,
        settings: Option<SiteSettingsInput>,
    ) -> Result<SiteSettingsObject> {
        let services = services(ctx)?;
        if settings.is_some() {
            tracing::info!(actor = %actor(ctx), "Updating site settings");
        }
        let stored = services
            .update_site_settings
            .execute(settings.map(Into::into))
            .await
            .or_graphql(services.sanitize_errors)?;
        Ok(stored.into())
    }

    #[allow(clippy::too_many_arguments)]
    async fn add_metric(
        &self,
        ctx: &Context<'_>,
        group: String,
        application: Option<String>,
        name: String,
        date: String,
        value: f64,
        url: Option<String>,
        q1: Option<f64>,
        q2: Option<f64>,
        q3: Option<f64>,
        max: Option<f64>,
        min: Option<f64>,
    ) -> Result<bool> {
        let services = services(ctx)?;
        tracing::debug!(actor = %actor(ctx), group = %group, name = %name, "Recording metric");
        let input = metric_input(
            group,
            application,
            name,
            date,
            value,
            url,
            q1,
            q2,
            q3,
            max,
            min,
        );
        services
            .record_metric
            .add(input)
            .await
            .or_graphql(services.sanitize_errors)?;
        Ok(true)
    }

    #[allow(clippy::too_many_arguments)]
    async fn update_metric(
        &self,
        ctx: &Context<'_>,
        group: String,
        application: Option<String>,
        name: String,
        date: String,
        value: f64,
        url: Option<String>,
        q1: Option<f64>,
        q2: Option<f64>,
        q3: Option<f64>,
        max: Option<f64>,
        min: Option<f64>,
    ) -> Result<bool> {
        let services = services(ctx)?;
        tracing::debug!(actor = %actor(ctx), group = %group, name = %name, "Recording metric");
        let input = metric_input(
            group,
            application,
            name,
            date,
            value,
            url,
            q1,
            q2,
            q3,
            max,
            min,
        );
        services
            .record_metric
            .update(input)
            .await
            .or_graphql(services.sanitize_errors)?;
        Ok(true)
    }
}
