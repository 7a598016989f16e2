//! Resolver nodes.
//!
//! Parents hand their children a [`ResolveScope`] instead of writing into a
//! shared per-request context: `Group.applications` stamps the group,
//! `Application.versions` stamps the requested environment and
//! `Module.consumedBy` reads both back.

use async_graphql::{Context, Object, Result};

use dashboard_core::application::ApplicationError;
use dashboard_core::domain::federation::{
    Application, ApplicationOverride, ApplicationVersion, Consume, Group, Module, Override,
};
use dashboard_core::domain::metrics::MetricKind;

use super::errors::{ResultExt, into_graphql_error};
use super::scalars::Date;
use super::services;
use super::types::{
    ApplicationSettingsObject, DependencyObject, FileLocationObject, GroupSettingsObject,
    MetadataObject, MetricValueObject, RemoteObject, metadata_objects,
};

/// Group and environment a subtree is being resolved for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveScope {
    pub group: Option<String>,
    pub environment: Option<String>,
}

impl ResolveScope {
    pub fn for_group(group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            environment: None,
        }
    }

    fn with_environment(&self, environment: Option<String>) -> Self {
        Self {
            group: self.group.clone(),
            environment,
        }
    }
}

async fn application_node(
    ctx: &Context<'_>,
    id: &str,
    scope: &ResolveScope,
) -> Result<Option<ApplicationNode>> {
    let services = services(ctx)?;
    Ok(services
        .queries
        .application(id)
        .await
        .or_graphql(services.sanitize_errors)?
        .map(|app| ApplicationNode::new(app, scope.clone())))
}

/// Lookup for `Application!` fields; a dangling reference is `NOT_FOUND`
async fn required_application_node(
    ctx: &Context<'_>,
    id: &str,
    scope: &ResolveScope,
) -> Result<ApplicationNode> {
    match application_node(ctx, id, scope).await? {
        Some(node) => Ok(node),
        None => {
            let sanitize = services(ctx)?.sanitize_errors;
            Err(into_graphql_error(
                ApplicationError::not_found("Application", id),
                sanitize,
            ))
        }
    }
}

async fn metrics(
    ctx: &Context<'_>,
    kind: MetricKind,
    id: &str,
    names: Option<Vec<String>>,
) -> Result<Vec<MetricValueObject>> {
    let services = services(ctx)?;
    Ok(services
        .record_metric
        .list(kind, id, names.as_deref())
        .await
        .or_graphql(services.sanitize_errors)?
        .into_iter()
        .map(MetricValueObject::from)
        .collect())
}

pub struct GroupNode(pub Group);

#[Object(name = "Group")]
impl GroupNode {
    async fn id(&self) -> &str {
        &self.0.id
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn metadata(&self) -> Vec<MetadataObject> {
        metadata_objects(&self.0.metadata)
    }

    async fn settings(&self) -> Option<GroupSettingsObject> {
        self.0.settings.clone().map(GroupSettingsObject::from)
    }

    /// All applications of the group, or the one with `id` when it belongs here
    async fn applications(
        &self,
        ctx: &Context<'_>,
        id: Option<String>,
    ) -> Result<Vec<ApplicationNode>> {
        let services = services(ctx)?;
        let scope = ResolveScope::for_group(self.0.name.clone());
        Ok(services
            .queries
            .group_applications(&self.0.name, id.as_deref())
            .await
            .or_graphql(services.sanitize_errors)?
            .into_iter()
            .map(|app| ApplicationNode::new(app, scope.clone()))
            .collect())
    }

    async fn metrics(
        &self,
        ctx: &Context<'_>,
        names: Option<Vec<String>>,
    ) -> Result<Vec<MetricValueObject>> {
        metrics(ctx, MetricKind::Group, &self.0.id, names).await
    }
}

pub struct ApplicationNode {
    app: Application,
    scope: ResolveScope,
}

impl ApplicationNode {
    pub fn new(app: Application, scope: ResolveScope) -> Self {
        Self { app, scope }
    }
}

#[Object(name = "Application")]
impl ApplicationNode {
    async fn id(&self) -> &str {
        &self.app.id
    }

    async fn name(&self) -> &str {
        &self.app.name
    }

    async fn group(&self) -> &str {
        &self.app.group
    }

    async fn metadata(&self) -> Vec<MetadataObject> {
        metadata_objects(&self.app.metadata)
    }

    async fn tags(&self) -> &[String] {
        &self.app.tags
    }

    async fn settings(&self) -> Option<ApplicationSettingsObject> {
        self.app.settings.clone().map(ApplicationSettingsObject::from)
    }

    async fn overrides(&self) -> Vec<ApplicationOverrideNode> {
        self.app
            .overrides
            .iter()
            .cloned()
            .map(|o| ApplicationOverrideNode {
                o,
                scope: self.scope.clone(),
            })
            .collect()
    }

    /// Versions newest first, optionally limited to one environment and to
    /// versions whose `latest` flag equals the argument
    async fn versions(
        &self,
        ctx: &Context<'_>,
        environment: Option<String>,
        latest: Option<bool>,
    ) -> Result<Vec<VersionNode>> {
        let services = services(ctx)?;
        let versions = services
            .queries
            .application_versions(&self.app.id, environment.as_deref(), latest)
            .await
            .or_graphql(services.sanitize_errors)?;

        let scope = self.scope.with_environment(environment);
        Ok(versions
            .into_iter()
            .map(|version| VersionNode::new(version, scope.clone()))
            .collect())
    }

    async fn metrics(
        &self,
        ctx: &Context<'_>,
        names: Option<Vec<String>>,
    ) -> Result<Vec<MetricValueObject>> {
        metrics(ctx, MetricKind::Application, &self.app.id, names).await
    }
}

pub struct ApplicationOverrideNode {
    o: ApplicationOverride,
    scope: ResolveScope,
}

#[Object(name = "ApplicationOverride")]
impl ApplicationOverrideNode {
    async fn application(&self, ctx: &Context<'_>) -> Result<ApplicationNode> {
        required_application_node(ctx, &self.o.application, &self.scope).await
    }

    async fn version(&self) -> &str {
        &self.o.version
    }

    async fn name(&self) -> &str {
        &self.o.name
    }
}

pub struct VersionNode {
    version: ApplicationVersion,
    scope: ResolveScope,
}

impl VersionNode {
    pub fn new(version: ApplicationVersion, scope: ResolveScope) -> Self {
        Self { version, scope }
    }
}

#[Object(name = "ApplicationVersion")]
impl VersionNode {
    async fn application_id(&self) -> &str {
        &self.version.application_id
    }

    async fn environment(&self) -> &str {
        &self.version.environment
    }

    async fn version(&self) -> &str {
        &self.version.version
    }

    async fn posted(&self) -> Date {
        Date(self.version.posted)
    }

    async fn latest(&self) -> bool {
        self.version.latest
    }

    async fn remote(&self) -> &str {
        &self.version.remote
    }

    async fn metadata(&self) -> Option<async_graphql::Json<serde_json::Value>> {
        self.version.metadata.clone().map(async_graphql::Json)
    }

    async fn remotes(&self) -> Vec<RemoteObject> {
        self.version
            .remotes
            .iter()
            .cloned()
            .map(RemoteObject::from)
            .collect()
    }

    async fn dependencies(&self) -> Vec<DependencyObject> {
        self.version
            .dependencies
            .iter()
            .cloned()
            .map(DependencyObject::from)
            .collect()
    }

    async fn overrides(&self) -> Vec<OverrideNode> {
        self.version
            .overrides
            .iter()
            .cloned()
            .map(|o| OverrideNode {
                o,
                scope: self.scope.clone(),
            })
            .collect()
    }

    async fn consumes(&self) -> Vec<ConsumeNode> {
        self.version
            .consumes
            .iter()
            .cloned()
            .map(|consume| ConsumeNode {
                consume,
                scope: self.scope.clone(),
            })
            .collect()
    }

    /// Modules with exactly this name, or every module
    async fn modules(&self, name: Option<String>) -> Vec<ModuleNode> {
        self.version
            .modules_named(name.as_deref())
            .into_iter()
            .map(|module| ModuleNode {
                module,
                scope: self.scope.clone(),
            })
            .collect()
    }
}

pub struct ModuleNode {
    module: Module,
    scope: ResolveScope,
}

#[Object(name = "Module")]
impl ModuleNode {
    async fn id(&self) -> &str {
        &self.module.id
    }

    async fn name(&self) -> &str {
        &self.module.name
    }

    async fn file(&self) -> Option<&str> {
        self.module.file.as_deref()
    }

    async fn requires(&self) -> &[String] {
        &self.module.requires
    }

    async fn metadata(&self) -> Vec<MetadataObject> {
        metadata_objects(&self.module.metadata)
    }

    async fn tags(&self) -> &[String] {
        &self.module.tags
    }

    async fn application(&self, ctx: &Context<'_>) -> Result<ApplicationNode> {
        required_application_node(ctx, &self.module.application_id, &self.scope).await
    }

    async fn consumed_by(&self, ctx: &Context<'_>) -> Result<Vec<ConsumeNode>> {
        let services = services(ctx)?;
        let consumers = services
            .module_manager
            .consumed_by(
                self.scope.group.as_deref(),
                self.scope.environment.as_deref(),
                &self.module.application_id,
                &self.module.name,
            )
            .await
            .or_graphql(services.sanitize_errors)?;

        Ok(consumers
            .into_iter()
            .map(|consume| ConsumeNode {
                consume,
                scope: self.scope.clone(),
            })
            .collect())
    }
}

pub struct ConsumeNode {
    consume: Consume,
    scope: ResolveScope,
}

#[Object(name = "Consume")]
impl ConsumeNode {
    async fn consuming_application(&self, ctx: &Context<'_>) -> Result<ApplicationNode> {
        required_application_node(ctx, &self.consume.consuming_application_id, &self.scope).await
    }

    async fn application(&self, ctx: &Context<'_>) -> Result<Option<ApplicationNode>> {
        match &self.consume.application_id {
            Some(id) => application_node(ctx, id, &self.scope).await,
            None => Ok(None),
        }
    }

    async fn name(&self) -> &str {
        &self.consume.name
    }

    async fn used_in(&self) -> Vec<FileLocationObject> {
        self.consume
            .used_in
            .iter()
            .cloned()
            .map(FileLocationObject::from)
            .collect()
    }
}

pub struct OverrideNode {
    o: Override,
    scope: ResolveScope,
}

#[Object(name = "Override")]
impl OverrideNode {
    async fn id(&self) -> &str {
        &self.o.id
    }

    async fn name(&self) -> &str {
        &self.o.name
    }

    async fn version(&self) -> Option<&str> {
        self.o.version.as_deref()
    }

    async fn application(&self, ctx: &Context<'_>) -> Result<ApplicationNode> {
        required_application_node(ctx, &self.o.application_id, &self.scope).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_keeps_group_when_environment_stamped() {
        let scope = ResolveScope::for_group("web").with_environment(Some("production".into()));
        assert_eq!(scope.group.as_deref(), Some("web"));
        assert_eq!(scope.environment.as_deref(), Some("production"));
    }
}
