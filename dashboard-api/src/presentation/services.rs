//! Use cases shared by the HTTP handlers and the GraphQL resolvers

use std::sync::Arc;

use dashboard_core::Config;
use dashboard_core::application::WebhookNotifier;
use dashboard_core::application::federation::{
    FederationQueries, IngestVersionUseCase, ModuleManager, VersionManager,
};
use dashboard_core::application::metrics::RecordMetricUseCase;
use dashboard_core::application::settings::{
    UpdateApplicationSettingsUseCase, UpdateGroupSettingsUseCase, UpdateSiteSettingsUseCase,
    UpdateUserUseCase,
};
use dashboard_core::infrastructure::Repositories;

#[derive(Clone)]
pub struct DashboardServices {
    pub repositories: Repositories,
    pub queries: Arc<FederationQueries>,
    pub version_manager: Arc<VersionManager>,
    pub module_manager: Arc<ModuleManager>,
    pub ingest_version: Arc<IngestVersionUseCase>,
    pub update_application_settings: Arc<UpdateApplicationSettingsUseCase>,
    pub update_group_settings: Arc<UpdateGroupSettingsUseCase>,
    pub update_site_settings: Arc<UpdateSiteSettingsUseCase>,
    pub update_user: Arc<UpdateUserUseCase>,
    pub record_metric: Arc<RecordMetricUseCase>,
    pub version_management_enabled: bool,
    pub sanitize_errors: bool,
}

impl DashboardServices {
    pub fn new(config: &Config, repositories: Repositories, notifier: WebhookNotifier) -> Self {
        let r = &repositories;
        let version_management_enabled = config.dashboard.version_manager;

        Self {
            queries: Arc::new(FederationQueries::new(
                r.groups.clone(),
                r.applications.clone(),
                r.versions.clone(),
            )),
            version_manager: Arc::new(VersionManager::new(
                r.applications.clone(),
                r.versions.clone(),
                notifier.clone(),
            )),
            module_manager: Arc::new(ModuleManager::new(
                r.applications.clone(),
                r.versions.clone(),
            )),
            ingest_version: Arc::new(IngestVersionUseCase::new(
                r.groups.clone(),
                r.applications.clone(),
                r.versions.clone(),
                notifier.clone(),
                version_management_enabled,
            )),
            update_application_settings: Arc::new(UpdateApplicationSettingsUseCase::new(
                r.applications.clone(),
                notifier,
            )),
            update_group_settings: Arc::new(UpdateGroupSettingsUseCase::new(r.groups.clone())),
            update_site_settings: Arc::new(UpdateSiteSettingsUseCase::new(
                r.site_settings.clone(),
            )),
            update_user: Arc::new(UpdateUserUseCase::new(r.users.clone())),
            record_metric: Arc::new(RecordMetricUseCase::new(r.metrics.clone())),
            version_management_enabled,
            sanitize_errors: config.server.sanitize_errors,
            repositories,
        }
    }
}
