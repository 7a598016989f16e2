//! Process-local driver backed by `RwLock`ed maps

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::StoreError;
use crate::domain::federation::{
    Application, ApplicationVersion, Group, IApplicationRepository, IApplicationVersionRepository,
    IGroupRepository, VersionKey,
};
use crate::domain::metrics::{IMetricRepository, MetricKind, MetricValue};
use crate::domain::settings::{ISiteSettingsRepository, SiteSettings};
use crate::domain::users::{IUserRepository, User};

use super::DriverSetup;

/// In-memory driver for development and tests. Data is lost on restart.
#[derive(Default)]
pub struct InMemoryDriver {
    groups: RwLock<BTreeMap<String, Group>>,
    applications: RwLock<BTreeMap<String, Application>>,
    versions: RwLock<BTreeMap<VersionKey, ApplicationVersion>>,
    metrics: RwLock<Vec<MetricValue>>,
    users: RwLock<BTreeMap<String, User>>,
    site_settings: RwLock<Option<SiteSettings>>,
}

impl InMemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Insert at revision 1 unless the id is taken
fn insert_new<T: Clone>(
    map: &mut BTreeMap<String, T>,
    kind: &'static str,
    id: &str,
    mut doc: T,
    set_revision: impl Fn(&mut T, u64),
) -> Result<T, StoreError> {
    if map.contains_key(id) {
        return Err(StoreError::AlreadyExists {
            kind,
            id: id.to_string(),
        });
    }
    set_revision(&mut doc, 1);
    map.insert(id.to_string(), doc.clone());
    Ok(doc)
}

/// Compare-and-swap on the stored revision
fn swap_revision<T: Clone>(
    map: &mut BTreeMap<String, T>,
    kind: &'static str,
    id: &str,
    mut doc: T,
    revision: impl Fn(&T) -> u64,
    set_revision: impl Fn(&mut T, u64),
) -> Result<T, StoreError> {
    let stored = map
        .get(id)
        .ok_or_else(|| StoreError::not_found(kind, id))?;

    let expected = revision(&doc);
    let actual = revision(stored);
    if expected != actual {
        return Err(StoreError::Conflict {
            kind,
            id: id.to_string(),
            expected,
            actual,
        });
    }

    set_revision(&mut doc, actual + 1);
    map.insert(id.to_string(), doc.clone());
    Ok(doc)
}

#[async_trait]
impl IGroupRepository for InMemoryDriver {
    async fn find(&self, id: &str) -> Result<Option<Group>, StoreError> {
        Ok(self.groups.read().await.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Group>, StoreError> {
        Ok(self
            .groups
            .read()
            .await
            .values()
            .find(|g| g.name == name)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Group>, StoreError> {
        Ok(self.groups.read().await.values().cloned().collect())
    }

    async fn create(&self, group: &Group) -> Result<Group, StoreError> {
        let mut groups = self.groups.write().await;
        insert_new(&mut groups, "group", &group.id, group.clone(), |g, r| {
            g.revision = r
        })
    }

    async fn update(&self, group: &Group) -> Result<Group, StoreError> {
        let mut groups = self.groups.write().await;
        swap_revision(
            &mut groups,
            "group",
            &group.id,
            group.clone(),
            |g| g.revision,
            |g, r| g.revision = r,
        )
    }
}

#[async_trait]
impl IApplicationRepository for InMemoryDriver {
    async fn find(&self, id: &str) -> Result<Option<Application>, StoreError> {
        Ok(self.applications.read().await.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Application>, StoreError> {
        Ok(self.applications.read().await.values().cloned().collect())
    }

    async fn find_in_groups(&self, groups: &[String]) -> Result<Vec<Application>, StoreError> {
        Ok(self
            .applications
            .read()
            .await
            .values()
            .filter(|app| groups.iter().any(|g| app.belongs_to(g)))
            .cloned()
            .collect())
    }

    async fn create(&self, application: &Application) -> Result<Application, StoreError> {
        let mut applications = self.applications.write().await;
        insert_new(
            &mut applications,
            "application",
            &application.id,
            application.clone(),
            |a, r| a.revision = r,
        )
    }

    async fn update(&self, application: &Application) -> Result<Application, StoreError> {
        let mut applications = self.applications.write().await;
        swap_revision(
            &mut applications,
            "application",
            &application.id,
            application.clone(),
            |a| a.revision,
            |a, r| a.revision = r,
        )
    }
}

#[async_trait]
impl IApplicationVersionRepository for InMemoryDriver {
    async fn find(
        &self,
        application_id: &str,
        environment: &str,
        version: &str,
    ) -> Result<Option<ApplicationVersion>, StoreError> {
        let key = VersionKey {
            application_id: application_id.to_string(),
            environment: environment.to_string(),
            version: version.to_string(),
        };
        Ok(self.versions.read().await.get(&key).cloned())
    }

    async fn find_all(
        &self,
        application_id: &str,
        environment: Option<&str>,
    ) -> Result<Vec<ApplicationVersion>, StoreError> {
        let mut found: Vec<ApplicationVersion> = self
            .versions
            .read()
            .await
            .values()
            .filter(|v| v.application_id == application_id)
            .filter(|v| environment.is_none_or(|env| v.environment == env))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.posted.cmp(&a.posted));
        Ok(found)
    }

    async fn save(&self, version: &ApplicationVersion) -> Result<(), StoreError> {
        let mut versions = self.versions.write().await;
        if version.latest {
            for sibling in versions.values_mut().filter(|v| v.is_sibling_of(version)) {
                sibling.latest = false;
            }
        }
        versions.insert(version.key(), version.clone());
        Ok(())
    }
}

#[async_trait]
impl IMetricRepository for InMemoryDriver {
    async fn add_metric(&self, metric: &MetricValue) -> Result<(), StoreError> {
        self.metrics.write().await.push(metric.clone());
        Ok(())
    }

    async fn update_metric(&self, metric: &MetricValue) -> Result<(), StoreError> {
        let mut metrics = self.metrics.write().await;
        match metrics.iter_mut().find(|m| m.same_sample(metric)) {
            Some(existing) => *existing = metric.clone(),
            None => metrics.push(metric.clone()),
        }
        Ok(())
    }

    async fn get_metrics(
        &self,
        kind: MetricKind,
        id: &str,
    ) -> Result<Vec<MetricValue>, StoreError> {
        let mut found: Vec<MetricValue> = self
            .metrics
            .read()
            .await
            .iter()
            .filter(|m| m.kind == kind && m.id == id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(found)
    }
}

#[async_trait]
impl IUserRepository for InMemoryDriver {
    async fn find(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        self.users
            .write()
            .await
            .insert(user.id.clone(), user.clone());
        Ok(())
    }
}

#[async_trait]
impl ISiteSettingsRepository for InMemoryDriver {
    async fn get(&self) -> Result<SiteSettings, StoreError> {
        Ok(self.site_settings.read().await.clone().unwrap_or_default())
    }

    async fn update(&self, settings: &SiteSettings) -> Result<(), StoreError> {
        *self.site_settings.write().await = Some(settings.clone());
        Ok(())
    }
}

#[async_trait]
impl DriverSetup for InMemoryDriver {
    async fn setup(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_group_create_then_cas_update() {
        let driver = InMemoryDriver::new();
        let created = IGroupRepository::create(&driver, &Group::new("default"))
            .await
            .unwrap();
        assert_eq!(created.revision, 1);

        let mut edited = created.clone();
        edited.metadata.push(crate::domain::federation::Metadata::new("team", "web"));
        let updated = IGroupRepository::update(&driver, &edited).await.unwrap();
        assert_eq!(updated.revision, 2);

        // the first copy is now stale
        let err = IGroupRepository::update(&driver, &created).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_duplicate_create_rejected() {
        let driver = InMemoryDriver::new();
        let app = Application::new("shell", "shell", "default");
        IApplicationRepository::create(&driver, &app).await.unwrap();
        let err = IApplicationRepository::create(&driver, &app).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let driver = InMemoryDriver::new();
        let err = IApplicationRepository::update(&driver, &Application::new("x", "x", "g"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_site_settings_default_empty() {
        let driver = InMemoryDriver::new();
        let settings = ISiteSettingsRepository::get(&driver).await.unwrap();
        assert!(settings.tokens.is_empty());
        assert!(settings.webhooks.is_empty());
    }
}
