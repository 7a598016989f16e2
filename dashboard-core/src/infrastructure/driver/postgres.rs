//! PostgreSQL driver storing documents as JSONB

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use sqlx::PgPool;
use sqlx::types::Json;
use std::sync::Arc;

use crate::domain::StoreError;
use crate::domain::federation::{
    Application, ApplicationVersion, Group, IApplicationRepository, IApplicationVersionRepository,
    IGroupRepository,
};
use crate::domain::metrics::{IMetricRepository, MetricKind, MetricValue};
use crate::domain::settings::{ISiteSettingsRepository, SiteSettings};
use crate::domain::users::{IUserRepository, User};

use super::DriverSetup;

const KIND_GROUP: &str = "group";
const KIND_APPLICATION: &str = "application";
const KIND_USER: &str = "user";
const KIND_SITE_SETTINGS: &str = "site_settings";
const SITE_SETTINGS_ID: &str = "site";

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS dashboard_documents (
        kind TEXT NOT NULL,
        id TEXT NOT NULL,
        body JSONB NOT NULL,
        revision BIGINT NOT NULL DEFAULT 1,
        PRIMARY KEY (kind, id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS dashboard_application_versions (
        application_id TEXT NOT NULL,
        environment TEXT NOT NULL,
        version TEXT NOT NULL,
        latest BOOLEAN NOT NULL DEFAULT FALSE,
        posted TIMESTAMPTZ NOT NULL,
        body JSONB NOT NULL,
        PRIMARY KEY (application_id, environment, version)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS dashboard_metrics (
        seq BIGSERIAL PRIMARY KEY,
        kind TEXT NOT NULL,
        owner_id TEXT NOT NULL,
        name TEXT NOT NULL,
        date TIMESTAMPTZ NOT NULL,
        body JSONB NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS dashboard_metrics_owner_idx ON dashboard_metrics (kind, owner_id)",
    // at most one latest version per (application, environment)
    "CREATE UNIQUE INDEX IF NOT EXISTS dashboard_application_versions_latest_idx \
     ON dashboard_application_versions (application_id, environment) WHERE latest",
];

/// Serializes concurrent saves of the same (application, environment) until commit
const LATEST_LOCK: &str =
    "SELECT pg_advisory_xact_lock(hashtext($1::TEXT || chr(31) || $2::TEXT))";

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| {
        tracing::error!("Database error {}: {}", context, e);
        StoreError::database(e.to_string())
    }
}

fn to_json<T: Serialize>(doc: &T) -> Result<serde_json::Value, StoreError> {
    Ok(serde_json::to_value(doc)?)
}

/// JSONB document driver
pub struct PgDocumentDriver {
    pool: Arc<PgPool>,
}

impl PgDocumentDriver {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn find_document<T: DeserializeOwned + Send + Unpin + 'static>(
        &self,
        kind: &'static str,
        id: &str,
    ) -> Result<Option<(T, u64)>, StoreError> {
        let row: Option<(Json<T>, i64)> = sqlx::query_as(
            "SELECT body, revision FROM dashboard_documents WHERE kind = $1 AND id = $2",
        )
        .bind(kind)
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_error("finding document"))?;

        Ok(row.map(|(Json(doc), revision)| (doc, revision as u64)))
    }

    async fn find_documents_where<T: DeserializeOwned + Send + Unpin + 'static>(
        &self,
        kind: &'static str,
        field: &'static str,
        values: &[String],
    ) -> Result<Vec<(T, u64)>, StoreError> {
        let rows: Vec<(Json<T>, i64)> = sqlx::query_as(
            "SELECT body, revision FROM dashboard_documents \
             WHERE kind = $1 AND body ->> $2 = ANY($3) ORDER BY id",
        )
        .bind(kind)
        .bind(field)
        .bind(values)
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error("filtering documents"))?;

        Ok(rows
            .into_iter()
            .map(|(Json(doc), revision)| (doc, revision as u64))
            .collect())
    }

    async fn find_all_documents<T: DeserializeOwned + Send + Unpin + 'static>(
        &self,
        kind: &'static str,
    ) -> Result<Vec<(T, u64)>, StoreError> {
        let rows: Vec<(Json<T>, i64)> = sqlx::query_as(
            "SELECT body, revision FROM dashboard_documents WHERE kind = $1 ORDER BY id",
        )
        .bind(kind)
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error("listing documents"))?;

        Ok(rows
            .into_iter()
            .map(|(Json(doc), revision)| (doc, revision as u64))
            .collect())
    }

    async fn insert_document(
        &self,
        kind: &'static str,
        id: &str,
        body: serde_json::Value,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO dashboard_documents (kind, id, body, revision) VALUES ($1, $2, $3, 1) \
             ON CONFLICT (kind, id) DO NOTHING",
        )
        .bind(kind)
        .bind(id)
        .bind(body)
        .execute(&*self.pool)
        .await
        .map_err(db_error("inserting document"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists {
                kind,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Returns the new revision
    async fn swap_document(
        &self,
        kind: &'static str,
        id: &str,
        body: serde_json::Value,
        expected: u64,
    ) -> Result<u64, StoreError> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE dashboard_documents SET body = $3, revision = revision + 1 \
             WHERE kind = $1 AND id = $2 AND revision = $4 RETURNING revision",
        )
        .bind(kind)
        .bind(id)
        .bind(body)
        .bind(expected as i64)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_error("updating document"))?;

        if let Some((revision,)) = row {
            return Ok(revision as u64);
        }

        let current: Option<(i64,)> =
            sqlx::query_as("SELECT revision FROM dashboard_documents WHERE kind = $1 AND id = $2")
                .bind(kind)
                .bind(id)
                .fetch_optional(&*self.pool)
                .await
                .map_err(db_error("reading document revision"))?;

        match current {
            Some((actual,)) => Err(StoreError::Conflict {
                kind,
                id: id.to_string(),
                expected,
                actual: actual as u64,
            }),
            None => Err(StoreError::not_found(kind, id)),
        }
    }

    async fn upsert_document(
        &self,
        kind: &'static str,
        id: &str,
        body: serde_json::Value,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO dashboard_documents (kind, id, body, revision) VALUES ($1, $2, $3, 1) \
             ON CONFLICT (kind, id) DO UPDATE \
             SET body = EXCLUDED.body, revision = dashboard_documents.revision + 1",
        )
        .bind(kind)
        .bind(id)
        .bind(body)
        .execute(&*self.pool)
        .await
        .map_err(db_error("upserting document"))?;
        Ok(())
    }
}

fn with_group_revision((mut group, revision): (Group, u64)) -> Group {
    group.revision = revision;
    group
}

fn with_application_revision((mut app, revision): (Application, u64)) -> Application {
    app.revision = revision;
    app
}

#[async_trait]
impl IGroupRepository for PgDocumentDriver {
    async fn find(&self, id: &str) -> Result<Option<Group>, StoreError> {
        Ok(self
            .find_document(KIND_GROUP, id)
            .await?
            .map(with_group_revision))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Group>, StoreError> {
        Ok(self
            .find_documents_where(KIND_GROUP, "name", &[name.to_string()])
            .await?
            .into_iter()
            .next()
            .map(with_group_revision))
    }

    async fn find_all(&self) -> Result<Vec<Group>, StoreError> {
        Ok(self
            .find_all_documents(KIND_GROUP)
            .await?
            .into_iter()
            .map(with_group_revision)
            .collect())
    }

    async fn create(&self, group: &Group) -> Result<Group, StoreError> {
        self.insert_document(KIND_GROUP, &group.id, to_json(group)?)
            .await?;
        Ok(Group {
            revision: 1,
            ..group.clone()
        })
    }

    async fn update(&self, group: &Group) -> Result<Group, StoreError> {
        let revision = self
            .swap_document(KIND_GROUP, &group.id, to_json(group)?, group.revision)
            .await?;
        Ok(Group {
            revision,
            ..group.clone()
        })
    }
}

#[async_trait]
impl IApplicationRepository for PgDocumentDriver {
    async fn find(&self, id: &str) -> Result<Option<Application>, StoreError> {
        Ok(self
            .find_document(KIND_APPLICATION, id)
            .await?
            .map(with_application_revision))
    }

    async fn find_all(&self) -> Result<Vec<Application>, StoreError> {
        Ok(self
            .find_all_documents(KIND_APPLICATION)
            .await?
            .into_iter()
            .map(with_application_revision)
            .collect())
    }

    async fn find_in_groups(&self, groups: &[String]) -> Result<Vec<Application>, StoreError> {
        Ok(self
            .find_documents_where(KIND_APPLICATION, "group", groups)
            .await?
            .into_iter()
            .map(with_application_revision)
            .collect())
    }

    async fn create(&self, application: &Application) -> Result<Application, StoreError> {
        self.insert_document(KIND_APPLICATION, &application.id, to_json(application)?)
            .await?;
        Ok(Application {
            revision: 1,
            ..application.clone()
        })
    }

    async fn update(&self, application: &Application) -> Result<Application, StoreError> {
        let revision = self
            .swap_document(
                KIND_APPLICATION,
                &application.id,
                to_json(application)?,
                application.revision,
            )
            .await?;
        Ok(Application {
            revision,
            ..application.clone()
        })
    }
}

#[async_trait]
impl IApplicationVersionRepository for PgDocumentDriver {
    async fn find(
        &self,
        application_id: &str,
        environment: &str,
        version: &str,
    ) -> Result<Option<ApplicationVersion>, StoreError> {
        let row: Option<(Json<ApplicationVersion>,)> = sqlx::query_as(
            "SELECT body FROM dashboard_application_versions \
             WHERE application_id = $1 AND environment = $2 AND version = $3",
        )
        .bind(application_id)
        .bind(environment)
        .bind(version)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_error("finding application version"))?;

        Ok(row.map(|(Json(v),)| v))
    }

    async fn find_all(
        &self,
        application_id: &str,
        environment: Option<&str>,
    ) -> Result<Vec<ApplicationVersion>, StoreError> {
        let rows: Vec<(Json<ApplicationVersion>,)> = sqlx::query_as(
            "SELECT body FROM dashboard_application_versions \
             WHERE application_id = $1 AND ($2::TEXT IS NULL OR environment = $2) \
             ORDER BY posted DESC",
        )
        .bind(application_id)
        .bind(environment)
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error("listing application versions"))?;

        Ok(rows.into_iter().map(|(Json(v),)| v).collect())
    }

    async fn save(&self, version: &ApplicationVersion) -> Result<(), StoreError> {
        let body = to_json(version)?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("starting version transaction"))?;

        if version.latest {
            sqlx::query(LATEST_LOCK)
                .bind(&version.application_id)
                .bind(&version.environment)
                .execute(&mut *tx)
                .await
                .map_err(db_error("locking application environment"))?;

            sqlx::query(
                "UPDATE dashboard_application_versions \
                 SET latest = FALSE, body = jsonb_set(body, '{latest}', 'false'::jsonb) \
                 WHERE application_id = $1 AND environment = $2 AND version <> $3 AND latest",
            )
            .bind(&version.application_id)
            .bind(&version.environment)
            .bind(&version.version)
            .execute(&mut *tx)
            .await
            .map_err(db_error("clearing latest siblings"))?;
        }

        sqlx::query(
            "INSERT INTO dashboard_application_versions \
             (application_id, environment, version, latest, posted, body) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (application_id, environment, version) DO UPDATE \
             SET latest = EXCLUDED.latest, posted = EXCLUDED.posted, body = EXCLUDED.body",
        )
        .bind(&version.application_id)
        .bind(&version.environment)
        .bind(&version.version)
        .bind(version.latest)
        .bind(version.posted)
        .bind(body)
        .execute(&mut *tx)
        .await
        .map_err(db_error("saving application version"))?;

        tx.commit()
            .await
            .map_err(db_error("committing version transaction"))?;
        Ok(())
    }
}

#[async_trait]
impl IMetricRepository for PgDocumentDriver {
    async fn add_metric(&self, metric: &MetricValue) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO dashboard_metrics (kind, owner_id, name, date, body) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(metric.kind.as_str())
        .bind(&metric.id)
        .bind(&metric.name)
        .bind(metric.date)
        .bind(to_json(metric)?)
        .execute(&*self.pool)
        .await
        .map_err(db_error("adding metric"))?;
        Ok(())
    }

    async fn update_metric(&self, metric: &MetricValue) -> Result<(), StoreError> {
        let body = to_json(metric)?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("starting metric transaction"))?;

        sqlx::query(
            "DELETE FROM dashboard_metrics \
             WHERE kind = $1 AND owner_id = $2 AND name = $3 AND date = $4",
        )
        .bind(metric.kind.as_str())
        .bind(&metric.id)
        .bind(&metric.name)
        .bind(metric.date)
        .execute(&mut *tx)
        .await
        .map_err(db_error("replacing metric"))?;

        sqlx::query(
            "INSERT INTO dashboard_metrics (kind, owner_id, name, date, body) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(metric.kind.as_str())
        .bind(&metric.id)
        .bind(&metric.name)
        .bind(metric.date)
        .bind(body)
        .execute(&mut *tx)
        .await
        .map_err(db_error("replacing metric"))?;

        tx.commit()
            .await
            .map_err(db_error("committing metric transaction"))?;
        Ok(())
    }

    async fn get_metrics(
        &self,
        kind: MetricKind,
        id: &str,
    ) -> Result<Vec<MetricValue>, StoreError> {
        let rows: Vec<(Json<MetricValue>,)> = sqlx::query_as(
            "SELECT body FROM dashboard_metrics \
             WHERE kind = $1 AND owner_id = $2 ORDER BY date, seq",
        )
        .bind(kind.as_str())
        .bind(id)
        .fetch_all(&*self.pool)
        .await
        .map_err(db_error("listing metrics"))?;

        Ok(rows.into_iter().map(|(Json(m),)| m).collect())
    }
}

#[async_trait]
impl IUserRepository for PgDocumentDriver {
    async fn find(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .find_document::<User>(KIND_USER, id)
            .await?
            .map(|(user, _)| user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .find_documents_where::<User>(KIND_USER, "email", &[email.to_string()])
            .await?
            .into_iter()
            .next()
            .map(|(user, _)| user))
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        self.upsert_document(KIND_USER, &user.id, to_json(user)?)
            .await
    }
}

#[async_trait]
impl ISiteSettingsRepository for PgDocumentDriver {
    async fn get(&self) -> Result<SiteSettings, StoreError> {
        Ok(self
            .find_document::<SiteSettings>(KIND_SITE_SETTINGS, SITE_SETTINGS_ID)
            .await?
            .map(|(settings, _)| settings)
            .unwrap_or_default())
    }

    async fn update(&self, settings: &SiteSettings) -> Result<(), StoreError> {
        self.upsert_document(KIND_SITE_SETTINGS, SITE_SETTINGS_ID, to_json(settings)?)
            .await
    }
}

#[async_trait]
impl DriverSetup for PgDocumentDriver {
    async fn setup(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(db_error("running schema setup"))?;
        }
        tracing::info!("PostgreSQL document schema ready");
        Ok(())
    }
}
