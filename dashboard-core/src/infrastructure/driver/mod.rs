//! Persistence drivers

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{DatabaseConfig, DriverKind};
use crate::domain::StoreError;
use crate::domain::federation::{
    IApplicationRepository, IApplicationVersionRepository, IGroupRepository,
};
use crate::domain::metrics::IMetricRepository;
use crate::domain::settings::ISiteSettingsRepository;
use crate::domain::users::IUserRepository;

pub use memory::InMemoryDriver;
pub use postgres::PgDocumentDriver;

/// One-time storage preparation. Safe to run on every start.
#[async_trait]
pub trait DriverSetup: Send + Sync {
    async fn setup(&self) -> Result<(), StoreError>;
}

/// Every repository a driver provides, behind trait objects
#[derive(Clone)]
pub struct Repositories {
    pub groups: Arc<dyn IGroupRepository>,
    pub applications: Arc<dyn IApplicationRepository>,
    pub versions: Arc<dyn IApplicationVersionRepository>,
    pub metrics: Arc<dyn IMetricRepository>,
    pub users: Arc<dyn IUserRepository>,
    pub site_settings: Arc<dyn ISiteSettingsRepository>,
    setup: Arc<dyn DriverSetup>,
}

impl Repositories {
    pub fn from_driver<D>(driver: Arc<D>) -> Self
    where
        D: IGroupRepository
            + IApplicationRepository
            + IApplicationVersionRepository
            + IMetricRepository
            + IUserRepository
            + ISiteSettingsRepository
            + DriverSetup
            + 'static,
    {
        Self {
            groups: driver.clone(),
            applications: driver.clone(),
            versions: driver.clone(),
            metrics: driver.clone(),
            users: driver.clone(),
            site_settings: driver.clone(),
            setup: driver,
        }
    }

    pub fn in_memory() -> Self {
        Self::from_driver(Arc::new(InMemoryDriver::new()))
    }

    /// Open the configured driver and run its setup
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let repositories = match config.driver {
            DriverKind::Memory => {
                tracing::info!("Using in-memory driver");
                Self::in_memory()
            }
            DriverKind::Postgres => {
                tracing::info!("Connecting to PostgreSQL");
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .min_connections(config.min_idle.unwrap_or(0))
                    .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
                    .max_lifetime(config.max_lifetime_seconds.map(Duration::from_secs))
                    .idle_timeout(config.idle_timeout_seconds.map(Duration::from_secs))
                    .test_before_acquire(config.enable_health_checks)
                    .connect(&config.url)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to connect to PostgreSQL: {}", e);
                        StoreError::database(e.to_string())
                    })?;
                Self::from_driver(Arc::new(PgDocumentDriver::new(Arc::new(pool))))
            }
        };

        repositories.setup().await?;
        Ok(repositories)
    }

    pub async fn setup(&self) -> Result<(), StoreError> {
        self.setup.setup().await
    }
}
