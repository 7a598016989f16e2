//! Metric repository trait

use async_trait::async_trait;

use crate::domain::StoreError;

use super::entities::{MetricKind, MetricValue};

#[async_trait]
pub trait IMetricRepository: Send + Sync {
    /// Append a sample
    async fn add_metric(&self, metric: &MetricValue) -> Result<(), StoreError>;

    /// Replace the sample with the same owner, name and date, or append it
    async fn update_metric(&self, metric: &MetricValue) -> Result<(), StoreError>;

    /// Every sample of one owner, oldest first
    async fn get_metrics(&self, kind: MetricKind, id: &str) -> Result<Vec<MetricValue>, StoreError>;
}
