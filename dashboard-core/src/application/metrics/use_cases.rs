//! Metric recording and lookup

use std::sync::Arc;
use tracing::instrument;

use crate::application::errors::ApplicationError;
use crate::domain::metrics::{
    IMetricRepository, MetricKind, MetricOwner, MetricStats, MetricValue, parse_metric_date,
};

/// One sample as submitted by a client
#[derive(Debug, Clone, PartialEq)]
pub struct MetricInput {
    pub group: String,
    pub application: Option<String>,
    pub name: String,
    pub date: String,
    pub value: f64,
    pub url: Option<String>,
    pub stats: MetricStats,
}

impl MetricInput {
    fn into_metric(self) -> Result<MetricValue, ApplicationError> {
        let date = parse_metric_date(&self.date)?;
        let owner = MetricOwner::resolve(&self.group, self.application.as_deref());
        let mut metric = MetricValue::new(owner, self.name, date, self.value);
        metric.url = self.url;
        metric.stats = self.stats;
        Ok(metric)
    }
}

pub struct RecordMetricUseCase {
    metrics: Arc<dyn IMetricRepository>,
}

impl RecordMetricUseCase {
    pub fn new(metrics: Arc<dyn IMetricRepository>) -> Self {
        Self { metrics }
    }

    /// Append a sample
    #[instrument(skip(self, input), fields(group = %input.group, name = %input.name))]
    pub async fn add(&self, input: MetricInput) -> Result<MetricValue, ApplicationError> {
        let metric = input.into_metric()?;
        self.metrics.add_metric(&metric).await?;
        Ok(metric)
    }

    /// Replace the sample with the same owner, name and date, or append it
    #[instrument(skip(self, input), fields(group = %input.group, name = %input.name))]
    pub async fn update(&self, input: MetricInput) -> Result<MetricValue, ApplicationError> {
        let metric = input.into_metric()?;
        self.metrics.update_metric(&metric).await?;
        Ok(metric)
    }

    /// Samples of one owner, optionally restricted to some metric names
    pub async fn list(
        &self,
        kind: MetricKind,
        id: &str,
        names: Option<&[String]>,
    ) -> Result<Vec<MetricValue>, ApplicationError> {
        let metrics = self.metrics.get_metrics(kind, id).await?;
        Ok(match names {
            Some(names) => metrics
                .into_iter()
                .filter(|m| names.contains(&m.name))
                .collect(),
            None => metrics,
        })
    }
}
