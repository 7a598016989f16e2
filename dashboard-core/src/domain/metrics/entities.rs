//! Metric samples recorded against groups and applications

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Owner kind of a metric sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Application,
    Group,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Application => "application",
            MetricKind::Group => "group",
        }
    }
}

/// Who a metric belongs to.
///
/// An application id wins over the group id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricOwner {
    pub kind: MetricKind,
    pub id: String,
}

impl MetricOwner {
    pub fn resolve(group: &str, application: Option<&str>) -> Self {
        match application {
            Some(app) if !app.is_empty() => Self {
                kind: MetricKind::Application,
                id: app.to_string(),
            },
            _ => Self {
                kind: MetricKind::Group,
                id: group.to_string(),
            },
        }
    }
}

/// Optional distribution statistics attached to a sample
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricStats {
    #[serde(default)]
    pub q1: Option<f64>,
    #[serde(default)]
    pub q2: Option<f64>,
    #[serde(default)]
    pub q3: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MetricKind,
    pub name: String,
    pub date: DateTime<Utc>,
    pub value: f64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub stats: MetricStats,
}

impl MetricValue {
    pub fn new(
        owner: MetricOwner,
        name: impl Into<String>,
        date: DateTime<Utc>,
        value: f64,
    ) -> Self {
        Self {
            id: owner.id,
            kind: owner.kind,
            name: name.into(),
            date,
            value,
            url: None,
            stats: MetricStats::default(),
        }
    }

    /// Samples are identified by owner, name and date
    pub fn same_sample(&self, other: &MetricValue) -> bool {
        self.kind == other.kind
            && self.id == other.id
            && self.name == other.name
            && self.date == other.date
    }
}

/// Parse an RFC 3339 timestamp, or a plain `YYYY-MM-DD` date taken as midnight UTC
pub fn parse_metric_date(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            DomainError::invalid("MetricValue", "date", format!("unparseable date '{}'", raw))
        })
}
