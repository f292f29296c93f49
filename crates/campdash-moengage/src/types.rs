//! Request body for the campaign Stats API.

use campdash_core::DateRange;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// How the provider credits a conversion to a campaign touch-point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributionType {
    #[default]
    ClickThrough,
}

/// Whether counts are totals or de-duplicated per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricType {
    #[default]
    Total,
}

/// JSON body POSTed to the Stats API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsRequest {
    /// Tracing identifier. Derived from the send time; not guaranteed unique.
    pub request_id: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
    pub attribution_type: AttributionType,
    pub metric_type: MetricType,
}

impl StatsRequest {
    #[must_use]
    pub fn new(range: &DateRange, sent_at: DateTime<Utc>) -> Self {
        Self {
            request_id: format!(
                "campdash-request-{}",
                sent_at.to_rfc3339_opts(SecondsFormat::Micros, true)
            ),
            start_date: range.start_param(),
            end_date: range.end_param(),
            attribution_type: AttributionType::default(),
            metric_type: MetricType::default(),
        }
    }
}
