//! Top/bottom-N selection and KPI totals over enriched records.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::campaign::EnrichedCampaignRecord;
use crate::error::CoreError;
use crate::flow::EnrichedFlowRecord;

/// A numeric column of [`EnrichedCampaignRecord`] that campaigns can be ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Sent,
    Delivered,
    Opens,
    Clicks,
    Conversions,
    DeliveryRate,
    OpenRate,
    Ctr,
    Ctor,
    CtcRate,
}

impl SortKey {
    pub const ALL: [SortKey; 10] = [
        SortKey::Sent,
        SortKey::Delivered,
        SortKey::Opens,
        SortKey::Clicks,
        SortKey::Conversions,
        SortKey::DeliveryRate,
        SortKey::OpenRate,
        SortKey::Ctr,
        SortKey::Ctor,
        SortKey::CtcRate,
    ];

    #[must_use]
    pub fn value(self, record: &EnrichedCampaignRecord) -> f64 {
        match self {
            SortKey::Sent => record.sent,
            SortKey::Delivered => record.delivered,
            SortKey::Opens => record.opens,
            SortKey::Clicks => record.clicks,
            SortKey::Conversions => record.conversions,
            SortKey::DeliveryRate => record.delivery_rate,
            SortKey::OpenRate => record.open_rate,
            SortKey::Ctr => record.ctr,
            SortKey::Ctor => record.ctor,
            SortKey::CtcRate => record.ctc_rate,
        }
    }

    /// Column heading used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Sent => "Sent",
            SortKey::Delivered => "Delivered",
            SortKey::Opens => "Opens/Views",
            SortKey::Clicks => "Clicks",
            SortKey::Conversions => "Conversions",
            SortKey::DeliveryRate => "Delivery Rate (%)",
            SortKey::OpenRate => "Open Rate (%)",
            SortKey::Ctr => "CTR (%)",
            SortKey::Ctor => "CTOR (%)",
            SortKey::CtcRate => "CTC Rate (%)",
        }
    }

    /// Short name accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Sent => "sent",
            SortKey::Delivered => "delivered",
            SortKey::Opens => "opens",
            SortKey::Clicks => "clicks",
            SortKey::Conversions => "conversions",
            SortKey::DeliveryRate => "delivery-rate",
            SortKey::OpenRate => "open-rate",
            SortKey::Ctr => "ctr",
            SortKey::Ctor => "ctor",
            SortKey::CtcRate => "ctc-rate",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| CoreError::UnknownSortKey(s.to_string()))
    }
}

/// The `n` records with the largest `key`, best first.
///
/// Ties keep input order.
#[must_use]
pub fn top_n(
    records: &[EnrichedCampaignRecord],
    key: SortKey,
    n: usize,
) -> Vec<&EnrichedCampaignRecord> {
    let mut ranked: Vec<_> = records.iter().collect();
    ranked.sort_by(|a, b| key.value(b).total_cmp(&key.value(a)));
    ranked.truncate(n);
    ranked
}

/// The `n` records with the smallest `key`, worst first.
///
/// Ties keep input order.
#[must_use]
pub fn bottom_n(
    records: &[EnrichedCampaignRecord],
    key: SortKey,
    n: usize,
) -> Vec<&EnrichedCampaignRecord> {
    let mut ranked: Vec<_> = records.iter().collect();
    ranked.sort_by(|a, b| key.value(a).total_cmp(&key.value(b)));
    ranked.truncate(n);
    ranked
}

/// Headline totals for a set of campaigns.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CampaignSummary {
    pub total_campaigns: usize,
    pub total_delivered: f64,
    pub total_clicks: f64,
    pub total_conversions: f64,
}

impl CampaignSummary {
    #[must_use]
    pub fn from_records(records: &[EnrichedCampaignRecord]) -> Self {
        records.iter().fold(
            Self {
                total_campaigns: records.len(),
                ..Self::default()
            },
            |acc, r| Self {
                total_delivered: acc.total_delivered + r.delivered,
                total_clicks: acc.total_clicks + r.clicks,
                total_conversions: acc.total_conversions + r.conversions,
                ..acc
            },
        )
    }
}

/// Headline totals for a set of flows.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FlowSummary {
    pub total_entered: f64,
    pub total_completed: f64,
    pub total_conversions: f64,
}

impl FlowSummary {
    #[must_use]
    pub fn from_records(records: &[EnrichedFlowRecord]) -> Self {
        records.iter().fold(Self::default(), |acc, r| Self {
            total_entered: acc.total_entered + r.flow.entered,
            total_completed: acc.total_completed + r.flow.completed,
            total_conversions: acc.total_conversions + r.flow.conversions,
        })
    }
}
