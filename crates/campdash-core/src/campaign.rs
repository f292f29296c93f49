//! Per-campaign records produced by normalization and metric derivation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Raw stat keys as reported in `performance_stats`.
pub mod stat_keys {
    pub const SENT: &str = "sent";
    pub const DELIVERED: &str = "delivered";
    /// Impressions. Reported as "Opens" downstream; these are not verified opens.
    pub const IMPRESSION: &str = "impression";
    pub const CLICK: &str = "click";
    pub const CONVERSION: &str = "conversion";
    pub const FAILED: &str = "failed";

    /// Keys that map onto a named field of an enriched record.
    pub const CANONICAL: [&str; 6] = [SENT, DELIVERED, IMPRESSION, CLICK, CONVERSION, FAILED];
}

/// One campaign flattened out of the Stats API response.
///
/// The provider does not return display names, so `name` is the placeholder
/// `"Campaign <id>"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub campaign_id: String,
    pub name: String,
    pub stats: BTreeMap<String, f64>,
}

impl CampaignRecord {
    #[must_use]
    pub fn new(campaign_id: impl Into<String>, stats: BTreeMap<String, f64>) -> Self {
        let campaign_id = campaign_id.into();
        let name = format!("Campaign {campaign_id}");
        Self {
            campaign_id,
            name,
            stats,
        }
    }

    /// Value of a raw stat, or `0.0` when the provider omitted it.
    #[must_use]
    pub fn stat(&self, key: &str) -> f64 {
        self.stats.get(key).copied().unwrap_or(0.0)
    }
}

/// A campaign with canonical counts and derived percentage metrics.
///
/// All values are rounded to two decimals. Stats outside the canonical set
/// are carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedCampaignRecord {
    pub campaign_id: String,
    pub name: String,
    pub sent: f64,
    pub delivered: f64,
    /// Impressions, labelled "Opens/Views" in reports.
    pub opens: f64,
    pub clicks: f64,
    pub conversions: f64,
    pub failed: f64,
    pub delivery_rate: f64,
    pub open_rate: f64,
    pub ctr: f64,
    pub ctor: f64,
    pub ctc_rate: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, f64>,
}
