//! Flattening of the Stats API payload into [`CampaignRecord`]s.
//!
//! The provider nests stats as
//! `data.<campaign_id>[0].platforms.<platform>.locales.all_locales
//! .variations.all_variations.performance_stats`. Only one platform and the
//! all-locales/all-variations slice are read. Entries that cannot be read are
//! skipped with a warning; they never fail the batch.

use std::collections::BTreeMap;
use std::fmt;

use campdash_core::CampaignRecord;
use serde_json::{Map, Value};

use crate::error::MoengageError;

/// Path from a platform object down to its aggregate stats.
const STATS_PATH: [&str; 5] = [
    "locales",
    "all_locales",
    "variations",
    "all_variations",
    "performance_stats",
];

/// Chooses which platform's stats represent a campaign.
pub type PlatformSelector = for<'a> fn(&'a Map<String, Value>) -> Option<&'a Value>;

/// Picks the first platform in provider order.
///
/// Other platforms are ignored, not merged.
#[must_use]
pub fn first_platform(platforms: &Map<String, Value>) -> Option<&Value> {
    platforms.values().next()
}

/// Converts a raw Stats API response body into campaign records using
/// [`first_platform`].
#[must_use]
pub fn normalize_campaigns(body: &Value) -> Vec<CampaignRecord> {
    ResponseNormalizer::default().normalize(body)
}

#[derive(Clone, Copy)]
pub struct ResponseNormalizer {
    select_platform: PlatformSelector,
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self::with_platform_selector(first_platform)
    }
}

impl fmt::Debug for ResponseNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseNormalizer").finish_non_exhaustive()
    }
}

impl ResponseNormalizer {
    #[must_use]
    pub fn with_platform_selector(select_platform: PlatformSelector) -> Self {
        Self { select_platform }
    }

    /// Normalizes a full response body (`{"data": {...}}`).
    ///
    /// A body without a `data` object yields no records.
    #[must_use]
    pub fn normalize(&self, body: &Value) -> Vec<CampaignRecord> {
        match body.get("data").and_then(Value::as_object) {
            Some(payload) => self.normalize_payload(payload),
            None => {
                tracing::debug!("stats response has no data object");
                Vec::new()
            }
        }
    }

    /// Normalizes the `data` mapping, preserving provider order.
    #[must_use]
    pub fn normalize_payload(&self, payload: &Map<String, Value>) -> Vec<CampaignRecord> {
        payload
            .iter()
            .filter_map(|(campaign_id, entry)| {
                self.normalize_entry(campaign_id, entry)
                    .map_err(|e| {
                        tracing::warn!(campaign_id = %campaign_id, error = %e, "skipping campaign entry");
                    })
                    .ok()
            })
            .collect()
    }

    /// Normalizes a single campaign entry.
    ///
    /// A platform without the full stats path produces a record with empty
    /// stats rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`MoengageError::MalformedEntry`] if the entry is not a
    /// non-empty array whose first element has a non-empty `platforms` object.
    pub fn normalize_entry(
        &self,
        campaign_id: &str,
        entry: &Value,
    ) -> Result<CampaignRecord, MoengageError> {
        let malformed = |reason| MoengageError::MalformedEntry {
            campaign_id: campaign_id.to_owned(),
            reason,
        };

        let first = entry
            .as_array()
            .and_then(|items| items.first())
            .ok_or_else(|| malformed("no stats entries"))?;
        let platforms = first
            .get("platforms")
            .and_then(Value::as_object)
            .ok_or_else(|| malformed("missing platforms"))?;
        let platform =
            (self.select_platform)(platforms).ok_or_else(|| malformed("no platform selected"))?;

        Ok(CampaignRecord::new(campaign_id, performance_stats(platform)))
    }
}

/// Follows [`STATS_PATH`] one key at a time; any missing step yields `None`.
fn object_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Map<String, Value>> {
    path.iter()
        .try_fold(value, |node, key| node.get(key))?
        .as_object()
}

fn performance_stats(platform: &Value) -> BTreeMap<String, f64> {
    let Some(stats) = object_at(platform, &STATS_PATH) else {
        return BTreeMap::new();
    };
    stats
        .iter()
        .filter_map(|(metric, value)| match value.as_f64() {
            Some(n) => Some((metric.clone(), n)),
            None => {
                tracing::debug!(metric = %metric, "ignoring non-numeric stat");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
