//! Derived percentage metrics for campaigns and flows.
//!
//! Every rate is `numerator / denominator * 100` rounded to two decimals.
//! A ratio that is not finite (zero denominator, `0 / 0`) is reported as `0`:
//! no activity means a 0% rate, never an error and never `NaN` or infinity.

use crate::campaign::{stat_keys, CampaignRecord, EnrichedCampaignRecord};
use crate::flow::{EnrichedFlowRecord, FlowRecord};

/// Rounds to two decimal places, sending exact ties to the even digit.
///
/// Values too large to scale have no fractional digits left and are
/// returned unchanged.
#[must_use]
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / 100.0
}

/// `numerator / denominator` as a percentage rounded to two decimals, or
/// `0.0` when the result is undefined or infinite.
#[must_use]
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    let rate = round2(numerator / denominator * 100.0);
    if rate.is_finite() {
        rate
    } else {
        0.0
    }
}

/// Maps raw stats onto canonical counts and derives the campaign rates.
///
/// Output order matches input order.
#[must_use]
pub fn derive_campaign_metrics(records: &[CampaignRecord]) -> Vec<EnrichedCampaignRecord> {
    records.iter().map(enrich_campaign).collect()
}

fn enrich_campaign(record: &CampaignRecord) -> EnrichedCampaignRecord {
    let sent = record.stat(stat_keys::SENT);
    let delivered = record.stat(stat_keys::DELIVERED);
    let opens = record.stat(stat_keys::IMPRESSION);
    let clicks = record.stat(stat_keys::CLICK);
    let conversions = record.stat(stat_keys::CONVERSION);
    let failed = record.stat(stat_keys::FAILED);

    let extra = record
        .stats
        .iter()
        .filter(|(key, _)| !stat_keys::CANONICAL.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), round2(*value)))
        .collect();

    EnrichedCampaignRecord {
        campaign_id: record.campaign_id.clone(),
        name: record.name.clone(),
        sent: round2(sent),
        delivered: round2(delivered),
        opens: round2(opens),
        clicks: round2(clicks),
        conversions: round2(conversions),
        failed: round2(failed),
        delivery_rate: percentage(delivered, sent),
        open_rate: percentage(opens, delivered),
        ctr: percentage(clicks, opens),
        // Same formula as CTR: the provider only reports impressions, so
        // there is no separate unique-open count to divide by.
        ctor: percentage(clicks, opens),
        ctc_rate: percentage(conversions, clicks),
        extra,
    }
}

/// Derives completion and conversion rates for each flow.
///
/// A flow with zero entries gets 0% for both rates.
#[must_use]
pub fn derive_flow_metrics(flows: &[FlowRecord]) -> Vec<EnrichedFlowRecord> {
    flows
        .iter()
        .map(|flow| EnrichedFlowRecord {
            completion_rate: percentage(flow.completed, flow.entered),
            conversion_rate: percentage(flow.conversions, flow.entered),
            flow: flow.clone(),
        })
        .collect()
}
