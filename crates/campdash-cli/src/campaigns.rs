//! `campaigns` report: fetch, derive metrics, rank, and print.

use std::fmt;

use campdash_core::{
    bottom_n, derive_campaign_metrics, top_n, AppConfig, CampaignSummary, CoreError, DateRange,
    EnrichedCampaignRecord, SortKey,
};
use campdash_moengage::CampaignDataClient;
use chrono::NaiveDate;
use serde::Serialize;

use crate::format::{fmt_count, fmt_pct, truncate};

/// Days covered by the default range (ending yesterday).
const DEFAULT_RANGE_DAYS: u32 = 7;

#[derive(Debug, Serialize)]
struct CampaignReport<'a> {
    range: DateRange,
    summary: CampaignSummary,
    sort_by: &'static str,
    top: Vec<&'a EnrichedCampaignRecord>,
    worst: Vec<&'a EnrichedCampaignRecord>,
    campaigns: &'a [EnrichedCampaignRecord],
}

/// Fills in missing bounds from the default trailing window.
///
/// # Errors
///
/// Returns [`CoreError::InvalidDateRange`] if the resulting start is after the end.
pub(crate) fn resolve_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<DateRange, CoreError> {
    let default = DateRange::last_days(DEFAULT_RANGE_DAYS, today);
    DateRange::new(
        start.unwrap_or(default.start()),
        end.unwrap_or(default.end()),
    )
}

/// Fetch campaign stats for `range` and print the report.
///
/// A failed request is not an error here: the API warning is printed and the
/// report continues with no campaigns.
///
/// # Errors
///
/// Returns an error if the client cannot be built or JSON output fails.
pub(crate) async fn run_campaigns(
    config: &AppConfig,
    range: DateRange,
    sort_by: SortKey,
    top: usize,
    json: bool,
) -> anyhow::Result<()> {
    let client = CampaignDataClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build MoEngage client: {e}"))?;

    let fetched = client.fetch(&range).await;
    if let Some(warning) = &fetched.warning {
        eprintln!("{warning}");
    }

    let enriched = derive_campaign_metrics(&fetched.records);

    if json {
        let report = CampaignReport {
            range,
            summary: CampaignSummary::from_records(&enriched),
            sort_by: sort_by.as_str(),
            top: top_n(&enriched, sort_by, top),
            worst: bottom_n(&enriched, sort_by, top),
            campaigns: &enriched,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_campaign_report(&range, &enriched, sort_by, top)?);
    }

    Ok(())
}

/// Renders the plain-text campaign report.
///
/// # Errors
///
/// Returns [`fmt::Error`] if writing to the buffer fails.
pub(crate) fn render_campaign_report(
    range: &DateRange,
    campaigns: &[EnrichedCampaignRecord],
    sort_by: SortKey,
    n: usize,
) -> Result<String, fmt::Error> {
    use std::fmt::Write as _;

    let mut out = String::new();
    writeln!(out, "Campaign performance {range}")?;
    writeln!(out)?;

    if campaigns.is_empty() {
        writeln!(out, "No campaign data found for the selected date range.")?;
        return Ok(out);
    }

    let summary = CampaignSummary::from_records(campaigns);
    #[allow(clippy::cast_precision_loss)]
    let total_campaigns = summary.total_campaigns as f64;
    writeln!(out, "KPI SUMMARY")?;
    writeln!(
        out,
        "{:<18}{:<18}{:<18}TOTAL CONVERSIONS",
        "TOTAL CAMPAIGNS", "TOTAL DELIVERED", "TOTAL CLICKS"
    )?;
    writeln!(
        out,
        "{:<18}{:<18}{:<18}{}",
        fmt_count(total_campaigns),
        fmt_count(summary.total_delivered),
        fmt_count(summary.total_clicks),
        fmt_count(summary.total_conversions),
    )?;

    for (title, ranked) in [
        ("Top", top_n(campaigns, sort_by, n)),
        ("Worst", bottom_n(campaigns, sort_by, n)),
    ] {
        writeln!(out)?;
        writeln!(out, "{title} {n} campaigns by {}", sort_by.label())?;
        writeln!(out, "{:<42}{}", "CAMPAIGN", sort_by.label().to_uppercase())?;
        for record in ranked {
            writeln!(
                out,
                "{:<42}{}",
                truncate(&record.name, 38),
                fmt_metric(sort_by, sort_by.value(record))
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "DETAILED CAMPAIGN REPORT")?;
    writeln!(
        out,
        "{:<30}{:>10}{:>11}{:>10}{:>9}{:>12}{:>8}{:>10}{:>10}{:>8}{:>8}{:>9}",
        "CAMPAIGN",
        "SENT",
        "DELIVERED",
        "OPENS",
        "CLICKS",
        "CONVERSIONS",
        "FAILED",
        "DELIV %",
        "OPEN %",
        "CTR %",
        "CTOR %",
        "CTC %"
    )?;
    for c in campaigns {
        writeln!(
            out,
            "{:<30}{:>10}{:>11}{:>10}{:>9}{:>12}{:>8}{:>10}{:>10}{:>8}{:>8}{:>9}",
            truncate(&c.name, 26),
            fmt_count(c.sent),
            fmt_count(c.delivered),
            fmt_count(c.opens),
            fmt_count(c.clicks),
            fmt_count(c.conversions),
            fmt_count(c.failed),
            fmt_pct(c.delivery_rate),
            fmt_pct(c.open_rate),
            fmt_pct(c.ctr),
            fmt_pct(c.ctor),
            fmt_pct(c.ctc_rate),
        )?;
    }

    Ok(out)
}

fn fmt_metric(key: SortKey, value: f64) -> String {
    match key {
        SortKey::Sent
        | SortKey::Delivered
        | SortKey::Opens
        | SortKey::Clicks
        | SortKey::Conversions => fmt_count(value),
        SortKey::DeliveryRate
        | SortKey::OpenRate
        | SortKey::Ctr
        | SortKey::Ctor
        | SortKey::CtcRate => fmt_pct(value),
    }
}
