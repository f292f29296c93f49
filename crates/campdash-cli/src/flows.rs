//! `flows` report over bundled sample flows.
//!
//! Live flow stats need the provider's Data Exports API, which this tool does
//! not call; the report runs on the fixture below.

use std::fmt;

use campdash_core::{
    derive_flow_metrics, EnrichedFlowRecord, FlowRecord, FlowStatus, FlowSummary,
};
use serde::Serialize;

use crate::format::{fmt_count, fmt_pct, truncate};

#[derive(Debug, Serialize)]
struct FlowReport<'a> {
    summary: FlowSummary,
    flows: &'a [EnrichedFlowRecord],
}

fn flow(
    name: &str,
    entered: f64,
    completed: f64,
    dropped_off: f64,
    conversions: f64,
    created_by: &str,
    status: FlowStatus,
) -> FlowRecord {
    FlowRecord {
        name: name.to_string(),
        entered,
        completed,
        dropped_off,
        conversions,
        created_by: created_by.to_string(),
        status,
    }
}

pub(crate) fn sample_flows() -> Vec<FlowRecord> {
    vec![
        flow(
            "New User Onboarding Flow",
            1500.0,
            1100.0,
            400.0,
            850.0,
            "marketing@example.com",
            FlowStatus::Active,
        ),
        flow(
            "Cart Abandonment Recovery",
            800.0,
            500.0,
            300.0,
            450.0,
            "retention@example.com",
            FlowStatus::Active,
        ),
        flow(
            "Subscription Renewal Reminder",
            2500.0,
            2200.0,
            300.0,
            2000.0,
            "marketing@example.com",
            FlowStatus::Finished,
        ),
    ]
}

/// Derives flow metrics, keeping only `name` when given.
pub(crate) fn select_flows(flows: &[FlowRecord], name: Option<&str>) -> Vec<EnrichedFlowRecord> {
    derive_flow_metrics(flows)
        .into_iter()
        .filter(|f| name.is_none_or(|wanted| f.flow.name == wanted))
        .collect()
}

/// Print the flow report.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub(crate) fn run_flows(name: Option<&str>, json: bool) -> anyhow::Result<()> {
    tracing::info!("flows report uses sample data");
    let flows = select_flows(&sample_flows(), name);

    if json {
        let report = FlowReport {
            summary: FlowSummary::from_records(&flows),
            flows: &flows,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_flow_report(&flows)?);
    }
    Ok(())
}

/// Renders the plain-text flow report.
///
/// # Errors
///
/// Returns [`fmt::Error`] if writing to the buffer fails.
pub(crate) fn render_flow_report(flows: &[EnrichedFlowRecord]) -> Result<String, fmt::Error> {
    use std::fmt::Write as _;

    let mut out = String::new();
    writeln!(out, "Displaying sample flow data.")?;
    writeln!(out)?;

    let summary = FlowSummary::from_records(flows);
    writeln!(out, "FLOWS PERFORMANCE SUMMARY")?;
    writeln!(
        out,
        "{:<22}{:<24}TOTAL CONVERSIONS",
        "TOTAL ENTERED", "TOTAL COMPLETED"
    )?;
    writeln!(
        out,
        "{:<22}{:<24}{}",
        fmt_count(summary.total_entered),
        fmt_count(summary.total_completed),
        fmt_count(summary.total_conversions),
    )?;

    writeln!(out)?;
    writeln!(out, "DETAILED FLOW REPORT")?;
    writeln!(
        out,
        "{:<34}{:>9}{:>11}{:>9}{:>13}{:>14}{:>14}  {:<10}CREATED BY",
        "FLOW",
        "ENTERED",
        "COMPLETED",
        "DROPPED",
        "CONVERSIONS",
        "COMPLETION %",
        "CONVERSION %",
        "STATUS"
    )?;
    for f in flows {
        writeln!(
            out,
            "{:<34}{:>9}{:>11}{:>9}{:>13}{:>14}{:>14}  {:<10}{}",
            truncate(&f.flow.name, 30),
            fmt_count(f.flow.entered),
            fmt_count(f.flow.completed),
            fmt_count(f.flow.dropped_off),
            fmt_count(f.flow.conversions),
            fmt_pct(f.completion_rate),
            fmt_pct(f.conversion_rate),
            f.flow.status.to_string(),
            f.flow.created_by,
        )?;
    }
    Ok(out)
}
