//! Flow (journey) records.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowStatus {
    Active,
    Finished,
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowStatus::Active => write!(f, "Active"),
            FlowStatus::Finished => write!(f, "Finished"),
        }
    }
}

/// Entry/exit counts for one flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub name: String,
    pub entered: f64,
    pub completed: f64,
    pub dropped_off: f64,
    pub conversions: f64,
    pub created_by: String,
    pub status: FlowStatus,
}

/// A [`FlowRecord`] with completion and conversion rates, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedFlowRecord {
    #[serde(flatten)]
    pub flow: FlowRecord,
    pub completion_rate: f64,
    pub conversion_rate: f64,
}
