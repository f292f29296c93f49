pub mod app_config;
pub mod campaign;
pub mod config;
pub mod date_range;
pub mod error;
pub mod flow;
pub mod metrics;
pub mod ranking;

pub use app_config::{AppConfig, MoengageCredentials};
pub use campaign::{CampaignRecord, EnrichedCampaignRecord};
pub use config::{load_app_config, load_app_config_from_env, load_log_level};
pub use date_range::DateRange;
pub use error::{ConfigError, CoreError};
pub use flow::{EnrichedFlowRecord, FlowRecord, FlowStatus};
pub use metrics::{derive_campaign_metrics, derive_flow_metrics, percentage, round2};
pub use ranking::{bottom_n, top_n, CampaignSummary, FlowSummary, SortKey};
