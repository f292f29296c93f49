//! Client and response normalization for the `MoEngage` campaign Stats API.

pub mod cache;
pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use cache::TtlCache;
pub use client::{CampaignDataClient, CampaignFetch, RangeCache, RangeKey};
pub use error::MoengageError;
pub use normalize::{first_platform, normalize_campaigns, PlatformSelector, ResponseNormalizer};
pub use types::{AttributionType, MetricType, StatsRequest};
