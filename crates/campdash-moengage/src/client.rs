//! HTTP client for the `MoEngage` campaign Stats API.
//!
//! Sends one authenticated POST per date range, normalizes the response into
//! [`CampaignRecord`]s, and memoizes the result per range for the cache TTL.
//! Transport failures are degraded to an empty result by [`CampaignDataClient::fetch`].

use std::sync::Arc;
use std::time::Duration;

use campdash_core::{AppConfig, CampaignRecord, DateRange, MoengageCredentials};
use chrono::Utc;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};

use crate::cache::TtlCache;
use crate::error::MoengageError;
use crate::normalize::ResponseNormalizer;
use crate::types::StatsRequest;

/// Header carrying the workspace (app) identifier.
pub const APP_KEY_HEADER: &str = "MOE-APPKEY";

/// Cache key: `(start_date, end_date)` as sent on the wire.
pub type RangeKey = (String, String);

/// Per-range cache of normalized campaigns.
pub type RangeCache = TtlCache<RangeKey, Arc<[CampaignRecord]>, MoengageError>;

/// Result of [`CampaignDataClient::fetch`]: always usable, possibly empty.
#[derive(Debug, Clone)]
pub struct CampaignFetch {
    pub records: Arc<[CampaignRecord]>,
    /// User-facing message when the request failed and `records` is empty
    /// because of it.
    pub warning: Option<String>,
}

impl CampaignFetch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Client for the campaign Stats API.
///
/// Owns its HTTP client and range cache. Build once per process and share
/// (for example behind an `Arc`) so concurrent callers hit the same cache.
pub struct CampaignDataClient {
    client: Client,
    endpoint: Url,
    app_id: String,
    data_api_id: String,
    data_api_key: String,
    normalizer: ResponseNormalizer,
    cache: RangeCache,
}

impl CampaignDataClient {
    /// Creates a client from loaded application config.
    ///
    /// # Errors
    ///
    /// Returns [`MoengageError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`MoengageError::InvalidEndpoint`] if the
    /// configured endpoint is not a valid URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, MoengageError> {
        Self::new(
            &config.moengage,
            config.request_timeout_secs,
            RangeCache::new(Duration::from_secs(config.cache_ttl_secs)),
        )
    }

    /// Creates a client with an explicit cache.
    ///
    /// # Errors
    ///
    /// Returns [`MoengageError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`MoengageError::InvalidEndpoint`] if
    /// `credentials.api_base_url` is not a valid URL.
    pub fn new(
        credentials: &MoengageCredentials,
        timeout_secs: u64,
        cache: RangeCache,
    ) -> Result<Self, MoengageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("campdash/0.1 (campaign-stats)")
            .build()?;

        let endpoint = Url::parse(credentials.api_base_url.trim()).map_err(|e| {
            MoengageError::InvalidEndpoint(format!("'{}': {e}", credentials.api_base_url))
        })?;

        Ok(Self {
            client,
            endpoint,
            app_id: credentials.app_id.clone(),
            data_api_id: credentials.data_api_id.clone(),
            data_api_key: credentials.data_api_key.clone(),
            normalizer: ResponseNormalizer::default(),
            cache,
        })
    }

    /// Replaces the response normalizer (e.g. to change platform selection).
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: ResponseNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Campaigns for `range`, never failing.
    ///
    /// On a transport failure the error is logged and an empty sequence is
    /// returned with [`CampaignFetch::warning`] set. Failures are not cached.
    pub async fn fetch(&self, range: &DateRange) -> CampaignFetch {
        match self.try_fetch(range).await {
            Ok(records) => CampaignFetch {
                records,
                warning: None,
            },
            Err(e) => {
                tracing::error!(range = %range, error = %e, "campaign stats request failed");
                CampaignFetch {
                    records: Arc::from(Vec::new()),
                    warning: Some(format!("API Error: {e}")),
                }
            }
        }
    }

    /// Campaigns for `range`, propagating request failures.
    ///
    /// Served from the cache while a live entry exists; concurrent calls for
    /// the same range share a single request and its outcome.
    ///
    /// # Errors
    ///
    /// The error is shared by every caller that waited on the failed request:
    ///
    /// - [`MoengageError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`MoengageError::Deserialize`] if the body is not JSON.
    pub async fn try_fetch(
        &self,
        range: &DateRange,
    ) -> Result<Arc<[CampaignRecord]>, Arc<MoengageError>> {
        let key = (range.start_param(), range.end_param());
        self.cache
            .get_or_try_load(key, || async {
                tracing::debug!(range = %range, "campaign cache miss; requesting stats");
                let body = self.request_stats(range).await?;
                let records = self.normalizer.normalize(&body);
                tracing::info!(
                    range = %range,
                    campaigns = records.len(),
                    "fetched campaign stats"
                );
                Ok::<_, MoengageError>(Arc::from(records))
            })
            .await
    }

    #[must_use]
    pub fn cache(&self) -> &RangeCache {
        &self.cache
    }

    /// Sends the Stats API POST, asserts a 2xx status, and parses the body as JSON.
    async fn request_stats(&self, range: &DateRange) -> Result<serde_json::Value, MoengageError> {
        let payload = StatsRequest::new(range, Utc::now());
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(APP_KEY_HEADER, &self.app_id)
            .basic_auth(&self.data_api_id, Some(&self.data_api_key))
            .json(&payload)
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MoengageError::Deserialize {
            context: format!("campaign stats for {range}"),
            source: e,
        })
    }
}

impl std::fmt::Debug for CampaignDataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignDataClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("app_id", &self.app_id)
            .field("data_api_id", &self.data_api_id)
            .field("data_api_key", &"[redacted]")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
