use thiserror::Error;

/// Errors returned by the `MoEngage` Stats API client.
#[derive(Debug, Error)]
pub enum MoengageError {
    /// Network failure, timeout, or non-2xx status from the Stats API.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured endpoint is not a usable URL.
    #[error("invalid Stats API endpoint: {0}")]
    InvalidEndpoint(String),

    /// One campaign entry in the payload did not have the expected shape.
    #[error("malformed stats for campaign {campaign_id}: {reason}")]
    MalformedEntry {
        campaign_id: String,
        reason: &'static str,
    },
}

impl MoengageError {
    /// `true` for failures of the request itself, which callers degrade to an
    /// empty result rather than propagate.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            MoengageError::Http(_) | MoengageError::Deserialize { .. }
        )
    }
}
