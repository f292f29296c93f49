/// Credentials and endpoint for the `MoEngage` Stats API.
#[derive(Clone)]
pub struct MoengageCredentials {
    /// Full Stats API endpoint the POST is sent to.
    pub api_base_url: String,
    /// Sent as the `MOE-APPKEY` header.
    pub app_id: String,
    /// Basic-auth username.
    pub data_api_id: String,
    /// Basic-auth password.
    pub data_api_key: String,
}

impl std::fmt::Debug for MoengageCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoengageCredentials")
            .field("api_base_url", &self.api_base_url)
            .field("app_id", &self.app_id)
            .field("data_api_id", &self.data_api_id)
            .field("data_api_key", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub moengage: MoengageCredentials,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub cache_ttl_secs: u64,
}
