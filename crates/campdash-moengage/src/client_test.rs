use super::*;

fn credentials(url: &str) -> MoengageCredentials {
    MoengageCredentials {
        api_base_url: url.to_string(),
        app_id: "APP123".to_string(),
        data_api_id: "data-id".to_string(),
        data_api_key: "data-key".to_string(),
    }
}

#[test]
fn new_rejects_invalid_endpoint() {
    let result = CampaignDataClient::new(
        &credentials("not a url"),
        30,
        RangeCache::new(Duration::from_secs(600)),
    );
    assert!(
        matches!(result, Err(MoengageError::InvalidEndpoint(_))),
        "expected InvalidEndpoint, got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_api_key() {
    let client = CampaignDataClient::new(
        &credentials("https://api-01.moengage.com/core-services/v1/campaign-stats"),
        30,
        RangeCache::new(Duration::from_secs(600)),
    )
    .expect("client construction should not fail");
    let rendered = format!("{client:?}");
    assert!(!rendered.contains("data-key"), "key leaked: {rendered}");
}

#[test]
fn from_config_uses_configured_ttl() {
    let config = AppConfig {
        moengage: credentials("https://api-01.moengage.com/core-services/v1/campaign-stats"),
        log_level: "info".to_string(),
        request_timeout_secs: 5,
        cache_ttl_secs: 42,
    };
    let client =
        CampaignDataClient::from_config(&config).expect("client construction should not fail");
    assert_eq!(client.cache().ttl(), Duration::from_secs(42));
    assert!(client.cache().is_empty());
}
