use serde_json::json;

use super::*;

fn platform(stats: &Value) -> Value {
    json!({
        "locales": {
            "all_locales": {
                "variations": {
                    "all_variations": { "performance_stats": stats }
                }
            }
        }
    })
}

fn well_formed(stats: &Value) -> Value {
    json!([{ "platforms": { "email": platform(stats) } }])
}

fn stat(record: &CampaignRecord, key: &str) -> Option<f64> {
    record.stats.get(key).copied()
}

#[test]
fn normalize_reads_all_locales_all_variations_slice() {
    let body = json!({
        "data": {
            "C1": well_formed(&json!({
                "sent": 100, "delivered": 80, "impression": 40, "click": 10, "conversion": 2
            }))
        }
    });

    let records = normalize_campaigns(&body);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].campaign_id, "C1");
    assert_eq!(records[0].name, "Campaign C1");
    assert_eq!(stat(&records[0], "sent"), Some(100.0));
    assert_eq!(stat(&records[0], "impression"), Some(40.0));
    assert_eq!(stat(&records[0], "conversion"), Some(2.0));
}

#[test]
fn normalize_skips_malformed_entries_without_aborting_batch() {
    let body = json!({
        "data": {
            "C2": [],
            "C3": [{}],
            "C4": [{ "platforms": {} }],
            "C5": null,
            "C1": well_formed(&json!({ "sent": 5 }))
        }
    });

    let records = normalize_campaigns(&body);
    let ids: Vec<_> = records.iter().map(|r| r.campaign_id.as_str()).collect();
    assert_eq!(ids, ["C1"]);
}

#[test]
fn normalize_preserves_provider_order() {
    let body = json!({
        "data": {
            "zeta": well_formed(&json!({})),
            "alpha": well_formed(&json!({})),
            "mid": well_formed(&json!({}))
        }
    });

    let ids: Vec<_> = normalize_campaigns(&body)
        .into_iter()
        .map(|r| r.campaign_id)
        .collect();
    assert_eq!(ids, ["zeta", "alpha", "mid"]);
}

#[test]
fn normalize_missing_path_segment_yields_empty_stats() {
    let body = json!({
        "data": {
            "C1": [{ "platforms": { "push": { "locales": { "en": {} } } } }],
            "C2": [{ "platforms": { "push": "not-an-object" } }]
        }
    });

    let records = normalize_campaigns(&body);
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.stats.is_empty()));
}

#[test]
fn normalize_uses_first_platform_only() {
    let body = json!({
        "data": {
            "C1": [{
                "platforms": {
                    "android": platform(&json!({ "sent": 7 })),
                    "ios": platform(&json!({ "sent": 9 }))
                }
            }]
        }
    });

    let records = normalize_campaigns(&body);
    assert_eq!(stat(&records[0], "sent"), Some(7.0));
}

#[test]
fn normalize_with_custom_selector() {
    fn by_name(platforms: &Map<String, Value>) -> Option<&Value> {
        platforms.get("ios")
    }

    let body = json!({
        "data": {
            "C1": [{
                "platforms": {
                    "android": platform(&json!({ "sent": 7 })),
                    "ios": platform(&json!({ "sent": 9 }))
                }
            }]
        }
    });

    let records = ResponseNormalizer::with_platform_selector(by_name).normalize(&body);
    assert_eq!(stat(&records[0], "sent"), Some(9.0));
}

#[test]
fn normalize_drops_non_numeric_stats() {
    let body = json!({
        "data": { "C1": well_formed(&json!({ "sent": 3, "label": "x", "click": 1.5 })) }
    });

    let records = normalize_campaigns(&body);
    assert_eq!(records[0].stats.len(), 2);
    assert_eq!(stat(&records[0], "click"), Some(1.5));
    assert_eq!(stat(&records[0], "label"), None);
}

#[test]
fn normalize_without_data_is_empty() {
    assert!(normalize_campaigns(&json!({})).is_empty());
    assert!(normalize_campaigns(&json!({ "data": [] })).is_empty());
    assert!(normalize_campaigns(&json!({ "data": {} })).is_empty());
}

#[test]
fn normalize_entry_reports_reason() {
    let err = ResponseNormalizer::default()
        .normalize_entry("C3", &json!([{}]))
        .unwrap_err();
    assert!(
        matches!(err, MoengageError::MalformedEntry { ref campaign_id, reason } if campaign_id == "C3" && reason == "missing platforms"),
        "unexpected error: {err:?}"
    );
    assert!(!err.is_transport());
}
