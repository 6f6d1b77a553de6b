use crate::*;
use std::collections::HashMap;
use std::time::Duration;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key: &str| map.get(key).cloned()
}

// ========== Tier ==========

#[test]
fn test_tier_parse_normalizes() {
    assert_eq!(" Premium ".parse::<Tier>().unwrap(), Tier::Premium);
    assert_eq!("ENTERPRISE".parse::<Tier>().unwrap(), Tier::Enterprise);
    assert_eq!("standard".parse::<Tier>().unwrap(), Tier::Standard);
}

#[test]
fn test_tier_parse_rejects_unknown() {
    let err = "gold".parse::<Tier>().unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn test_tier_lenient_defaults_to_standard() {
    assert_eq!(Tier::parse_or_standard("gold"), Tier::Standard);
    assert_eq!(Tier::parse_or_standard(""), Tier::Standard);
    assert_eq!(Tier::parse_or_standard("enterprise"), Tier::Enterprise);
}

#[test]
fn test_tier_ordering() {
    assert!(Tier::Standard < Tier::Premium);
    assert!(Tier::Premium < Tier::Enterprise);
}

// ========== Request Validation ==========

#[test]
fn test_valid_request() {
    let r = Request::new("hi").with_max_tokens(10);
    assert_eq!(r.validate().unwrap(), Tier::Standard);
}

#[test]
fn test_request_defaults() {
    let r = Request::new("hi");
    assert_eq!(r.max_tokens, 1024);
    assert_eq!(r.temperature, 0.1);
    assert_eq!(r.user_id, "anonymous");
    assert_eq!(r.tier, "standard");
}

#[test]
fn test_empty_prompt_rejected() {
    assert!(Request::new("").validate().unwrap_err().is_invalid_request());
    assert!(Request::new("   \n\t").validate().unwrap_err().is_invalid_request());
}

#[test]
fn test_zero_max_tokens_rejected() {
    let err = Request::new("hi").with_max_tokens(0).validate().unwrap_err();
    assert!(err.is_invalid_request());
}

#[test]
fn test_max_tokens_upper_bound() {
    assert!(Request::new("hi").with_max_tokens(MAX_TOKENS_LIMIT).validate().is_ok());
    assert!(Request::new("hi").with_max_tokens(MAX_TOKENS_LIMIT + 1).validate().is_err());
}

#[test]
fn test_temperature_bounds() {
    assert!(Request::new("hi").with_temperature(0.0).validate().is_ok());
    assert!(Request::new("hi").with_temperature(2.0).validate().is_ok());
    assert!(Request::new("hi").with_temperature(-0.1).validate().is_err());
    assert!(Request::new("hi").with_temperature(2.5).validate().is_err());
    assert!(Request::new("hi").with_temperature(f64::NAN).validate().is_err());
}

#[test]
fn test_unknown_tier_rejected() {
    let err = Request::new("hi").with_tier("platinum").validate().unwrap_err();
    assert!(matches!(err, DispatchError::InvalidRequest(_)));
}

// ========== Serialization ==========

#[test]
fn test_location_wire_names() {
    assert_eq!(serde_json::to_string(&Location::OnPremise).unwrap(), "\"on-premise\"");
    assert_eq!(serde_json::to_string(&Location::CloudUs).unwrap(), "\"cloud-us\"");
    assert_eq!(Location::CloudEu.as_str(), "cloud-eu");
}

#[test]
fn test_provider_id_wire_names() {
    assert_eq!(serde_json::to_string(&ProviderId::LocalPhi4Mini).unwrap(), "\"local_phi4mini\"");
    let id: ProviderId = serde_json::from_str("\"groq_llama70b\"").unwrap();
    assert_eq!(id, ProviderId::GroqLlama70b);
}

#[test]
fn test_error_kind_labels() {
    let e = ProviderError::Timeout { after_ms: 5 };
    assert_eq!(e.kind(), ProviderErrorKind::ProviderTimeout);
    assert_eq!(e.kind().as_str(), "provider_timeout");
    assert_eq!(
        serde_json::to_string(&ProviderError::NotConfigured("x".into()).kind()).unwrap(),
        "\"provider_not_configured\""
    );
}

#[test]
fn test_timeout_millis_saturate() {
    assert_eq!(ProviderError::timeout(Duration::from_millis(250)), ProviderError::Timeout { after_ms: 250 });
    assert_eq!(ProviderError::timeout(Duration::MAX), ProviderError::Timeout { after_ms: u64::MAX });
}

#[test]
fn test_stage_terminality() {
    assert!(DispatchStage::Succeeded.is_terminal());
    assert!(DispatchStage::Rejected.is_terminal());
    assert!(!DispatchStage::Invoking.is_terminal());
}

// ========== Config ==========

#[test]
fn test_config_defaults() {
    let c = EngineConfig::default();
    assert_eq!(c.local.base_url, "http://localhost:11434/v1");
    assert!(!c.cloud.is_configured());
    assert_eq!(c.local_capacity, 10);
    assert!(c.validate().is_ok());
}

#[test]
fn test_config_from_lookup() {
    let c = EngineConfig::from_lookup(lookup(&[
        ("GROQ_API_KEY", "gsk_test"),
        ("EDGELLM_TIMEOUT_MS", "1500"),
        ("EDGELLM_LOCAL_CAPACITY", " 4 "),
        ("EDGELLM_LOCAL_BASE_URL", "http://gpu-box:11434/v1"),
    ]))
    .unwrap();
    assert!(c.cloud.is_configured());
    assert_eq!(c.invocation_timeout_ms, 1500);
    assert_eq!(c.local_capacity, 4);
    assert_eq!(c.local.base_url, "http://gpu-box:11434/v1");
}

#[test]
fn test_config_blank_cloud_key_is_absent() {
    let c = EngineConfig::from_lookup(lookup(&[("GROQ_API_KEY", "  ")])).unwrap();
    assert_eq!(c.cloud.api_key, None);
}

#[test]
fn test_config_bad_number() {
    let err = EngineConfig::from_lookup(lookup(&[("EDGELLM_TIMEOUT_MS", "soon")])).unwrap_err();
    assert!(err.to_string().contains("EDGELLM_TIMEOUT_MS"));
}

#[test]
fn test_config_zero_capacity_rejected() {
    let err = EngineConfig::from_lookup(lookup(&[("EDGELLM_LOCAL_CAPACITY", "0")])).unwrap_err();
    assert!(matches!(err, DispatchError::Config(_)));
}

#[test]
fn test_config_json_roundtrip() {
    let c = EngineConfig::default();
    let json = serde_json::to_string(&c).unwrap();
    let back: EngineConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(c, back);
}
