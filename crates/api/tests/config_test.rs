use std::collections::HashMap;

use pretty_assertions::assert_eq;
use rstest::rstest;
use salonbook_api::config::ApiConfig;
use tracing::Level;

fn load(vars: &[(&str, &str)]) -> eyre::Result<ApiConfig> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ApiConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults() {
    let config = load(&[("DATABASE_URL", "postgres://localhost/salonbook")]).unwrap();

    assert_eq!(config.server_addr(), "0.0.0.0:3000");
    assert_eq!(config.database_max_connections, 5);
    assert_eq!(config.log_level, Level::INFO);
    assert_eq!(config.cors_origins, None);
    assert_eq!(config.request_timeout, 30);
    assert_eq!(config.policy.open_hour, 9);
    assert_eq!(config.policy.close_hour, 19);
    assert_eq!(config.policy.max_weeks_ahead, 3);
}

#[test]
fn test_database_url_is_required() {
    assert!(load(&[]).is_err());
}

#[test]
fn test_overrides() {
    let config = load(&[
        ("DATABASE_URL", "postgres://db/salonbook"),
        ("API_HOST", "127.0.0.1"),
        ("API_PORT", "8080"),
        ("LOG_LEVEL", "debug"),
        ("API_CORS_ORIGINS", "http://a.test, http://b.test,"),
        ("BUSINESS_OPEN_HOUR", "8"),
        ("BUSINESS_CLOSE_HOUR", "20"),
        ("BOOKING_MAX_WEEKS_AHEAD", "1"),
    ])
    .unwrap();

    assert_eq!(config.server_addr(), "127.0.0.1:8080");
    assert_eq!(config.log_level, Level::DEBUG);
    assert_eq!(
        config.cors_origins,
        Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
    );
    assert_eq!((config.policy.open_hour, config.policy.close_hour), (8, 20));
    assert_eq!(config.policy.max_weeks_ahead, 1);
}

#[rstest]
#[case("API_PORT", "not-a-port")]
#[case("DATABASE_MAX_CONNECTIONS", "-1")]
#[case("BUSINESS_OPEN_HOUR", "nine")]
#[case("BUSINESS_CLOSE_HOUR", "25")]
#[case("BUSINESS_OPEN_HOUR", "19")]
#[case("BOOKING_MAX_WEEKS_AHEAD", "-2")]
fn test_invalid_values_are_rejected(#[case] key: &str, #[case] value: &str) {
    let result = load(&[("DATABASE_URL", "postgres://localhost/salonbook"), (key, value)]);

    assert!(result.is_err(), "{}={} should be rejected", key, value);
}
