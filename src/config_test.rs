use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_defaults_when_unset() {
    let config = Config::from_lookup(lookup_from(&[])).unwrap();

    assert_eq!(config.port, 3000);
    assert_eq!(config.version, "v1");
    assert_eq!(config, Config::default());
}

#[test]
fn test_reads_port_and_version() {
    let config =
        Config::from_lookup(lookup_from(&[("PORT", "8081"), ("APP_VERSION", "v2")])).unwrap();

    assert_eq!(config.port, 8081);
    assert_eq!(config.version, "v2");
}

/// Empty values behave like unset ones
#[test]
fn test_empty_values_fall_back_to_defaults() {
    let config = Config::from_lookup(lookup_from(&[("PORT", ""), ("APP_VERSION", "")])).unwrap();

    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.version, DEFAULT_VERSION);
}

#[test]
fn test_port_whitespace_is_trimmed() {
    let config = Config::from_lookup(lookup_from(&[("PORT", " 4000\n")])).unwrap();

    assert_eq!(config.port, 4000);
}

#[test]
fn test_invalid_port_is_rejected() {
    for bad in ["http", "-1", "65536", "30.5"] {
        let err = Config::from_lookup(lookup_from(&[("PORT", bad)])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidPort {
                value: bad.to_string()
            },
            "PORT={bad:?} should be rejected"
        );
    }
}

#[test]
fn test_version_is_kept_verbatim() {
    let config =
        Config::from_lookup(lookup_from(&[("APP_VERSION", "2024.10-rc1 blue")])).unwrap();

    assert_eq!(config.version, "2024.10-rc1 blue");
}

#[test]
fn test_invalid_port_error_message_names_variable() {
    let err = ConfigError::InvalidPort {
        value: "abc".to_string(),
    };

    assert!(err.to_string().contains("PORT"));
    assert!(err.to_string().contains("\"abc\""));
}
