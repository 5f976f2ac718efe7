//! Unit tests for common-config crate

use std::io::Write;

use common_config::{DuplicatePolicy, ExchangeConfig, HaloConfig, RuntimeConfig};
use common_error::HaloError;

#[test]
fn test_halo_config_default() {
    let config = HaloConfig::default();

    assert_eq!(config.exchange.duplicate_policy, DuplicatePolicy::Reject);
    assert_eq!(config.exchange.default_partitions, 8);
    assert_eq!(config.runtime.parallelism, None);
    assert!(config.runtime.collect_stats);
    assert!(config.validate().is_ok());
}

#[test]
fn test_duplicate_policy_default() {
    assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::Reject);
}

#[test]
fn test_builder_methods() {
    let config = HaloConfig::default()
        .with_duplicate_policy(DuplicatePolicy::FirstWins)
        .with_default_partitions(3)
        .with_parallelism(2);

    assert_eq!(config.exchange.duplicate_policy, DuplicatePolicy::FirstWins);
    assert_eq!(config.exchange.default_partitions, 3);
    assert_eq!(config.runtime.parallelism, Some(2));
}

#[test]
fn test_config_json_roundtrip() {
    let config = HaloConfig {
        exchange: ExchangeConfig {
            duplicate_policy: DuplicatePolicy::FirstWins,
            default_partitions: 16,
        },
        runtime: RuntimeConfig {
            parallelism: Some(4),
            collect_stats: false,
        },
    };

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("FirstWins"));

    let deserialized = HaloConfig::from_json_str(&json).unwrap();
    assert_eq!(deserialized, config);
}

#[test]
fn test_config_partial_json() {
    let json = r#"{ "exchange": { "duplicate_policy": "FirstWins" } }"#;

    let config = HaloConfig::from_json_str(json).unwrap();
    assert_eq!(config.exchange.duplicate_policy, DuplicatePolicy::FirstWins);
    // Missing fields should use defaults
    assert_eq!(config.exchange.default_partitions, 8);
    assert_eq!(config.runtime, RuntimeConfig::default());
}

#[test]
fn test_config_toml() {
    let toml_str = toml::to_string_pretty(&HaloConfig::default()).unwrap();
    assert!(toml_str.contains("[exchange]"));
    assert!(toml_str.contains("duplicate_policy = \"Reject\""));

    let config = HaloConfig::from_toml_str(
        r#"
        [exchange]
        default_partitions = 2

        [runtime]
        parallelism = 3
        "#,
    )
    .unwrap();
    assert_eq!(config.exchange.default_partitions, 2);
    assert_eq!(config.runtime.parallelism, Some(3));
    assert!(config.runtime.collect_stats);
}

#[test]
fn test_config_yaml() {
    let yaml_str = serde_yaml::to_string(&HaloConfig::default()).unwrap();
    assert!(yaml_str.contains("exchange:"));

    let config = HaloConfig::from_yaml_str("runtime:\n  collect_stats: false\n").unwrap();
    assert!(!config.runtime.collect_stats);
    assert_eq!(config.exchange, ExchangeConfig::default());
}

#[test]
fn test_invalid_policy_rejected() {
    let json = r#"{ "exchange": { "duplicate_policy": "LastWins" } }"#;
    assert!(HaloConfig::from_json_str(json).is_err());
}

#[test]
fn test_zero_partitions_rejected() {
    let err = HaloConfig::from_toml_str("[exchange]\ndefault_partitions = 0\n").unwrap_err();
    assert!(matches!(err, HaloError::InvalidArgument(_)));
}

#[test]
fn test_zero_parallelism_rejected() {
    let err = HaloConfig::default().with_parallelism(0).validate().unwrap_err();
    assert!(matches!(err, HaloError::InvalidArgument(_)));
}

#[test]
fn test_malformed_toml_is_config_error() {
    let err = HaloConfig::from_toml_str("[exchange\n").unwrap_err();
    assert!(matches!(err, HaloError::ConfigError(_)));
}

#[test]
fn test_load_by_extension() {
    let dir = tempfile::tempdir().unwrap();

    let toml_path = dir.path().join("halo.toml");
    std::fs::File::create(&toml_path)
        .unwrap()
        .write_all(b"[exchange]\ndefault_partitions = 5\n")
        .unwrap();
    assert_eq!(HaloConfig::load(&toml_path).unwrap().exchange.default_partitions, 5);

    let yaml_path = dir.path().join("halo.yml");
    std::fs::write(&yaml_path, "exchange:\n  duplicate_policy: FirstWins\n").unwrap();
    assert_eq!(
        HaloConfig::load(&yaml_path).unwrap().exchange.duplicate_policy,
        DuplicatePolicy::FirstWins
    );

    let ini_path = dir.path().join("halo.ini");
    std::fs::write(&ini_path, "").unwrap();
    assert!(matches!(
        HaloConfig::load(&ini_path),
        Err(HaloError::ConfigError(_))
    ));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let err = HaloConfig::load("/nonexistent/halo.toml").unwrap_err();
    assert!(matches!(err, HaloError::IoError(_)));
}
