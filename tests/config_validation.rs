//! Integration tests for configuration validation

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bedrock_protocol::config::{CodecConfig, CodecSettings, LoggingConfig};
use bedrock_protocol::core::version::ProtocolVersion;
use bedrock_protocol::error::ProtocolError;
use bedrock_protocol::protocol::{Dispatcher, NoopHandler};
use tracing::Level;

#[test]
fn test_default_config_validates() {
    let config = CodecConfig::default();
    let errors = config.validate();
    assert!(
        errors.is_empty(),
        "Default config should be valid, but got errors: {:?}",
        errors
    );
}

#[test]
fn test_unknown_default_version() {
    let mut config = CodecConfig::default();
    config.codec.default_version = ProtocolVersion(9999);

    let errors = config.validate();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Unknown default protocol version"));
}

#[test]
fn test_zero_limits() {
    let config = CodecConfig::default_with_overrides(|c| {
        c.codec.max_string_length = 0;
        c.codec.max_batch_packets = 0;
    });
    let errors = config.validate();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.contains("must be greater than 0")));
}

#[test]
fn test_oversized_limit() {
    let mut settings = CodecSettings::default();
    settings.max_list_length = usize::MAX;
    assert!(settings.validate()[0].contains("too large"));
}

#[test]
fn test_json_with_ansi_rejected() {
    let logging = LoggingConfig {
        log_level: Level::DEBUG,
        json_format: true,
        ansi: true,
    };
    assert_eq!(logging.validate().len(), 1);
}

#[test]
fn test_validate_strict_error_kind() {
    let config = CodecConfig::default_with_overrides(|c| c.codec.max_list_length = 0);
    match config.validate_strict() {
        Err(ProtocolError::ConfigError(message)) => {
            assert!(message.starts_with("Configuration validation failed:"));
        }
        other => panic!("expected a config error, got {other:?}"),
    }
}

#[test]
fn test_full_toml() {
    let config = CodecConfig::from_toml(
        r#"
        [codec]
        default_version = 618
        max_string_length = 4096
        max_list_length = 256
        max_batch_packets = 16

        [logging]
        log_level = "trace"
        json_format = false
        ansi = true
        "#,
    )
    .unwrap();
    assert_eq!(config.codec.default_version, ProtocolVersion::PROTOCOL_1_20_30);
    assert_eq!(config.codec.limits().max_batch_packets, 16);
    assert_eq!(config.logging.log_level, Level::TRACE);
    assert!(config.validate().is_empty());

    let dispatcher = Dispatcher::from_settings(NoopHandler, &config.codec);
    assert_eq!(dispatcher.version(), ProtocolVersion::PROTOCOL_1_20_30);
}

#[test]
fn test_bad_log_level_in_toml() {
    let result = CodecConfig::from_toml(
        r#"
        [logging]
        log_level = "loud"
        json_format = false
        "#,
    );
    assert!(matches!(result, Err(ProtocolError::ConfigError(_))));
}

#[test]
fn test_save_and_load_file() {
    let path = std::env::temp_dir().join(format!(
        "bedrock-protocol-config-{}.toml",
        std::process::id()
    ));
    let config = CodecConfig::default_with_overrides(|c| {
        c.codec.default_version = ProtocolVersion::PROTOCOL_1_19_80;
        c.logging.json_format = true;
    });
    config.save_to_file(&path).unwrap();
    let loaded = CodecConfig::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        CodecConfig::from_file("/nonexistent/bedrock-protocol.toml"),
        Err(ProtocolError::ConfigError(_))
    ));
}
