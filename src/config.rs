//! # Configuration Management
//!
//! Settings for a codec endpoint: which protocol revision to speak by default, the
//! limits applied to lengths read off the wire, and how logging is set up.
//!
//! ## Configuration Sources
//! - TOML files via [`CodecConfig::from_file`]
//! - TOML strings via [`CodecConfig::from_toml`]
//! - Environment variables (`BEDROCK_PROTOCOL_*`) via [`CodecConfig::from_env`]
//! - Direct instantiation with defaults
//!
//! ## Example
//! ```toml
//! [codec]
//! default_version = 766
//! max_string_length = 2097152
//! max_list_length = 65536
//! max_batch_packets = 1024
//!
//! [logging]
//! log_level = "debug"
//! json_format = true
//! ```

use crate::core::binary::{
    CodecLimits, DEFAULT_MAX_BATCH_PACKETS, DEFAULT_MAX_LIST_LENGTH, DEFAULT_MAX_STRING_LENGTH,
};
use crate::core::version::ProtocolVersion;
use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "BEDROCK_PROTOCOL_";

/// Upper bound accepted for any configured length limit (64 MiB)
const MAX_CONFIGURABLE_LIMIT: usize = 64 * 1024 * 1024;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct CodecConfig {
    /// Codec behaviour
    #[serde(default)]
    pub codec: CodecSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CodecConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    ///
    /// Unlike unset variables, values that are set but do not parse are an error.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(version) = var("DEFAULT_VERSION") {
            config.codec.default_version = parse_env("DEFAULT_VERSION", &version)?;
        }
        if let Some(len) = var("MAX_STRING_LENGTH") {
            config.codec.max_string_length = parse_env("MAX_STRING_LENGTH", &len)?;
        }
        if let Some(len) = var("MAX_LIST_LENGTH") {
            config.codec.max_list_length = parse_env("MAX_LIST_LENGTH", &len)?;
        }
        if let Some(count) = var("MAX_BATCH_PACKETS") {
            config.codec.max_batch_packets = parse_env("MAX_BATCH_PACKETS", &count)?;
        }
        if let Some(level) = var("LOG_LEVEL") {
            config.logging.log_level = level.parse::<Level>().map_err(|_| {
                ProtocolError::ConfigError(format!("Invalid {ENV_PREFIX}LOG_LEVEL: {level}"))
            })?;
        }
        if let Some(json) = var("LOG_JSON") {
            config.logging.json_format = parse_env("LOG_JSON", &json)?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.codec.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| {
        ProtocolError::ConfigError(format!("Invalid {ENV_PREFIX}{name}: {value}"))
    })
}

/// Codec behaviour
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CodecSettings {
    /// Revision used when a connection has not negotiated one
    pub default_version: ProtocolVersion,

    /// Longest accepted string or byte string, in bytes
    pub max_string_length: usize,

    /// Largest accepted element count for a length-prefixed list
    pub max_list_length: usize,

    /// Largest accepted number of packets in one batch
    pub max_batch_packets: usize,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            default_version: ProtocolVersion::CURRENT,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
            max_list_length: DEFAULT_MAX_LIST_LENGTH,
            max_batch_packets: DEFAULT_MAX_BATCH_PACKETS,
        }
    }
}

impl CodecSettings {
    /// Limits to hand to readers
    pub fn limits(&self) -> CodecLimits {
        CodecLimits {
            max_string_length: self.max_string_length,
            max_list_length: self.max_list_length,
            max_batch_packets: self.max_batch_packets,
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.default_version.is_supported() {
            errors.push(format!(
                "Unknown default protocol version: {} (supported: {}..={})",
                self.default_version.id(),
                ProtocolVersion::OLDEST.id(),
                ProtocolVersion::CURRENT.id()
            ));
        }

        for (name, value) in [
            ("max_string_length", self.max_string_length),
            ("max_list_length", self.max_list_length),
            ("max_batch_packets", self.max_batch_packets),
        ] {
            if value == 0 {
                errors.push(format!("{name} must be greater than 0"));
            } else if value > MAX_CONFIGURABLE_LIMIT {
                errors.push(format!(
                    "{name} too large: {value} (maximum: {MAX_CONFIGURABLE_LIMIT})"
                ));
            }
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level, overridden by `RUST_LOG` when set
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,

    /// Colour codes in plain-text output
    #[serde(default)]
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            json_format: false,
            ansi: false,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.json_format && self.ansi {
            errors.push("ansi colours cannot be combined with JSON output".to_string());
        }
        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
