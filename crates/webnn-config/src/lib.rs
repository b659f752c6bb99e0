// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # WebNN Demo Configuration
//!
//! Type-safe configuration for the WebNN demo with support for:
//! - TOML file parsing (`webnn_configuration.toml`)
//! - Environment variable overrides
//! - CLI argument overrides
//! - JSON documents handed over by a browser page
//!
//! ## Usage
//!
//! ```rust,no_run
//! use webnn_config::{load_config, validate_config};
//!
//! let config = load_config(None, None)?;
//! validate_config(&config)?;
//!
//! println!("Serving {} on {}:{}", config.server.dist_dir.display(), config.server.host, config.server.port);
//! println!("Preferred device: {}", config.context.device_type);
//! # Ok::<(), webnn_config::ConfigError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "webnn_configuration.toml";

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{
    apply_cli_overrides, apply_environment_overrides, apply_overrides_from, find_config_file,
    load_config, load_config_from_json,
};
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_demo() {
        let config = WebnnConfig::default();
        assert_eq!(config.context.device_type, DeviceType::Gpu);
        assert_eq!(
            config.context.power_preference,
            PowerPreference::HighPerformance
        );
        assert!(config.context.fallback_to_default);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.dist_dir, std::path::PathBuf::from("./dist"));
    }

    #[test]
    fn test_enum_names() {
        assert_eq!("NPU".parse::<DeviceType>().unwrap(), DeviceType::Npu);
        assert_eq!(
            "low-power".parse::<PowerPreference>().unwrap(),
            PowerPreference::LowPower
        );
        assert_eq!(
            PowerPreference::HighPerformance.to_string(),
            "high-performance"
        );
        assert!(matches!(
            "tpu".parse::<DeviceType>(),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_parse_error_from_toml() {
        let err: ConfigError = toml::from_str::<WebnnConfig>("[server\nport = 1")
            .unwrap_err()
            .into();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
