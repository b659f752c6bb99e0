// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks that values are within valid ranges before the server or the demo
//! starts using them. Every problem is collected so one run reports them all.

use crate::{ConfigError, ConfigResult, WebnnConfig};

/// Log levels accepted by `logging.level`
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Log formats accepted by `logging.format`
pub const LOG_FORMATS: [&str; 2] = ["text", "json"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    InvalidPortRange { port_name: String, port: u16 },
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPortRange { port_name, port } => {
                write!(
                    f,
                    "Port {} = {} is outside valid range (1024-65535)",
                    port_name, port
                )
            }
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every failed check
pub fn validate_config(config: &WebnnConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);
    if errors.is_empty() {
        return Ok(());
    }

    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

/// Every validation problem in `config`, empty if valid
pub fn collect_errors(config: &WebnnConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_server(config, &mut errors);
    validate_logging(config, &mut errors);
    errors
}

fn validate_server(config: &WebnnConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.server.port < 1024 {
        errors.push(ConfigValidationError::InvalidPortRange {
            port_name: "server.port".to_string(),
            port: config.server.port,
        });
    }
    if config.server.host.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "server.host".to_string(),
        });
    }
    if config.server.dist_dir.as_os_str().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "server.dist_dir".to_string(),
        });
    }
}

fn validate_logging(config: &WebnnConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!(
                "'{}' is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }
    let format = config.logging.format.to_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.format".to_string(),
            reason: format!("'{}' is not one of text, json", config.logging.format),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&WebnnConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_port_range() {
        let mut config = WebnnConfig::default();
        config.server.port = 80;

        let errors = collect_errors(&config);
        assert_eq!(
            errors,
            vec![ConfigValidationError::InvalidPortRange {
                port_name: "server.port".to_string(),
                port: 80
            }]
        );
    }

    #[test]
    fn test_missing_required_fields() {
        let mut config = WebnnConfig::default();
        config.server.host = "  ".to_string();
        config.server.dist_dir = PathBuf::new();

        assert_eq!(collect_errors(&config).len(), 2);
    }

    #[test]
    fn test_all_errors_are_reported() {
        let mut config = WebnnConfig::default();
        config.server.port = 22;
        config.logging.level = "verbose".to_string();
        config.logging.format = "xml".to_string();

        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("server.port = 22"));
        assert!(message.contains("logging.level"));
        assert!(message.contains("logging.format"));
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let mut config = WebnnConfig::default();
        config.logging.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
