// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later wins:
//! 1. TOML file (base values, missing keys take defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, WebnnConfig, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Find the configuration file
///
/// Search order:
/// 1. `WEBNN_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("WEBNN_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by WEBNN_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Configuration file '{}' not found in any of these locations:\n{}\n\nSet WEBNN_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from a TOML file and apply overrides
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if the file is not found or contains invalid TOML.
/// Validation is a separate step, see [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<WebnnConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: WebnnConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config)?;
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    Ok(config)
}

/// Parse a configuration handed over as JSON (browser pages have no file system)
///
/// No environment overrides are applied.
pub fn load_config_from_json(json: &str) -> ConfigResult<WebnnConfig> {
    Ok(serde_json::from_str(json)?)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `WEBNN_DEVICE_TYPE` -> `context.device_type`
/// - `WEBNN_POWER_PREFERENCE` -> `context.power_preference`
/// - `WEBNN_FALLBACK_TO_DEFAULT` -> `context.fallback_to_default`
/// - `WEBNN_SERVER_HOST` -> `server.host`
/// - `WEBNN_SERVER_PORT` -> `server.port`
/// - `WEBNN_DIST_DIR` -> `server.dist_dir`
/// - `WEBNN_LOG_LEVEL` -> `logging.level`
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a variable is set to something unparseable.
pub fn apply_environment_overrides(config: &mut WebnnConfig) -> ConfigResult<()> {
    apply_overrides_from(config, |name| env::var(name).ok())
}

/// Apply overrides from an arbitrary variable lookup
///
/// Same variable names as [`apply_environment_overrides`].
pub fn apply_overrides_from<F>(config: &mut WebnnConfig, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("WEBNN_DEVICE_TYPE") {
        config.context.device_type = value.parse()?;
    }
    if let Some(value) = lookup("WEBNN_POWER_PREFERENCE") {
        config.context.power_preference = value.parse()?;
    }
    if let Some(value) = lookup("WEBNN_FALLBACK_TO_DEFAULT") {
        config.context.fallback_to_default = parse_bool("WEBNN_FALLBACK_TO_DEFAULT", &value)?;
    }
    if let Some(value) = lookup("WEBNN_SERVER_HOST") {
        config.server.host = value;
    }
    if let Some(value) = lookup("WEBNN_SERVER_PORT") {
        config.server.port = parse_port("WEBNN_SERVER_PORT", &value)?;
    }
    if let Some(value) = lookup("WEBNN_DIST_DIR") {
        config.server.dist_dir = PathBuf::from(value);
    }
    if let Some(value) = lookup("WEBNN_LOG_LEVEL") {
        config.logging.level = value;
    }
    Ok(())
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - Map of CLI arguments, e.g. `{"port": "9000", "device_type": "cpu"}`
///
/// Recognized keys: `device_type`, `power_preference`, `fallback_to_default`,
/// `host`, `port`, `dist_dir`, `log_level`, `log_format`.
pub fn apply_cli_overrides(
    config: &mut WebnnConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    if let Some(value) = cli_args.get("device_type") {
        config.context.device_type = value.parse()?;
    }
    if let Some(value) = cli_args.get("power_preference") {
        config.context.power_preference = value.parse()?;
    }
    if let Some(value) = cli_args.get("fallback_to_default") {
        config.context.fallback_to_default = parse_bool("fallback_to_default", value)?;
    }
    if let Some(value) = cli_args.get("host") {
        config.server.host = value.clone();
    }
    if let Some(value) = cli_args.get("port") {
        config.server.port = parse_port("port", value)?;
    }
    if let Some(value) = cli_args.get("dist_dir") {
        config.server.dist_dir = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_format") {
        config.logging.format = value.clone();
    }
    Ok(())
}

fn parse_bool(name: &str, value: &str) -> ConfigResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue(format!(
            "{} must be a boolean, got '{}'",
            name, value
        ))),
    }
}

fn parse_port(name: &str, value: &str) -> ConfigResult<u16> {
    value.parse::<u16>().map_err(|_| {
        ConfigError::InvalidValue(format!("{} must be a port number, got '{}'", name, value))
    })
}
