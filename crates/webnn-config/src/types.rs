// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `webnn_configuration.toml`.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WebnnConfig {
    pub context: ContextConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Options for creating the WebNN compute context
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ContextConfig {
    pub device_type: DeviceType,
    pub power_preference: PowerPreference,
    /// Retry with the host's default context if the preferred one is rejected
    pub fallback_to_default: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            device_type: DeviceType::Gpu,
            power_preference: PowerPreference::HighPerformance,
            fallback_to_default: true,
        }
    }
}

/// WebNN `MLContextOptions.deviceType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Cpu,
    Gpu,
    Npu,
}

impl DeviceType {
    pub const fn as_str(self) -> &'static str {
        match self {
            DeviceType::Cpu => "cpu",
            DeviceType::Gpu => "gpu",
            DeviceType::Npu => "npu",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpu" => Ok(DeviceType::Cpu),
            "gpu" => Ok(DeviceType::Gpu),
            "npu" => Ok(DeviceType::Npu),
            other => Err(ConfigError::InvalidValue(format!(
                "device_type must be cpu, gpu or npu, got '{}'",
                other
            ))),
        }
    }
}

/// WebNN `MLContextOptions.powerPreference`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerPreference {
    Default,
    HighPerformance,
    LowPower,
}

impl PowerPreference {
    pub const fn as_str(self) -> &'static str {
        match self {
            PowerPreference::Default => "default",
            PowerPreference::HighPerformance => "high-performance",
            PowerPreference::LowPower => "low-power",
        }
    }
}

impl fmt::Display for PowerPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerPreference {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(PowerPreference::Default),
            "high-performance" => Ok(PowerPreference::HighPerformance),
            "low-power" => Ok(PowerPreference::LowPower),
            other => Err(ConfigError::InvalidValue(format!(
                "power_preference must be default, high-performance or low-power, got '{}'",
                other
            ))),
        }
    }
}

/// Static file server configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the built demo (`index.html`, wasm bundle)
    pub dist_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9090,
            dist_dir: PathBuf::from("./dist"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// text or json
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}
