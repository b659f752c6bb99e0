// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-webnn-bridge` to raise one crate to debug
//! level without flooding the output with everything else.

use std::collections::BTreeSet;
use std::env;

use crate::KNOWN_CRATES;

/// Crates with debug logging turned on
///
/// # Example
/// ```rust
/// use webnn_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-webnn-bridge".to_string()]);
/// assert!(flags.is_enabled("webnn-bridge"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateDebugFlags {
    pub enabled_crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}`.
    /// `--debug-all` enables all known crates.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = CrateDebugFlags::default();
        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
            } else if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enabled_crates.insert(crate_name.to_string());
            }
        }
        flags
    }

    /// Merge a `WEBNN_DEBUG` style value: `all` or comma-separated crate names
    pub fn merge_env_value(&mut self, value: &str) {
        if value.trim() == "all" {
            self.enable_all();
            return;
        }
        for crate_name in value.split(',') {
            let crate_name = crate_name.trim();
            if !crate_name.is_empty() {
                self.enabled_crates.insert(crate_name.to_string());
            }
        }
    }

    fn enable_all(&mut self) {
        self.enabled_crates
            .extend(KNOWN_CRATES.iter().map(|name| name.to_string()));
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(crate_name)
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Log level for a crate: DEBUG if enabled, INFO otherwise
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// `EnvFilter` directive string with `default_level` for everything else
    ///
    /// Format: `webnn-bridge=debug,info`, or just the default when nothing is enabled.
    pub fn to_filter_string(&self, default_level: &str) -> String {
        self.enabled_crates
            .iter()
            .map(|crate_name| format!("{}=debug", crate_name))
            .chain(std::iter::once(default_level.to_string()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Parse debug flags from the process arguments and `WEBNN_DEBUG`
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());
    if let Ok(value) = env::var("WEBNN_DEBUG") {
        flags.merge_env_value(&value);
    }
    flags
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  WEBNN_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  WEBNN_DEBUG=all                               Enable debug for all crates
"#,
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-webnn-bridge".to_string()]);
        assert!(flags.is_enabled("webnn-bridge"));
        assert!(!flags.is_enabled("webnn-config"));
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        for crate_name in KNOWN_CRATES {
            let enabled = flags.is_enabled(crate_name);
            assert!(enabled, "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_unrelated_args_ignored() {
        let flags = CrateDebugFlags::from_args(vec![
            "webnn-serve".to_string(),
            "--port".to_string(),
            "9000".to_string(),
        ]);
        assert!(!flags.any_enabled());
        assert_eq!(flags.to_filter_string("warn"), "warn");
    }

    #[test]
    fn test_env_value() {
        let mut flags = CrateDebugFlags::default();
        flags.merge_env_value("webnn-config, webnn-demo,");
        assert!(flags.is_enabled("webnn-config"));
        assert!(flags.is_enabled("webnn-demo"));
        assert_eq!(flags.enabled_crates.len(), 2);

        flags.merge_env_value("all");
        assert!(flags.is_enabled("webnn-bridge"));
    }

    #[test]
    fn test_filter_string() {
        let flags = CrateDebugFlags::from_args(vec![
            "--debug-webnn-config".to_string(),
            "--debug-webnn-bridge".to_string(),
        ]);
        assert_eq!(
            flags.to_filter_string("info"),
            "webnn-bridge=debug,webnn-config=debug,info"
        );
    }

    #[test]
    fn test_log_level() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-webnn-bridge".to_string()]);
        assert_eq!(flags.log_level("webnn-bridge"), tracing::Level::DEBUG);
        assert_eq!(flags.log_level("webnn-demo"), tracing::Level::INFO);
    }
}
