// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Native builds log to stdout through `tracing-subscriber` (text or JSON).
//! The browser build forwards events to the developer console.

use anyhow::{Context, Result};

use crate::cli::CrateDebugFlags;
use crate::config::LoggingConfig;
#[cfg(not(target_arch = "wasm32"))]
use crate::config::LogFormat;

/// Build the `EnvFilter` directive string for a configuration
pub fn filter_directives(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> String {
    debug_flags.to_filter_string(&config.level)
}

/// Install the global subscriber
///
/// # Errors
///
/// Fails if the level is not a valid filter directive or a global subscriber
/// is already installed.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, Layer, Registry};

    let directives = filter_directives(debug_flags, config);
    let env_filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid log filter: {}", directives))?;

    let layer = match config.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(env_filter)
            .boxed(),
    };

    Registry::default()
        .with(layer)
        .try_init()
        .context("Failed to install global tracing subscriber")?;
    Ok(())
}

/// Install the global subscriber (browser console)
///
/// The console has no per-target filtering, so enabled debug flags raise the
/// whole page to debug.
///
/// # Errors
///
/// Fails if the level is not one of trace, debug, info, warn or error.
#[cfg(target_arch = "wasm32")]
pub fn init_logging(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<()> {
    let level = if debug_flags.any_enabled() {
        tracing::Level::DEBUG
    } else {
        config
            .level
            .parse::<tracing::Level>()
            .with_context(|| format!("Invalid log level: {}", config.level))?
    };

    let wasm_config = tracing_wasm::WASMLayerConfigBuilder::new()
        .set_max_level(level)
        .build();
    tracing_wasm::set_as_global_default_with_config(wasm_config);
    Ok(())
}

/// Initialize logging at info level, text format
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<()> {
    init_logging(debug_flags, &LoggingConfig::default())
}
