// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Static file server for the built browser demo.
//!
//! Serves `server.dist_dir` from `webnn_configuration.toml` (default `./dist`)
//! on `server.host:server.port` (default `0.0.0.0:9090`).
//!
//! Run with: cargo run --bin webnn-serve -- --port 9090 --debug-webnn-demo

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use webnn_config::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    validate_config, WebnnConfig,
};
use webnn_observability::{debug_flags_help, init_logging, CrateDebugFlags, LoggingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "webnn-serve",
    version,
    long_about = None,
    after_help = debug_flags_help()
)]
struct Args {
    /// Path to webnn_configuration.toml (searched for if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// Listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory with the built demo
    #[arg(long)]
    dist_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (text or json)
    #[arg(long)]
    log_format: Option<String>,
}

impl Args {
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(host) = &self.host {
            overrides.insert("host".to_string(), host.clone());
        }
        if let Some(port) = self.port {
            overrides.insert("port".to_string(), port.to_string());
        }
        if let Some(dist_dir) = &self.dist_dir {
            overrides.insert("dist_dir".to_string(), dist_dir.display().to_string());
        }
        if let Some(level) = &self.log_level {
            overrides.insert("log_level".to_string(), level.clone());
        }
        if let Some(format) = &self.log_format {
            overrides.insert("log_format".to_string(), format.clone());
        }
        overrides
    }
}

/// Load the config file if there is one, defaults otherwise
///
/// Returns the config and the file it came from.
fn load(args: &Args) -> anyhow::Result<(WebnnConfig, Option<PathBuf>)> {
    let overrides = args.overrides();
    let path = match &args.config {
        Some(path) => Some(path.clone()),
        None => find_config_file().ok(),
    };

    let config = match &path {
        Some(path) => load_config(Some(path), Some(&overrides))
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => {
            let mut config = WebnnConfig::default();
            apply_environment_overrides(&mut config)?;
            apply_cli_overrides(&mut config, &overrides)?;
            config
        }
    };
    validate_config(&config)?;
    Ok((config, path))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `--debug-<crate>` flags are not clap arguments; split them off first.
    let (debug_args, clap_args): (Vec<String>, Vec<String>) =
        std::env::args().partition(|arg| arg.starts_with("--debug-"));
    let args = Args::parse_from(clap_args);

    let mut debug_flags = CrateDebugFlags::from_args(debug_args);
    if let Ok(value) = std::env::var("WEBNN_DEBUG") {
        debug_flags.merge_env_value(&value);
    }

    let (config, source) = load(&args)?;

    let logging = LoggingConfig::from_strings(&config.logging.level, &config.logging.format)?;
    init_logging(&debug_flags, &logging)?;

    match source {
        Some(path) => info!(target: "webnn-demo", "Loaded configuration from {}", path.display()),
        None => warn!(
            target: "webnn-demo",
            "No {} found; using defaults",
            webnn_config::CONFIG_FILE_NAME
        ),
    }

    webnn_demo::server::serve(&config.server).await
}
