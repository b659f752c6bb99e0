// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # webnn-observability
//!
//! Logging initialization for the WebNN demo binaries and the browser build,
//! with per-crate debug flag support (`--debug-webnn-bridge`, `WEBNN_DEBUG`).

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Crate names accepted by `--debug-<crate>` flags
///
/// These are also the `target:` names the crates log under.
pub const KNOWN_CRATES: &[&str] = &["webnn-bridge", "webnn-config", "webnn-demo"];
