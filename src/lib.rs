// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # webnn-demo
//!
//! Runs a small WebNN graph (`C = 0.2 * A + B`) from native code compiled to
//! WebAssembly, and serves the built page.
//!
//! The heavy lifting is in the workspace crates, re-exported here:
//! - [`bridge`]: typed buffer marshalling and promise awaiting
//! - [`config`]: `webnn_configuration.toml` loading
//! - [`observability`]: logging setup and per-crate debug flags
//!
//! ## Feature Flags
//! - **`server`** (default): `webnn-serve` static file server (Axum)
//! - **`wasm`**: browser entry point, build for `wasm32-unknown-unknown`
//!
//! ## Usage
//!
//! ```rust
//! use webnn_demo::prelude::*;
//! use webnn_demo::bridge::host::SimulatedHost;
//!
//! let bridge = TypedBufferBridge::new(SimulatedHost::new());
//! let a = bridge.to_external_buffer(&webnn_demo::demo::input_a());
//! assert_eq!(bridge.read_external_buffer::<f32>(&a)?, vec![1.0; 4]);
//! # Ok::<(), BufferError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use webnn_bridge as bridge;
pub use webnn_config as config;
pub use webnn_observability as observability;

pub mod demo;

#[cfg(feature = "server")]
pub mod server;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod web;

/// Commonly used items
pub mod prelude {
    pub use webnn_bridge::{
        acquire_context, acquire_context_async, await_pending, settle, BridgeError, BufferError,
        BufferHost, ContextError, ContextProvider, Element, ElementKind, ExternalBufferKind,
        PendingResult, TypedBufferBridge,
    };
    pub use webnn_config::{load_config, validate_config, ContextConfig, WebnnConfig};
    pub use webnn_observability::{init_logging, parse_debug_flags, CrateDebugFlags};
}
