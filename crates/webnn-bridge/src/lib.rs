// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # webnn-bridge
//!
//! Bridging layer between native code and a host-provided neural-network API
//! (WebNN in a browser).
//!
//! Two leaf components:
//! - [`TypedBufferBridge`]: native numeric slices ⇄ host typed buffers
//! - [`async_bridge`]: host pending results (promises) → `Result`
//!
//! ```text
//!  native slice ──TypedBufferBridge──▶ host buffer ──▶ host operation
//!                                                           │
//!                                                    pending result
//!                                                           │
//!  Result<value, BridgeError> ◀────────await_pending────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use webnn_bridge::host::SimulatedHost;
//! use webnn_bridge::pending::pending_pair;
//! use webnn_bridge::{await_pending, TypedBufferBridge};
//!
//! let bridge = TypedBufferBridge::new(SimulatedHost::new());
//! let input = bridge.to_external_buffer(&[1.0f32, 1.0, 1.0, 1.0]);
//!
//! let (pending, settler) = pending_pair::<_, String>();
//! settler.resolve(input);
//!
//! let output = await_pending(pending)?;
//! assert_eq!(bridge.read_external_buffer::<f32>(&output)?, vec![1.0; 4]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Feature Flags
//! - **`wasm`**: `WebHost` and `JsPending` backed by `js-sys` (wasm32 only)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod async_bridge;
pub mod buffer_bridge;
pub mod context;
pub mod element;
pub mod error;
pub mod host;
pub mod pending;

pub use async_bridge::{await_pending, settle, BridgeResult};
pub use buffer_bridge::{BufferView, TypedBufferBridge};
pub use context::{acquire_context, acquire_context_async, ContextProvider};
pub use element::{Element, ElementKind, ExternalBufferKind, TypedArrayKind};
pub use error::{BridgeError, BufferError, BufferResult, ContextError, ForeignFailure};
pub use host::BufferHost;
pub use pending::{PendingResult, SettleFn};
