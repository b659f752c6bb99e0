// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Pending Results
//!
//! The promise-like contract of a host runtime: an operation in flight that
//! accepts one success handler and one failure handler, and later fires
//! exactly one of them, exactly once.

mod simulated;
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod web;

pub use simulated::{
    pending_pair, PendingObserver, Settler, SimulatedPending, SimulatedRegistration,
};
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use web::{JsHandle, JsPending, JsRegistration};

/// Handler invoked with the settled value or failure
pub type SettleFn<T> = Box<dyn FnOnce(T) + Send + 'static>;

/// A foreign asynchronous operation in flight
///
/// Consumed by [`PendingResult::register`]: a pending result is awaited once
/// and then discarded.
pub trait PendingResult {
    /// Delivered on success
    type Value;

    /// Delivered on failure
    type Failure;

    /// Keeps both handlers registered; dropping it releases them
    type Registration;

    /// Register the success and failure handlers
    fn register(
        self,
        on_resolve: SettleFn<Self::Value>,
        on_reject: SettleFn<Self::Failure>,
    ) -> Self::Registration;
}
