// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Async Bridge
//!
//! Turns a host pending result into a value or a [`BridgeError`].
//!
//! Each outcome gets its own single-slot channel. Whichever channel produces
//! first decides the result; the other receiver is dropped unread. The
//! registration guard returned by the host lives on this function's stack, so
//! both handlers are released on every exit path, including unwinding and a
//! dropped future.
//!
//! There is no timeout: a pending result that never settles blocks
//! [`await_pending`] forever.

use futures_channel::oneshot;
use futures_util::future::{self, Either};
use tracing::debug;

use crate::error::{BridgeError, ForeignFailure};
use crate::pending::{PendingResult, SettleFn};

/// Result of awaiting a pending result
pub type BridgeResult<P> =
    Result<<P as PendingResult>::Value, BridgeError<<P as PendingResult>::Failure>>;

/// Wait for `pending` to settle without blocking the thread
///
/// Use this from async code, and on wasm32 where the main thread cannot
/// block.
pub async fn settle<P>(pending: P) -> BridgeResult<P>
where
    P: PendingResult,
    P::Value: Send + 'static,
    P::Failure: ForeignFailure + Send + 'static,
{
    let (resolve_tx, resolve_rx) = oneshot::channel::<P::Value>();
    let (reject_tx, reject_rx) = oneshot::channel::<P::Failure>();

    let on_resolve: SettleFn<P::Value> = Box::new(move |value| {
        let _ = resolve_tx.send(value);
    });
    let on_reject: SettleFn<P::Failure> = Box::new(move |failure| {
        let _ = reject_tx.send(failure);
    });

    let _registration = pending.register(on_resolve, on_reject);

    // A cancelled receiver means the host dropped that handler; the other
    // one may still fire, so keep waiting on it.
    match future::select(resolve_rx, reject_rx).await {
        Either::Left((Ok(value), _)) => {
            debug!(target: "webnn-bridge", "Pending result resolved");
            Ok(value)
        }
        Either::Right((Ok(failure), _)) => {
            debug!(target: "webnn-bridge", "Pending result rejected: {}", failure.message());
            Err(BridgeError::Rejected(failure))
        }
        Either::Left((Err(oneshot::Canceled), reject_rx)) => match reject_rx.await {
            Ok(failure) => {
                debug!(target: "webnn-bridge", "Pending result rejected: {}", failure.message());
                Err(BridgeError::Rejected(failure))
            }
            Err(oneshot::Canceled) => {
                debug!(target: "webnn-bridge", "Pending result abandoned by host");
                Err(BridgeError::Abandoned)
            }
        },
        Either::Right((Err(oneshot::Canceled), resolve_rx)) => match resolve_rx.await {
            Ok(value) => {
                debug!(target: "webnn-bridge", "Pending result resolved");
                Ok(value)
            }
            Err(oneshot::Canceled) => {
                debug!(target: "webnn-bridge", "Pending result abandoned by host");
                Err(BridgeError::Abandoned)
            }
        },
    }
}

/// Block the calling thread until `pending` settles
///
/// The handlers may be fired from any thread (the host's own event loop).
/// Not usable on the browser main thread; use [`settle`] there.
pub fn await_pending<P>(pending: P) -> BridgeResult<P>
where
    P: PendingResult,
    P::Value: Send + 'static,
    P::Failure: ForeignFailure + Send + 'static,
{
    pollster::block_on(settle(pending))
}
