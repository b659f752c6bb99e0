// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Simulated promise for the in-process host
//!
//! [`pending_pair`] returns the pending result handed to the caller and the
//! [`Settler`] kept by the "host", which may settle from any thread. Settling
//! follows promise rules: the first settlement wins, later ones are ignored,
//! and a settlement that happens before handlers are registered is held and
//! delivered on registration.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{PendingResult, SettleFn};

enum Outcome<V, E> {
    Resolved(V),
    Rejected(E),
}

struct State<V, E> {
    handlers: Option<(SettleFn<V>, SettleFn<E>)>,
    held: Option<Outcome<V, E>>,
    settled: bool,
}

type Shared<V, E> = Arc<Mutex<State<V, E>>>;

fn deliver<V, E>(handlers: (SettleFn<V>, SettleFn<E>), outcome: Outcome<V, E>) {
    let (on_resolve, on_reject) = handlers;
    match outcome {
        Outcome::Resolved(value) => on_resolve(value),
        Outcome::Rejected(failure) => on_reject(failure),
    }
}

/// Create a simulated pending result and the handle that settles it
pub fn pending_pair<V, E>() -> (SimulatedPending<V, E>, Settler<V, E>) {
    let shared: Shared<V, E> = Arc::new(Mutex::new(State {
        handlers: None,
        held: None,
        settled: false,
    }));
    (
        SimulatedPending {
            shared: shared.clone(),
        },
        Settler { shared },
    )
}

/// Caller side of a simulated promise
pub struct SimulatedPending<V, E> {
    shared: Shared<V, E>,
}

impl<V, E> SimulatedPending<V, E> {
    /// Observer that outlives the pending result itself
    pub fn observer(&self) -> PendingObserver<V, E> {
        PendingObserver {
            shared: self.shared.clone(),
        }
    }
}

impl<V, E> fmt::Debug for SimulatedPending<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedPending")
            .field("settled", &self.shared.lock().settled)
            .finish()
    }
}

impl<V, E> PendingResult for SimulatedPending<V, E> {
    type Value = V;
    type Failure = E;
    type Registration = SimulatedRegistration<V, E>;

    fn register(
        self,
        on_resolve: SettleFn<V>,
        on_reject: SettleFn<E>,
    ) -> SimulatedRegistration<V, E> {
        let handlers = (on_resolve, on_reject);
        let ready = {
            let mut state = self.shared.lock();
            let held = state.held.take();
            match held {
                Some(outcome) => Some((handlers, outcome)),
                None => {
                    // Abandoned before registration: nothing will ever fire.
                    if !state.settled {
                        state.handlers = Some(handlers);
                    }
                    None
                }
            }
        };
        if let Some((handlers, outcome)) = ready {
            deliver(handlers, outcome);
        }
        SimulatedRegistration {
            shared: self.shared,
        }
    }
}

/// Registration guard; dropping it releases any handler still registered
pub struct SimulatedRegistration<V, E> {
    shared: Shared<V, E>,
}

impl<V, E> Drop for SimulatedRegistration<V, E> {
    fn drop(&mut self) {
        let released = self.shared.lock().handlers.take();
        drop(released);
    }
}

/// Host side of a simulated promise
pub struct Settler<V, E> {
    shared: Shared<V, E>,
}

impl<V, E> Clone for Settler<V, E> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<V, E> Settler<V, E> {
    /// Fulfil the promise; `false` if it had already settled
    pub fn resolve(&self, value: V) -> bool {
        self.settle(Outcome::Resolved(value))
    }

    /// Reject the promise; `false` if it had already settled
    pub fn reject(&self, failure: E) -> bool {
        self.settle(Outcome::Rejected(failure))
    }

    /// Drop the registered handlers without ever settling
    pub fn abandon(&self) {
        let released = {
            let mut state = self.shared.lock();
            state.settled = true;
            state.handlers.take()
        };
        drop(released);
    }

    fn settle(&self, outcome: Outcome<V, E>) -> bool {
        let handlers = {
            let mut state = self.shared.lock();
            if state.settled {
                return false;
            }
            state.settled = true;
            match state.handlers.take() {
                Some(handlers) => handlers,
                None => {
                    state.held = Some(outcome);
                    return true;
                }
            }
        };
        // Handlers run outside the lock so they may touch the promise again.
        deliver(handlers, outcome);
        true
    }
}

/// Read-only view of a simulated promise's registration state
pub struct PendingObserver<V, E> {
    shared: Shared<V, E>,
}

impl<V, E> PendingObserver<V, E> {
    /// Whether handlers are currently registered
    pub fn has_handlers(&self) -> bool {
        self.shared.lock().handlers.is_some()
    }

    /// Whether the promise has settled (or was abandoned)
    pub fn is_settled(&self) -> bool {
        self.shared.lock().settled
    }
}
