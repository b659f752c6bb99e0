// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! `js_sys::Promise` as a pending result

use js_sys::Promise;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use super::{PendingResult, SettleFn};
use crate::error::ForeignFailure;

/// A host value delivered by a settled promise
#[derive(Debug, Clone)]
pub struct JsHandle(pub JsValue);

// SAFETY: wasm32 without atomics runs a single thread; the value never
// actually crosses threads. Needed so handlers satisfy `SettleFn`'s `Send`.
unsafe impl Send for JsHandle {}

impl JsHandle {
    pub fn into_inner(self) -> JsValue {
        self.0
    }
}

impl ForeignFailure for JsHandle {
    fn message(&self) -> String {
        if let Some(error) = self.0.dyn_ref::<js_sys::Error>() {
            return String::from(error.message());
        }
        if let Some(text) = self.0.as_string() {
            return text;
        }
        format!("{:?}", self.0)
    }
}

/// A promise returned by a host API call
#[derive(Debug, Clone)]
pub struct JsPending(pub Promise);

impl From<Promise> for JsPending {
    fn from(promise: Promise) -> Self {
        Self(promise)
    }
}

impl JsPending {
    /// Wrap whatever a host call returned; non-promises settle immediately
    pub fn from_value(value: JsValue) -> Self {
        match value.dyn_into::<Promise>() {
            Ok(promise) => Self(promise),
            Err(value) => Self(Promise::resolve(&value)),
        }
    }
}

/// Keeps both wasm-bindgen closures alive until the outcome is known
///
/// Dropping the closures frees their JS-side trampolines.
pub struct JsRegistration {
    _on_resolve: Closure<dyn FnMut(JsValue)>,
    _on_reject: Closure<dyn FnMut(JsValue)>,
}

impl PendingResult for JsPending {
    type Value = JsHandle;
    type Failure = JsHandle;
    type Registration = JsRegistration;

    fn register(
        self,
        on_resolve: SettleFn<JsHandle>,
        on_reject: SettleFn<JsHandle>,
    ) -> JsRegistration {
        let on_resolve: Closure<dyn FnMut(JsValue)> =
            Closure::once(move |value: JsValue| on_resolve(JsHandle(value)));
        let on_reject: Closure<dyn FnMut(JsValue)> =
            Closure::once(move |failure: JsValue| on_reject(JsHandle(failure)));

        // The derived promise is never rejected: `on_reject` handles the failure.
        let _ = self.0.then2(&on_resolve, &on_reject);

        JsRegistration {
            _on_resolve: on_resolve,
            _on_reject: on_reject,
        }
    }
}
