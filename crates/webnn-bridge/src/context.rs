// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Context Acquisition
//!
//! Creating a compute context is the first host call a demo makes, and the
//! one most likely to fail (no GPU, blocked adapter, ...). The policy here is
//! a caller-level composition of two awaits: try the configured options, and
//! if the host rejects them, try once more with the host defaults.

use tracing::{info, warn};
use webnn_config::ContextConfig;

use crate::async_bridge::settle;
use crate::error::{ContextError, ForeignFailure};
use crate::pending::PendingResult;

/// Host API able to create compute contexts (`navigator.ml` in a browser)
pub trait ContextProvider {
    /// Context handle delivered on success
    type Context;

    /// Pending result returned by a creation call
    type Pending: PendingResult<Value = Self::Context>;

    /// Whether the host exposes the API at all
    fn is_available(&self) -> bool {
        true
    }

    /// Start creating a context; `None` asks for the host defaults
    fn create_context(&self, options: Option<&ContextConfig>) -> Self::Pending;
}

type FailureOf<P> = <<P as ContextProvider>::Pending as PendingResult>::Failure;

/// Acquire a context, falling back to the host defaults on rejection
///
/// Blocks the calling thread; see [`acquire_context_async`] for async callers.
///
/// # Errors
///
/// - `ContextError::ApiUnavailable` if the host has no WebNN API
/// - `ContextError::FallbackDisabled` if the preferred options were rejected
///   and `fallback_to_default` is off
/// - `ContextError::Creation` if both attempts were rejected
pub fn acquire_context<P>(provider: &P, config: &ContextConfig) -> Result<P::Context, ContextError>
where
    P: ContextProvider,
    P::Context: Send + 'static,
    FailureOf<P>: ForeignFailure + Send + 'static,
{
    pollster::block_on(acquire_context_async(provider, config))
}

/// Async form of [`acquire_context`]
pub async fn acquire_context_async<P>(
    provider: &P,
    config: &ContextConfig,
) -> Result<P::Context, ContextError>
where
    P: ContextProvider,
    P::Context: Send + 'static,
    FailureOf<P>: ForeignFailure + Send + 'static,
{
    if !provider.is_available() {
        return Err(ContextError::ApiUnavailable);
    }

    let preferred = match settle(provider.create_context(Some(config))).await {
        Ok(context) => {
            info!(
                target: "webnn-bridge",
                "Context created (device={}, power={})",
                config.device_type,
                config.power_preference
            );
            return Ok(context);
        }
        Err(err) => err.message(),
    };

    if !config.fallback_to_default {
        return Err(ContextError::FallbackDisabled(preferred));
    }

    warn!(
        target: "webnn-bridge",
        "Context with device={} power={} rejected ({}); retrying with default context",
        config.device_type,
        config.power_preference,
        preferred
    );

    match settle(provider.create_context(None)).await {
        Ok(context) => {
            info!(target: "webnn-bridge", "Default context created");
            Ok(context)
        }
        Err(err) => Err(ContextError::Creation {
            preferred,
            fallback: err.message(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pending::{pending_pair, SimulatedPending};
    use parking_lot::Mutex;
    use webnn_config::DeviceType;

    /// Host that answers each creation call from a script
    struct ScriptedProvider {
        available: bool,
        answers: Mutex<Vec<Result<&'static str, &'static str>>>,
        calls: Mutex<Vec<Option<DeviceType>>>,
    }

    impl ScriptedProvider {
        fn new(answers: Vec<Result<&'static str, &'static str>>) -> Self {
            Self {
                available: true,
                answers: Mutex::new(answers),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl ContextProvider for ScriptedProvider {
        type Context = &'static str;
        type Pending = SimulatedPending<&'static str, String>;

        fn is_available(&self) -> bool {
            self.available
        }

        fn create_context(&self, options: Option<&ContextConfig>) -> Self::Pending {
            self.calls.lock().push(options.map(|o| o.device_type));
            let (pending, settler) = pending_pair();
            match self.answers.lock().remove(0) {
                Ok(context) => settler.resolve(context),
                Err(reason) => settler.reject(reason.to_string()),
            };
            pending
        }
    }

    #[test]
    fn test_preferred_context() {
        let provider = ScriptedProvider::new(vec![Ok("gpu-context")]);
        let context = acquire_context(&provider, &ContextConfig::default()).unwrap();
        assert_eq!(context, "gpu-context");
        assert_eq!(provider.calls.lock().len(), 1);
    }

    #[test]
    fn test_falls_back_to_default_context() {
        let provider = ScriptedProvider::new(vec![Err("no adapter"), Ok("default-context")]);
        let context = acquire_context(&provider, &ContextConfig::default()).unwrap();
        assert_eq!(context, "default-context");
        assert_eq!(*provider.calls.lock(), vec![Some(DeviceType::Gpu), None]);
    }

    #[test]
    fn test_both_attempts_rejected() {
        let provider = ScriptedProvider::new(vec![Err("no adapter"), Err("no backend")]);
        let err = acquire_context(&provider, &ContextConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ContextError::Creation {
                preferred: "no adapter".to_string(),
                fallback: "no backend".to_string(),
            }
        );
    }

    #[test]
    fn test_fallback_disabled() {
        let provider = ScriptedProvider::new(vec![Err("no adapter")]);
        let config = ContextConfig {
            fallback_to_default: false,
            ..ContextConfig::default()
        };
        let err = acquire_context(&provider, &config).unwrap_err();
        let expected = ContextError::FallbackDisabled("no adapter".to_string());
        assert_eq!(err, expected);
    }

    #[test]
    fn test_missing_api() {
        let mut provider = ScriptedProvider::new(Vec::new());
        provider.available = false;
        let err = acquire_context(&provider, &ContextConfig::default()).unwrap_err();
        assert_eq!(err, ContextError::ApiUnavailable);
        assert_eq!(err.to_string(), "WebNN API is not available");
    }
}
