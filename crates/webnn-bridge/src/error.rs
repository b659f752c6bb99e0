// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for buffer marshalling, promise awaiting and context acquisition

use core::fmt;

use crate::element::{ElementKind, ExternalBufferKind};

/// Buffer marshalling errors
///
/// These are local-contract violations: callers should treat them as bugs and
/// abort the code path that produced them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("Unsupported element kind: {0}")]
    UnsupportedElementKind(String),

    #[error("External buffer kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        expected: ExternalBufferKind,
        found: ExternalBufferKind,
    },

    /// An untyped array entry is not an exact integer
    #[error("Untyped array entry is not an exact integer: {0}")]
    InexactArrayEntry(String),

    #[error("Untyped array entry {entry} does not fit in {kind}")]
    ArrayEntryOutOfRange { entry: i64, kind: ElementKind },
}

/// A failure value delivered by the host runtime
///
/// Lets [`BridgeError`] expose a readable message without knowing how the
/// host represents its errors.
pub trait ForeignFailure: fmt::Debug {
    /// Human-readable message carried by the failure
    fn message(&self) -> String;
}

impl ForeignFailure for String {
    fn message(&self) -> String {
        self.clone()
    }
}

impl ForeignFailure for &'static str {
    fn message(&self) -> String {
        (*self).to_string()
    }
}

/// Failure of an awaited pending result
///
/// Recoverable: the foreign operation legitimately failed and the caller
/// decides what to do next (for example retry with another configuration).
#[derive(Debug, thiserror::Error)]
pub enum BridgeError<F: ForeignFailure> {
    /// The host rejected the operation; the raw failure value is kept
    #[error("Foreign operation rejected: {}", .0.message())]
    Rejected(F),

    /// The host released both handlers without ever settling
    #[error("Pending result was dropped by the host before settling")]
    Abandoned,
}

impl<F: ForeignFailure> BridgeError<F> {
    /// Raw foreign failure value, if the host rejected
    pub fn failure(&self) -> Option<&F> {
        match self {
            BridgeError::Rejected(failure) => Some(failure),
            BridgeError::Abandoned => None,
        }
    }

    /// Consume the error, returning the raw foreign failure value
    pub fn into_failure(self) -> Option<F> {
        match self {
            BridgeError::Rejected(failure) => Some(failure),
            BridgeError::Abandoned => None,
        }
    }

    /// Message of the foreign failure, or a description of the abandonment
    pub fn message(&self) -> String {
        match self {
            BridgeError::Rejected(failure) => failure.message(),
            BridgeError::Abandoned => self.to_string(),
        }
    }
}

/// Errors while acquiring a host compute context
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("WebNN API is not available")]
    ApiUnavailable,

    #[error("Error creating context: preferred options failed ({preferred}), default options failed ({fallback})")]
    Creation { preferred: String, fallback: String },

    #[error("Error creating context: {0} (fallback to default context disabled)")]
    FallbackDisabled(String),
}

/// Result type for buffer marshalling
pub type BufferResult<T> = Result<T, BufferError>;
