// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Host Runtime Abstraction
//!
//! The buffer-construction contract the bridge needs from a foreign runtime.
//! The bridge only ever asks the host to allocate byte storage, receive one
//! byte copy, and build typed views over that storage; everything the host
//! does beyond that is its own business.
//!
//! Implementations:
//! - [`SimulatedHost`]: in-process host (native builds, tests)
//! - `WebHost`: browser host backed by `js-sys` (feature `wasm`, wasm32 only)

mod simulated;
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod web;

pub use simulated::{SimulatedArrayBuffer, SimulatedBuffer, SimulatedHost};
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use web::WebHost;

use crate::element::{ExternalBufferKind, TypedArrayKind};
use crate::error::BufferResult;

/// Buffer-construction contract of a host runtime
pub trait BufferHost {
    /// Host-owned byte storage (an `ArrayBuffer` in a browser)
    type Storage;

    /// Handle to a typed buffer or generic array living in the host
    type Buffer;

    /// Allocate zeroed host byte storage
    fn allocate_bytes(&self, byte_len: usize) -> Self::Storage;

    /// Copy native bytes into host storage; the one boundary crossing
    ///
    /// `src.len()` never exceeds the storage length it was allocated with.
    fn copy_bytes_to_host(&self, src: &[u8], dst: &Self::Storage);

    /// Typed view of `len` elements over `storage`, starting at `byte_offset`
    fn typed_view(
        &self,
        kind: TypedArrayKind,
        storage: &Self::Storage,
        byte_offset: usize,
        len: usize,
    ) -> Self::Buffer;

    /// Fresh zero-initialized typed buffer
    fn new_typed(&self, kind: TypedArrayKind, len: usize) -> Self::Buffer;

    /// Generic untyped array holding `values` (empty slice gives an empty array)
    ///
    /// Entries must be stored exactly, so a 64-bit value never passes through
    /// a float.
    fn new_array(&self, values: &[i64]) -> Self::Buffer;

    /// Kind of an existing host buffer
    fn buffer_kind(&self, buffer: &Self::Buffer) -> ExternalBufferKind;

    /// Element count of an existing host buffer
    fn buffer_len(&self, buffer: &Self::Buffer) -> usize;

    /// Copy the bytes of a typed host buffer out into native memory
    ///
    /// `dst.len()` equals element count times element width.
    fn copy_bytes_from_host(&self, buffer: &Self::Buffer, dst: &mut [u8]);

    /// Integers held by a generic untyped array
    ///
    /// # Errors
    ///
    /// `BufferError::InexactArrayEntry` if an entry is not an exact integer.
    fn array_values(&self, buffer: &Self::Buffer) -> BufferResult<Vec<i64>>;
}
