// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Typed Buffer Bridge
//!
//! Marshals native numeric slices into host typed buffers and back.
//!
//! Marshalling a non-empty slice of `n` elements of width `w`:
//! 1. view the slice as `n * w` bytes (a borrow, no copy)
//! 2. allocate `n * w` bytes of host storage
//! 3. copy the bytes once across the boundary
//! 4. build a typed view over the host storage at offset 0, length `n`
//!
//! An empty slice becomes an empty untyped host array: a zero-length typed
//! buffer is indistinguishable from it for every consumer.

use tracing::{debug, trace};

use crate::element::{Element, ElementKind, ExternalBufferKind};
use crate::error::{BufferError, BufferResult};
use crate::host::BufferHost;

/// Native elements reinterpreted as raw bytes for the length of one copy
///
/// Borrows the source slice, so the source can neither be freed nor mutated
/// while the view exists.
#[derive(Debug, Clone, Copy)]
pub struct BufferView<'a> {
    bytes: &'a [u8],
    element_count: usize,
    kind: ElementKind,
}

impl<'a> BufferView<'a> {
    /// View `values` as `values.len() * width` bytes
    pub fn new<T: Element>(values: &'a [T]) -> Self {
        Self {
            bytes: bytemuck::cast_slice(values),
            element_count: values.len(),
            kind: T::KIND,
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn element_count(&self) -> usize {
        self.element_count
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }
}

/// Converts between native slices and a host's typed buffers
#[derive(Debug, Clone, Default)]
pub struct TypedBufferBridge<H: BufferHost> {
    host: H,
}

impl<H: BufferHost> TypedBufferBridge<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Marshal a native slice into a host buffer of the matching kind
    ///
    /// The result holds `values.len()` elements, bit-identical to the source.
    pub fn to_external_buffer<T: Element>(&self, values: &[T]) -> H::Buffer {
        if values.is_empty() {
            trace!(
                target: "webnn-bridge",
                "Empty {} slice marshalled as empty array",
                T::KIND
            );
            return self.host.new_array(&[]);
        }

        match T::KIND.external_kind() {
            ExternalBufferKind::Typed(typed) => {
                let view = BufferView::new(values);
                let storage = self.host.allocate_bytes(view.byte_len());
                self.host.copy_bytes_to_host(view.as_bytes(), &storage);
                debug!(
                    target: "webnn-bridge",
                    "Marshalled {} x {} ({} bytes) into {}",
                    view.element_count(),
                    view.kind(),
                    view.byte_len(),
                    typed.constructor_name()
                );
                self.host.typed_view(typed, &storage, 0, view.element_count())
            }
            ExternalBufferKind::Array => {
                let entries: Vec<i64> = values.iter().map(|v| v.to_array_entry()).collect();
                debug!(
                    target: "webnn-bridge",
                    "Marshalled {} x {} into untyped Array",
                    entries.len(),
                    T::KIND
                );
                self.host.new_array(&entries)
            }
        }
    }

    /// Allocate a zero-initialized host buffer for `len` elements of `T`
    pub fn new_external_buffer<T: Element>(&self, len: usize) -> H::Buffer {
        self.new_external_buffer_of(T::KIND, len)
    }

    /// Allocate a zero-initialized host buffer for `len` elements of `kind`
    pub fn new_external_buffer_of(&self, kind: ElementKind, len: usize) -> H::Buffer {
        debug!(target: "webnn-bridge", "Allocating {} x {} host buffer", len, kind);
        match kind.external_kind() {
            ExternalBufferKind::Typed(typed) => self.host.new_typed(typed, len),
            ExternalBufferKind::Array => self.host.new_array(&vec![0; len]),
        }
    }

    /// Allocate from a WebNN `dataType` name such as `"float32"`
    ///
    /// # Errors
    ///
    /// `BufferError::UnsupportedElementKind` if the name is not a supported kind.
    pub fn new_external_buffer_for(&self, data_type: &str, len: usize) -> BufferResult<H::Buffer> {
        let kind = ElementKind::from_data_type(data_type)?;
        Ok(self.new_external_buffer_of(kind, len))
    }

    /// Read a host buffer back into native memory
    ///
    /// An empty untyped array reads back as an empty vector for any `T`.
    ///
    /// # Errors
    ///
    /// `BufferError::KindMismatch` if the buffer was not built for `T`.
    /// `BufferError::InexactArrayEntry` or `BufferError::ArrayEntryOutOfRange`
    /// if an untyped array entry cannot be represented as a `T`.
    pub fn read_external_buffer<T: Element>(&self, buffer: &H::Buffer) -> BufferResult<Vec<T>> {
        let found = self.host.buffer_kind(buffer);
        let len = self.host.buffer_len(buffer);
        let expected = T::KIND.external_kind();

        if found == ExternalBufferKind::Array && len == 0 {
            return Ok(Vec::new());
        }
        if found != expected {
            return Err(BufferError::KindMismatch { expected, found });
        }

        match found {
            ExternalBufferKind::Typed(_) => {
                let mut out = vec![<T as bytemuck::Zeroable>::zeroed(); len];
                self.host
                    .copy_bytes_from_host(buffer, bytemuck::cast_slice_mut(&mut out));
                Ok(out)
            }
            ExternalBufferKind::Array => self
                .host
                .array_values(buffer)?
                .into_iter()
                .map(|entry| {
                    T::from_array_entry(entry).ok_or(BufferError::ArrayEntryOutOfRange {
                        entry,
                        kind: T::KIND,
                    })
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SimulatedHost;

    #[test]
    fn test_view_is_a_borrow_of_the_source() {
        let values = [1u16, 2, 3];
        let view = BufferView::new(&values);
        assert_eq!(view.byte_len(), 6);
        assert_eq!(view.element_count(), 3);
        assert_eq!(view.as_bytes().as_ptr(), values.as_ptr() as *const u8);
    }

    #[test]
    fn test_single_boundary_copy() {
        let bridge = TypedBufferBridge::new(SimulatedHost::new());
        let buffer = bridge.to_external_buffer(&[1.0f32, 1.0, 1.0, 1.0]);
        assert_eq!(bridge.host().boundary_copies(), 1);
        assert_eq!(buffer.storage().map(|s| s.byte_len()), Some(16));
    }

    #[test]
    fn test_empty_slice_makes_no_copy() {
        let bridge = TypedBufferBridge::new(SimulatedHost::new());
        let buffer = bridge.to_external_buffer::<f64>(&[]);
        assert_eq!(buffer.kind(), ExternalBufferKind::Array);
        assert_eq!(bridge.host().boundary_copies(), 0);
    }

    #[test]
    fn test_kind_mismatch() {
        let bridge = TypedBufferBridge::new(SimulatedHost::new());
        let buffer = bridge.to_external_buffer(&[1i32, 2]);
        let err = bridge.read_external_buffer::<f32>(&buffer).unwrap_err();
        assert!(matches!(err, BufferError::KindMismatch { .. }));
    }

    #[test]
    fn test_allocate_from_data_type() {
        let bridge = TypedBufferBridge::new(SimulatedHost::new());
        let buffer = bridge.new_external_buffer_for("uint8", 3).unwrap();
        let zeros = bridge.read_external_buffer::<u8>(&buffer).unwrap();
        assert_eq!(zeros, vec![0, 0, 0]);
        assert!(bridge.new_external_buffer_for("float16", 3).is_err());
    }
}
