// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Simulated Host
//!
//! In-process stand-in for a browser runtime. Byte storage is shared between
//! every typed view created over it, exactly like an `ArrayBuffer`, so an
//! "external operation" can write into an output buffer from another thread
//! and the caller observes the change through its own handle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::BufferHost;
use crate::element::{Element, ExternalBufferKind, TypedArrayKind};
use crate::error::BufferResult;

/// Shared host byte storage (`ArrayBuffer` analogue)
#[derive(Debug, Clone, Default)]
pub struct SimulatedArrayBuffer {
    bytes: Arc<RwLock<Vec<u8>>>,
}

impl SimulatedArrayBuffer {
    fn zeroed(byte_len: usize) -> Self {
        Self {
            bytes: Arc::new(RwLock::new(vec![0u8; byte_len])),
        }
    }

    /// Storage size in bytes
    pub fn byte_len(&self) -> usize {
        self.bytes.read().len()
    }

    /// Whether two handles refer to the same storage
    pub fn ptr_eq(&self, other: &SimulatedArrayBuffer) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}

/// Handle to a buffer living in the simulated host
#[derive(Debug, Clone)]
pub enum SimulatedBuffer {
    Typed {
        kind: TypedArrayKind,
        storage: SimulatedArrayBuffer,
        byte_offset: usize,
        len: usize,
    },
    Array(Arc<RwLock<Vec<i64>>>),
}

impl SimulatedBuffer {
    /// Host kind of this buffer
    pub fn kind(&self) -> ExternalBufferKind {
        match self {
            SimulatedBuffer::Typed { kind, .. } => ExternalBufferKind::Typed(*kind),
            SimulatedBuffer::Array(_) => ExternalBufferKind::Array,
        }
    }

    /// Element count
    pub fn len(&self) -> usize {
        match self {
            SimulatedBuffer::Typed { len, .. } => *len,
            SimulatedBuffer::Array(values) => values.read().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Backing storage of a typed buffer
    pub fn storage(&self) -> Option<&SimulatedArrayBuffer> {
        match self {
            SimulatedBuffer::Typed { storage, .. } => Some(storage),
            SimulatedBuffer::Array(_) => None,
        }
    }

    /// Overwrite a typed buffer in place, as a host computation would
    ///
    /// Writes at most the buffer's own byte range; returns how many elements
    /// were written. Generic arrays and mismatched element kinds are left
    /// untouched.
    pub fn write_elements<T: Element>(&self, values: &[T]) -> usize {
        match self {
            SimulatedBuffer::Typed {
                kind,
                storage,
                byte_offset,
                len,
            } => {
                if ExternalBufferKind::Typed(*kind) != T::KIND.external_kind() {
                    return 0;
                }
                let count = values.len().min(*len);
                let src: &[u8] = bytemuck::cast_slice(&values[..count]);
                let mut bytes = storage.bytes.write();
                bytes[*byte_offset..*byte_offset + src.len()].copy_from_slice(src);
                count
            }
            SimulatedBuffer::Array(_) => 0,
        }
    }
}

/// In-process host runtime
///
/// Clones share the boundary-copy counter.
#[derive(Debug, Clone, Default)]
pub struct SimulatedHost {
    boundary_copies: Arc<AtomicUsize>,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of native→host byte copies performed so far
    pub fn boundary_copies(&self) -> usize {
        self.boundary_copies.load(Ordering::SeqCst)
    }
}

impl BufferHost for SimulatedHost {
    type Storage = SimulatedArrayBuffer;
    type Buffer = SimulatedBuffer;

    fn allocate_bytes(&self, byte_len: usize) -> SimulatedArrayBuffer {
        SimulatedArrayBuffer::zeroed(byte_len)
    }

    fn copy_bytes_to_host(&self, src: &[u8], dst: &SimulatedArrayBuffer) {
        dst.bytes.write()[..src.len()].copy_from_slice(src);
        self.boundary_copies.fetch_add(1, Ordering::SeqCst);
    }

    fn typed_view(
        &self,
        kind: TypedArrayKind,
        storage: &SimulatedArrayBuffer,
        byte_offset: usize,
        len: usize,
    ) -> SimulatedBuffer {
        SimulatedBuffer::Typed {
            kind,
            storage: storage.clone(),
            byte_offset,
            len,
        }
    }

    fn new_typed(&self, kind: TypedArrayKind, len: usize) -> SimulatedBuffer {
        SimulatedBuffer::Typed {
            kind,
            storage: SimulatedArrayBuffer::zeroed(len * kind.byte_width()),
            byte_offset: 0,
            len,
        }
    }

    fn new_array(&self, values: &[i64]) -> SimulatedBuffer {
        SimulatedBuffer::Array(Arc::new(RwLock::new(values.to_vec())))
    }

    fn buffer_kind(&self, buffer: &SimulatedBuffer) -> ExternalBufferKind {
        buffer.kind()
    }

    fn buffer_len(&self, buffer: &SimulatedBuffer) -> usize {
        buffer.len()
    }

    fn copy_bytes_from_host(&self, buffer: &SimulatedBuffer, dst: &mut [u8]) {
        if let SimulatedBuffer::Typed {
            storage,
            byte_offset,
            ..
        } = buffer
        {
            let bytes = storage.bytes.read();
            dst.copy_from_slice(&bytes[*byte_offset..*byte_offset + dst.len()]);
        }
    }

    fn array_values(&self, buffer: &SimulatedBuffer) -> BufferResult<Vec<i64>> {
        match buffer {
            SimulatedBuffer::Array(values) => Ok(values.read().clone()),
            SimulatedBuffer::Typed { .. } => Ok(Vec::new()),
        }
    }
}
