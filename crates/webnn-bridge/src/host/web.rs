// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Browser Host
//!
//! `js-sys` implementation of the buffer-construction contract. Storage is a
//! `Uint8Array` whose `ArrayBuffer` backs the typed view handed to WebNN.

use js_sys::{
    Array, BigInt, BigInt64Array, BigUint64Array, Float32Array, Float64Array, Int16Array,
    Int32Array, Int8Array, Uint16Array, Uint32Array, Uint8Array,
};
use wasm_bindgen::{JsCast, JsValue};

use super::BufferHost;
use crate::element::{ExternalBufferKind, TypedArrayKind};
use crate::error::{BufferError, BufferResult};

/// Host runtime of the current browser context
#[derive(Debug, Clone, Copy, Default)]
pub struct WebHost;

impl WebHost {
    pub fn new() -> Self {
        Self
    }
}

// Expands `$body` once per typed-array constructor with `$ty` bound to it.
macro_rules! dispatch_typed {
    ($kind:expr, $ty:ident => $body:expr) => {
        match $kind {
            TypedArrayKind::Int8Array => {
                type $ty = Int8Array;
                $body
            }
            TypedArrayKind::Int16Array => {
                type $ty = Int16Array;
                $body
            }
            TypedArrayKind::Int32Array => {
                type $ty = Int32Array;
                $body
            }
            TypedArrayKind::BigInt64Array => {
                type $ty = BigInt64Array;
                $body
            }
            TypedArrayKind::Uint8Array => {
                type $ty = Uint8Array;
                $body
            }
            TypedArrayKind::Uint16Array => {
                type $ty = Uint16Array;
                $body
            }
            TypedArrayKind::Uint32Array => {
                type $ty = Uint32Array;
                $body
            }
            TypedArrayKind::BigUint64Array => {
                type $ty = BigUint64Array;
                $body
            }
            TypedArrayKind::Float32Array => {
                type $ty = Float32Array;
                $body
            }
            TypedArrayKind::Float64Array => {
                type $ty = Float64Array;
                $body
            }
        }
    };
}

// Largest integer magnitude a JS Number holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Exact integer value of an untyped array entry (BigInt or safe Number)
fn array_entry(value: &JsValue) -> BufferResult<i64> {
    if let Some(big) = value.dyn_ref::<BigInt>() {
        return big
            .to_string(10)
            .ok()
            .and_then(|digits| String::from(digits).parse::<i64>().ok())
            .ok_or_else(|| BufferError::InexactArrayEntry(format!("{:?}", value)));
    }
    match value.as_f64() {
        Some(number) if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER => {
            Ok(number as i64)
        }
        _ => Err(BufferError::InexactArrayEntry(format!("{:?}", value))),
    }
}

const TYPED_KINDS: [TypedArrayKind; 10] = [
    TypedArrayKind::Int8Array,
    TypedArrayKind::Int16Array,
    TypedArrayKind::Int32Array,
    TypedArrayKind::BigInt64Array,
    TypedArrayKind::Uint8Array,
    TypedArrayKind::Uint16Array,
    TypedArrayKind::Uint32Array,
    TypedArrayKind::BigUint64Array,
    TypedArrayKind::Float32Array,
    TypedArrayKind::Float64Array,
];

fn typed_kind_of(value: &JsValue) -> Option<TypedArrayKind> {
    TYPED_KINDS
        .into_iter()
        .find(|kind| dispatch_typed!(*kind, T => value.is_instance_of::<T>()))
}

impl BufferHost for WebHost {
    type Storage = Uint8Array;
    type Buffer = JsValue;

    fn allocate_bytes(&self, byte_len: usize) -> Uint8Array {
        Uint8Array::new_with_length(byte_len as u32)
    }

    fn copy_bytes_to_host(&self, src: &[u8], dst: &Uint8Array) {
        if src.len() == dst.length() as usize {
            dst.copy_from(src);
        } else {
            dst.subarray(0, src.len() as u32).copy_from(src);
        }
    }

    fn typed_view(
        &self,
        kind: TypedArrayKind,
        storage: &Uint8Array,
        byte_offset: usize,
        len: usize,
    ) -> JsValue {
        let buffer = storage.buffer();
        let offset = storage.byte_offset() + byte_offset as u32;
        dispatch_typed!(kind, T => {
            T::new_with_byte_offset_and_length(&buffer, offset, len as u32).into()
        })
    }

    fn new_typed(&self, kind: TypedArrayKind, len: usize) -> JsValue {
        dispatch_typed!(kind, T => T::new_with_length(len as u32).into())
    }

    fn new_array(&self, values: &[i64]) -> JsValue {
        let array = Array::new_with_length(0);
        for value in values {
            array.push(&JsValue::from(*value));
        }
        array.into()
    }

    fn buffer_kind(&self, buffer: &JsValue) -> ExternalBufferKind {
        match typed_kind_of(buffer) {
            Some(kind) => ExternalBufferKind::Typed(kind),
            None => ExternalBufferKind::Array,
        }
    }

    fn buffer_len(&self, buffer: &JsValue) -> usize {
        match typed_kind_of(buffer) {
            Some(kind) => {
                dispatch_typed!(kind, T => buffer.unchecked_ref::<T>().length() as usize)
            }
            None if Array::is_array(buffer) => buffer.unchecked_ref::<Array>().length() as usize,
            None => 0,
        }
    }

    fn copy_bytes_from_host(&self, buffer: &JsValue, dst: &mut [u8]) {
        if let Some(kind) = typed_kind_of(buffer) {
            let bytes = dispatch_typed!(kind, T => {
                let typed = buffer.unchecked_ref::<T>();
                Uint8Array::new_with_byte_offset_and_length(
                    &typed.buffer(),
                    typed.byte_offset(),
                    dst.len() as u32,
                )
            });
            bytes.copy_to(dst);
        }
    }

    fn array_values(&self, buffer: &JsValue) -> BufferResult<Vec<i64>> {
        if !Array::is_array(buffer) {
            return Ok(Vec::new());
        }
        buffer
            .unchecked_ref::<Array>()
            .iter()
            .map(|value| array_entry(&value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_typed_view_over_storage() {
        let host = WebHost::new();
        let storage = host.allocate_bytes(8);
        host.copy_bytes_to_host(bytemuck::cast_slice(&[1.5f32, -2.0]), &storage);
        let view = host.typed_view(TypedArrayKind::Float32Array, &storage, 0, 2);

        assert_eq!(
            host.buffer_kind(&view),
            ExternalBufferKind::Typed(TypedArrayKind::Float32Array)
        );
        assert_eq!(host.buffer_len(&view), 2);
        let values = view.unchecked_ref::<Float32Array>().to_vec();
        assert_eq!(values, vec![1.5, -2.0]);
    }

    #[wasm_bindgen_test]
    fn test_empty_array() {
        let host = WebHost::new();
        let array = host.new_array(&[]);
        assert_eq!(host.buffer_kind(&array), ExternalBufferKind::Array);
        assert_eq!(host.buffer_len(&array), 0);
    }

    #[wasm_bindgen_test]
    fn test_array_entries_are_big_ints() {
        let host = WebHost::new();
        let entries = [i64::MIN + 1, (1 << 53) + 1, i64::MAX];
        let array = host.new_array(&entries);
        assert!(array.unchecked_ref::<Array>().get(1).is_bigint());
        assert_eq!(host.array_values(&array).unwrap(), entries);
    }

    #[wasm_bindgen_test]
    fn test_fractional_number_entry_is_rejected() {
        let host = WebHost::new();
        let array = Array::of2(&JsValue::from_f64(1.0), &JsValue::from_f64(1.5));
        let err = host.array_values(&array.into()).unwrap_err();
        assert!(matches!(err, BufferError::InexactArrayEntry(_)));
    }
}
