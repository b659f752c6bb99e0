// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Numeric Element Kinds
//!
//! The closed set of native numeric types that can cross into the host
//! runtime, and the table mapping each of them to the host constructor that
//! must be used for it.
//!
//! ```text
//! ElementKind   ExternalBufferKind          width
//! ───────────   ─────────────────────────   ─────
//! i8            Typed(Int8Array)            1
//! i16           Typed(Int16Array)           2
//! i32           Typed(Int32Array)           4
//! i64           Typed(BigInt64Array)        8
//! u8            Typed(Uint8Array)           1
//! u16           Typed(Uint16Array)          2
//! u32           Typed(Uint32Array)          4
//! u64           Typed(BigUint64Array)       8
//! f32           Typed(Float32Array)         4
//! f64           Typed(Float64Array)         8
//! isize         Array                       native
//! ```

use core::fmt;
use core::str::FromStr;

use crate::error::BufferError;

/// Native numeric primitive kind of a buffer's elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// Platform default-width integer (`isize`)
    Isize,
}

/// Typed-array constructors available in the host runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypedArrayKind {
    Int8Array,
    Int16Array,
    Int32Array,
    BigInt64Array,
    Uint8Array,
    Uint16Array,
    Uint32Array,
    BigUint64Array,
    Float32Array,
    Float64Array,
}

/// Which host constructor a native buffer is marshalled through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalBufferKind {
    /// A fixed-width typed array over host byte storage
    Typed(TypedArrayKind),
    /// A generic, untyped host array of numbers
    Array,
}

impl ElementKind {
    /// Every supported kind, in declaration order
    pub const ALL: [ElementKind; 11] = [
        ElementKind::I8,
        ElementKind::I16,
        ElementKind::I32,
        ElementKind::I64,
        ElementKind::U8,
        ElementKind::U16,
        ElementKind::U32,
        ElementKind::U64,
        ElementKind::F32,
        ElementKind::F64,
        ElementKind::Isize,
    ];

    /// Host buffer kind this element kind is marshalled into
    pub const fn external_kind(self) -> ExternalBufferKind {
        use TypedArrayKind::*;
        match self {
            ElementKind::I8 => ExternalBufferKind::Typed(Int8Array),
            ElementKind::I16 => ExternalBufferKind::Typed(Int16Array),
            ElementKind::I32 => ExternalBufferKind::Typed(Int32Array),
            ElementKind::I64 => ExternalBufferKind::Typed(BigInt64Array),
            ElementKind::U8 => ExternalBufferKind::Typed(Uint8Array),
            ElementKind::U16 => ExternalBufferKind::Typed(Uint16Array),
            ElementKind::U32 => ExternalBufferKind::Typed(Uint32Array),
            ElementKind::U64 => ExternalBufferKind::Typed(BigUint64Array),
            ElementKind::F32 => ExternalBufferKind::Typed(Float32Array),
            ElementKind::F64 => ExternalBufferKind::Typed(Float64Array),
            ElementKind::Isize => ExternalBufferKind::Array,
        }
    }

    /// Size of one element in native memory
    pub const fn byte_width(self) -> usize {
        match self {
            ElementKind::I8 | ElementKind::U8 => 1,
            ElementKind::I16 | ElementKind::U16 => 2,
            ElementKind::I32 | ElementKind::U32 | ElementKind::F32 => 4,
            ElementKind::I64 | ElementKind::U64 | ElementKind::F64 => 8,
            ElementKind::Isize => core::mem::size_of::<isize>(),
        }
    }

    /// WebNN operand `dataType` name
    ///
    /// `Isize` has no WebNN counterpart and reports `"int"`.
    pub const fn data_type(self) -> &'static str {
        match self {
            ElementKind::I8 => "int8",
            ElementKind::I16 => "int16",
            ElementKind::I32 => "int32",
            ElementKind::I64 => "int64",
            ElementKind::U8 => "uint8",
            ElementKind::U16 => "uint16",
            ElementKind::U32 => "uint32",
            ElementKind::U64 => "uint64",
            ElementKind::F32 => "float32",
            ElementKind::F64 => "float64",
            ElementKind::Isize => "int",
        }
    }

    /// Resolve a WebNN operand `dataType` name
    ///
    /// # Errors
    ///
    /// `BufferError::UnsupportedElementKind` for names outside the closed set,
    /// including `float16` which has no native primitive.
    pub fn from_data_type(name: &str) -> Result<Self, BufferError> {
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.data_type() == name)
            .ok_or_else(|| BufferError::UnsupportedElementKind(name.to_string()))
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.data_type())
    }
}

impl FromStr for ElementKind {
    type Err = BufferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::from_data_type(s)
    }
}

impl TypedArrayKind {
    /// Name of the host constructor
    pub const fn constructor_name(self) -> &'static str {
        match self {
            TypedArrayKind::Int8Array => "Int8Array",
            TypedArrayKind::Int16Array => "Int16Array",
            TypedArrayKind::Int32Array => "Int32Array",
            TypedArrayKind::BigInt64Array => "BigInt64Array",
            TypedArrayKind::Uint8Array => "Uint8Array",
            TypedArrayKind::Uint16Array => "Uint16Array",
            TypedArrayKind::Uint32Array => "Uint32Array",
            TypedArrayKind::BigUint64Array => "BigUint64Array",
            TypedArrayKind::Float32Array => "Float32Array",
            TypedArrayKind::Float64Array => "Float64Array",
        }
    }

    /// Element width implied by the constructor
    pub const fn byte_width(self) -> usize {
        match self {
            TypedArrayKind::Int8Array | TypedArrayKind::Uint8Array => 1,
            TypedArrayKind::Int16Array | TypedArrayKind::Uint16Array => 2,
            TypedArrayKind::Int32Array
            | TypedArrayKind::Uint32Array
            | TypedArrayKind::Float32Array => 4,
            TypedArrayKind::BigInt64Array
            | TypedArrayKind::BigUint64Array
            | TypedArrayKind::Float64Array => 8,
        }
    }
}

impl ExternalBufferKind {
    /// Name of the host constructor
    pub const fn constructor_name(self) -> &'static str {
        match self {
            ExternalBufferKind::Typed(kind) => kind.constructor_name(),
            ExternalBufferKind::Array => "Array",
        }
    }

    /// Element width, `None` for the untyped array
    pub const fn byte_width(self) -> Option<usize> {
        match self {
            ExternalBufferKind::Typed(kind) => Some(kind.byte_width()),
            ExternalBufferKind::Array => None,
        }
    }
}

impl fmt::Display for ExternalBufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.constructor_name())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A native numeric primitive that can be marshalled into the host
///
/// Sealed: the set of supported kinds is fixed at compile time, so passing
/// any other element type is rejected by the compiler rather than at runtime.
pub trait Element:
    sealed::Sealed + bytemuck::Pod + PartialEq + fmt::Debug + Send + Sync + 'static
{
    /// Kind tag used for dispatch
    const KIND: ElementKind;

    /// Entry of an untyped host array
    ///
    /// Only [`ElementKind::Isize`] is marshalled as an untyped array, and
    /// `isize` converts to `i64` exactly on every supported target.
    fn to_array_entry(self) -> i64;

    /// Inverse of [`Element::to_array_entry`], `None` if `entry` does not fit
    fn from_array_entry(entry: i64) -> Option<Self>;
}

macro_rules! impl_element {
    (
        integers: [$($int:ty => $int_kind:ident),* $(,)?],
        floats: [$($float:ty => $float_kind:ident),* $(,)?] $(,)?
    ) => {
        $(
            impl sealed::Sealed for $int {}

            impl Element for $int {
                const KIND: ElementKind = ElementKind::$int_kind;

                #[inline]
                fn to_array_entry(self) -> i64 {
                    self as i64
                }

                #[inline]
                fn from_array_entry(entry: i64) -> Option<Self> {
                    <$int>::try_from(entry).ok()
                }
            }
        )*
        $(
            impl sealed::Sealed for $float {}

            impl Element for $float {
                const KIND: ElementKind = ElementKind::$float_kind;

                // Floats always travel in typed buffers.
                #[inline]
                fn to_array_entry(self) -> i64 {
                    self as i64
                }

                #[inline]
                fn from_array_entry(_entry: i64) -> Option<Self> {
                    None
                }
            }
        )*
    };
}

impl_element! {
    integers: [
        i8 => I8,
        i16 => I16,
        i32 => I32,
        i64 => I64,
        u8 => U8,
        u16 => U16,
        u32 => U32,
        u64 => U64,
        isize => Isize,
    ],
    floats: [
        f32 => F32,
        f64 => F64,
    ],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width_of<T: Element>() -> usize {
        core::mem::size_of::<T>()
    }

    #[test]
    fn test_byte_width_matches_native_size() {
        assert_eq!(ElementKind::I8.byte_width(), width_of::<i8>());
        assert_eq!(ElementKind::U16.byte_width(), width_of::<u16>());
        assert_eq!(ElementKind::F32.byte_width(), width_of::<f32>());
        assert_eq!(ElementKind::I64.byte_width(), width_of::<i64>());
        assert_eq!(ElementKind::Isize.byte_width(), width_of::<isize>());
    }

    #[test]
    fn test_typed_kinds_agree_on_width() {
        for kind in ElementKind::ALL {
            match kind.external_kind() {
                ExternalBufferKind::Typed(typed) => {
                    assert_eq!(typed.byte_width(), kind.byte_width(), "{kind}")
                }
                ExternalBufferKind::Array => assert_eq!(kind, ElementKind::Isize),
            }
        }
    }

    #[test]
    fn test_data_type_names() {
        assert_eq!("float32".parse::<ElementKind>().unwrap(), ElementKind::F32);
        let kind = ElementKind::from_data_type("uint64").unwrap();
        assert_eq!(kind, ElementKind::U64);
        assert_eq!(ElementKind::I32.to_string(), "int32");
    }

    #[test]
    fn test_unsupported_data_type() {
        let err = ElementKind::from_data_type("float16").unwrap_err();
        let expected = BufferError::UnsupportedElementKind("float16".to_string());
        assert_eq!(err, expected);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_isize_array_entries_are_exact() {
        for value in [isize::MIN, isize::MIN + 1, (1isize << 53) + 1, isize::MAX] {
            let entry = value.to_array_entry();
            assert_eq!(entry, value as i64);
            assert_eq!(isize::from_array_entry(entry), Some(value));
        }
        assert_eq!(i8::from_array_entry(300), None);
        assert_eq!(f32::from_array_entry(1), None);
    }

    #[test]
    fn test_big_int_constructors() {
        assert_eq!(
            ElementKind::I64.external_kind().constructor_name(),
            "BigInt64Array"
        );
        assert_eq!(ElementKind::Isize.external_kind().byte_width(), None);
    }
}
