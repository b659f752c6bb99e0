// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Typed buffer bridge tests against the simulated host
//!
//! Run with:
//!   cargo test -p webnn-bridge --test test_buffer_bridge

use webnn_bridge::host::SimulatedHost;
use webnn_bridge::{Element, ElementKind, ExternalBufferKind, TypedArrayKind, TypedBufferBridge};

fn bridge() -> TypedBufferBridge<SimulatedHost> {
    TypedBufferBridge::new(SimulatedHost::new())
}

/// Marshal, check kind and length, read back
fn assert_round_trip<T: Element>(values: &[T]) {
    let bridge = bridge();
    let buffer = bridge.to_external_buffer(values);

    assert_eq!(buffer.kind(), T::KIND.external_kind(), "{}", T::KIND);
    assert_eq!(buffer.len(), values.len(), "{}", T::KIND);
    let back = bridge.read_external_buffer::<T>(&buffer).unwrap();
    assert_eq!(back, values, "{}", T::KIND);
}

#[test]
fn test_round_trip_every_kind() {
    assert_round_trip(&[i8::MIN, -1, 0, 1, i8::MAX]);
    assert_round_trip(&[i16::MIN, -300, 0, 300, i16::MAX]);
    assert_round_trip(&[i32::MIN, -70_000, 0, 70_000, i32::MAX]);
    assert_round_trip(&[i64::MIN, -5_000_000_000, 0, i64::MAX]);
    assert_round_trip(&[0u8, 1, 128, u8::MAX]);
    assert_round_trip(&[0u16, 1, 40_000, u16::MAX]);
    assert_round_trip(&[0u32, 1, 3_000_000_000, u32::MAX]);
    assert_round_trip(&[0u64, 1, u64::MAX]);
    assert_round_trip(&[0.2f32, -1.5, f32::MIN_POSITIVE, f32::MAX]);
    assert_round_trip(&[0.1f64, -2.25, f64::EPSILON, f64::MAX]);
    assert_round_trip(&[-3isize, 0, 42, 1 << 20]);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_isize_beyond_float_precision_is_exact() {
    let values = [isize::MAX, (1isize << 53) + 1, isize::MIN + 1, isize::MIN];
    assert_round_trip(&values);

    let bridge = bridge();
    let buffer = bridge.to_external_buffer(&values);
    let back = bridge.read_external_buffer::<isize>(&buffer).unwrap();
    assert_eq!(back[1], 9_007_199_254_740_993);
    assert_eq!(back[2], -9_223_372_036_854_775_807);
}

#[test]
fn test_float_bits_are_preserved() {
    let bridge = bridge();
    let values = [f32::from_bits(0x7fc0_0001), -0.0f32, f32::INFINITY];
    let buffer = bridge.to_external_buffer(&values);
    let back = bridge.read_external_buffer::<f32>(&buffer).unwrap();

    let bits: Vec<u32> = back.iter().map(|v| v.to_bits()).collect();
    let expected: Vec<u32> = values.iter().map(|v| v.to_bits()).collect();
    assert_eq!(bits, expected);
}

#[test]
fn test_empty_slice_is_zero_length_for_every_kind() {
    fn check<T: Element>() {
        let bridge = bridge();
        let buffer = bridge.to_external_buffer::<T>(&[]);
        assert_eq!(buffer.kind(), ExternalBufferKind::Array);
        assert!(buffer.is_empty());
        let back = bridge.read_external_buffer::<T>(&buffer).unwrap();
        assert!(back.is_empty());
    }

    check::<i8>();
    check::<i16>();
    check::<i32>();
    check::<i64>();
    check::<u8>();
    check::<u16>();
    check::<u32>();
    check::<u64>();
    check::<f32>();
    check::<f64>();
    check::<isize>();
}

#[test]
fn test_new_buffer_is_zeroed() {
    let bridge = bridge();
    for kind in ElementKind::ALL {
        let buffer = bridge.new_external_buffer_of(kind, 5);
        assert_eq!(buffer.kind(), kind.external_kind());
        assert_eq!(buffer.len(), 5, "{kind}");
    }

    let floats = bridge.new_external_buffer::<f64>(3);
    let back = bridge.read_external_buffer::<f64>(&floats).unwrap();
    assert_eq!(back, vec![0.0; 3]);

    let ints = bridge.new_external_buffer::<isize>(2);
    let back = bridge.read_external_buffer::<isize>(&ints).unwrap();
    assert_eq!(back, vec![0, 0]);
}

#[test]
fn test_marshalled_buffer_does_not_alias_source() {
    let bridge = bridge();
    let mut values = vec![1u32, 2, 3];
    let buffer = bridge.to_external_buffer(&values);
    values[0] = 99;

    let back = bridge.read_external_buffer::<u32>(&buffer).unwrap();
    assert_eq!(back, vec![1, 2, 3]);
}

#[test]
fn test_float32_scenario_input_and_output() {
    let bridge = bridge();
    let input = bridge.to_external_buffer(&[1.0f32, 1.0, 1.0, 1.0]);
    let float32 = ExternalBufferKind::Typed(TypedArrayKind::Float32Array);
    assert_eq!(input.kind(), float32);
    assert_eq!(input.len(), 4);
    let back = bridge.read_external_buffer::<f32>(&input).unwrap();
    assert_eq!(back, vec![1.0; 4]);

    let output = bridge.new_external_buffer::<f32>(input.len());
    let zeros = bridge.read_external_buffer::<f32>(&output).unwrap();
    assert_eq!(zeros, vec![0.0; 4]);
}
