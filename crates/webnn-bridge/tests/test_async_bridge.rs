// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Async bridge tests: simulated promises settled from a host thread
//!
//! Run with:
//!   cargo test -p webnn-bridge --test test_async_bridge

use std::future::Future;
use std::task::Context;
use std::thread;
use std::time::Duration;

use futures_util::task::noop_waker_ref;
use webnn_bridge::host::{SimulatedBuffer, SimulatedHost};
use webnn_bridge::pending::{pending_pair, SimulatedPending};
use webnn_bridge::{await_pending, settle, BridgeError, PendingResult, SettleFn, TypedBufferBridge};

#[test]
fn test_compute_scenario_resolves_with_output() {
    let bridge = TypedBufferBridge::new(SimulatedHost::new());
    let input = bridge.to_external_buffer(&[1.0f32, 1.0, 1.0, 1.0]);
    let output = bridge.new_external_buffer::<f32>(4);

    let (pending, settler) = pending_pair::<SimulatedBuffer, String>();

    // The "host" runs the operation on its own thread and writes the output.
    let host_input = input.clone();
    let host_output = output.clone();
    let host = thread::spawn(move || {
        let remote = TypedBufferBridge::new(SimulatedHost::new());
        let values = remote.read_external_buffer::<f32>(&host_input).unwrap();
        thread::sleep(Duration::from_millis(5));
        host_output.write_elements(&values);
        settler.resolve(host_output);
    });

    let result = await_pending(pending).unwrap();
    host.join().unwrap();

    let values = bridge.read_external_buffer::<f32>(&result).unwrap();
    assert_eq!(values, vec![1.0; 4]);
    // Resolved buffer is the caller's own output buffer, unchanged
    assert!(result.storage().unwrap().ptr_eq(output.storage().unwrap()));
}

#[test]
fn test_rejection_scenario() {
    let (pending, settler) = pending_pair::<SimulatedBuffer, String>();
    let host = thread::spawn(move || {
        settler.reject("device unavailable".to_string());
    });

    let err = await_pending(pending).unwrap_err();
    host.join().unwrap();

    assert!(matches!(err, BridgeError::Rejected(_)));
    assert!(err.to_string().contains("device unavailable"));
}

#[test]
fn test_settled_before_await() {
    let (pending, settler) = pending_pair::<u32, String>();
    settler.resolve(11);
    assert_eq!(await_pending(pending).unwrap(), 11);
}

#[test]
fn test_retry_is_a_second_await() {
    let (first, first_settler) = pending_pair::<&'static str, String>();
    first_settler.reject("preferred options rejected".to_string());
    assert!(await_pending(first).is_err());

    let (second, second_settler) = pending_pair::<&'static str, String>();
    second_settler.resolve("default");
    assert_eq!(await_pending(second).unwrap(), "default");
}

/// Host that breaks its contract and fires both handlers
struct DoubleFiring;

impl PendingResult for DoubleFiring {
    type Value = u32;
    type Failure = String;
    type Registration = ();

    fn register(self, on_resolve: SettleFn<u32>, on_reject: SettleFn<String>) {
        thread::spawn(move || {
            on_resolve(5);
            on_reject("late failure".to_string());
        });
    }
}

#[test]
fn test_exactly_one_outcome_is_observed() {
    for _ in 0..50 {
        // Whatever the interleaving, the first outcome wins.
        assert_eq!(await_pending(DoubleFiring).unwrap(), 5);
    }
}

#[test]
fn test_handlers_released_on_rejection() {
    let (pending, settler): (SimulatedPending<u32, String>, _) = pending_pair();
    let observer = pending.observer();

    let host = thread::spawn(move || {
        thread::sleep(Duration::from_millis(5));
        settler.reject("boom".to_string());
    });
    assert!(await_pending(pending).is_err());
    host.join().unwrap();

    assert!(!observer.has_handlers());
    assert!(observer.is_settled());
}

#[test]
fn test_handlers_released_when_future_is_dropped() {
    let (pending, settler): (SimulatedPending<u32, String>, _) = pending_pair();
    let observer = pending.observer();

    let mut cx = Context::from_waker(noop_waker_ref());
    let mut waiting = Box::pin(settle(pending));
    assert!(waiting.as_mut().poll(&mut cx).is_pending());
    assert!(observer.has_handlers());

    // Caller gives up before the host settles.
    drop(waiting);
    assert!(!observer.has_handlers());
    assert!(!observer.is_settled());

    // Settling later finds nobody to notify and is held instead.
    assert!(settler.resolve(3));
    assert!(!observer.has_handlers());
}

#[test]
fn test_many_concurrent_awaits() {
    let waiters: Vec<_> = (0..8u32)
        .map(|i| {
            let (pending, settler) = pending_pair::<u32, String>();
            let host = thread::spawn(move || {
                thread::sleep(Duration::from_millis(u64::from(i)));
                if i % 2 == 0 {
                    settler.resolve(i);
                } else {
                    settler.reject(format!("odd {i}"));
                }
            });
            (i, pending, host)
        })
        .collect();

    for (i, pending, host) in waiters {
        let result = await_pending(pending);
        host.join().unwrap();
        if i % 2 == 0 {
            assert_eq!(result.unwrap(), i);
        } else {
            assert_eq!(result.unwrap_err().message(), format!("odd {i}"));
        }
    }
}
