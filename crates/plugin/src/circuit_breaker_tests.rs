// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn opens_after_threshold_consecutive_failures() {
    let breakers = CircuitBreakers::new(3, Duration::from_secs(60));
    assert!(!breakers.is_open("p1"));
    breakers.record_failure("p1");
    breakers.record_failure("p1");
    assert!(!breakers.is_open("p1"));
    breakers.record_failure("p1");
    assert!(breakers.is_open("p1"));
}

#[test]
fn success_resets_the_counter() {
    let breakers = CircuitBreakers::new(2, Duration::from_secs(60));
    breakers.record_failure("p1");
    breakers.record_success("p1");
    breakers.record_failure("p1");
    assert!(!breakers.is_open("p1"));
}

#[test]
fn closes_again_after_cooldown_elapses() {
    let breakers = CircuitBreakers::new(1, Duration::from_millis(20));
    breakers.record_failure("p1");
    assert!(breakers.is_open("p1"));
    std::thread::sleep(Duration::from_millis(30));
    assert!(!breakers.is_open("p1"));
}
