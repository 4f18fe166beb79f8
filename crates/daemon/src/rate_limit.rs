// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single-bucket token-bucket rate limiter covering every mutating route.
//!
//! The spec treats the rate limiter as an external, mechanically-simple
//! primitive; this is the simplest thing that satisfies "single token
//! consumption per request."

use std::time::{Duration, Instant};

use parking_lot::Mutex;

pub struct RateLimiter {
    capacity: f64,
    refill_per_sec: f64,
    state: Mutex<BucketState>,
}

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new(capacity: u32, window: Duration) -> Self {
        let refill_per_sec = capacity as f64 / window.as_secs_f64().max(0.001);
        Self {
            capacity: capacity as f64,
            refill_per_sec,
            state: Mutex::new(BucketState { tokens: capacity as f64, last_refill: Instant::now() }),
        }
    }

    /// Consume one token. Returns `true` if allowed.
    pub fn try_acquire(&self) -> bool {
        let mut state = self.state.lock();
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        state.last_refill = now;

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
#[path = "rate_limit_tests.rs"]
mod tests;
