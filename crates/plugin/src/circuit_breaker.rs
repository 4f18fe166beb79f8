// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-plugin consecutive-failure counter with a cooldown window.
//! The map is process-global within a `Pipeline` instance (spec §5).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

struct PluginState {
    consecutive_failures: u32,
    opened_at: Option<Instant>,
}

pub struct CircuitBreakers {
    threshold: u32,
    cooldown: Duration,
    state: Mutex<HashMap<String, PluginState>>,
}

impl CircuitBreakers {
    pub fn new(threshold: u32, cooldown: Duration) -> Self {
        Self { threshold, cooldown, state: Mutex::new(HashMap::new()) }
    }

    /// `true` if the circuit is currently open for `plugin_name`.
    pub fn is_open(&self, plugin_name: &str) -> bool {
        let mut state = self.state.lock();
        let Some(entry) = state.get_mut(plugin_name) else { return false };
        match entry.opened_at {
            Some(opened_at) if opened_at.elapsed() >= self.cooldown => {
                entry.opened_at = None;
                entry.consecutive_failures = 0;
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    pub fn record_success(&self, plugin_name: &str) {
        let mut state = self.state.lock();
        state.remove(plugin_name);
    }

    pub fn record_failure(&self, plugin_name: &str) {
        let mut state = self.state.lock();
        let entry = state.entry(plugin_name.to_string()).or_insert(PluginState {
            consecutive_failures: 0,
            opened_at: None,
        });
        entry.consecutive_failures += 1;
        if entry.consecutive_failures >= self.threshold {
            entry.opened_at = Some(Instant::now());
        }
    }
}

#[cfg(test)]
#[path = "circuit_breaker_tests.rs"]
mod tests;
