// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::time::Duration;

/// Protocol version advertised in `/health` and `server.json`.
pub const PROTOCOL_VERSION: &str = "v1";

/// Marker directory name searched for by workspace discovery (an external
/// collaborator; the daemon only needs the resolved path, not the walk).
pub const MARKER_DIR: &str = ".agentlip";

/// Plugin RPC wall-clock timeout, default 5s (`AGENTLIP_PLUGIN_TIMEOUT_MS`).
pub fn plugin_timeout() -> Duration {
    std::env::var("AGENTLIP_PLUGIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// WS handshake-read timeout, default 5s.
pub fn handshake_timeout() -> Duration {
    std::env::var("AGENTLIP_HANDSHAKE_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// Circuit-breaker consecutive-failure threshold, default 3.
pub fn circuit_breaker_threshold() -> u32 {
    std::env::var("AGENTLIP_CIRCUIT_THRESHOLD").ok().and_then(|s| s.parse().ok()).unwrap_or(3)
}

/// Circuit-breaker cooldown, default 60s.
pub fn circuit_breaker_cooldown() -> Duration {
    std::env::var("AGENTLIP_CIRCUIT_COOLDOWN_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(60))
}

/// Rate limiter: requests per window, default 120 req / 60s per token.
pub fn rate_limit_capacity() -> u32 {
    std::env::var("AGENTLIP_RATE_LIMIT_CAPACITY").ok().and_then(|s| s.parse().ok()).unwrap_or(120)
}

pub fn rate_limit_window() -> Duration {
    std::env::var("AGENTLIP_RATE_LIMIT_WINDOW_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(60))
}
