// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use hub_core::SystemClock;
use hub_storage::Store;

use crate::fanout::Fanout;
use crate::lifecycle::ServerInfo;
use crate::rate_limit::RateLimiter;

/// Shared handle threaded through every axum handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store<SystemClock>>,
    pub fanout: Arc<Fanout>,
    pub server_info: Arc<ServerInfo>,
    pub rate_limiter: Arc<RateLimiter>,
    pub shutting_down: Arc<AtomicBool>,
    pub started_at: Instant,
    pub plugin_pipeline: Option<Arc<hub_plugin::Pipeline>>,
}

impl AppState {
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Relaxed)
    }

    pub fn begin_shutdown(&self) {
        self.shutting_down.store(true, Ordering::Relaxed);
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
