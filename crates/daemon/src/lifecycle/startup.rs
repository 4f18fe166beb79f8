// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup: acquire the writer lock first, then open the store, then
//! write `server.json` last so a reader never sees a half-written handoff.

use std::fs::OpenOptions;
use std::sync::Arc;

use fs2::FileExt;
use hub_core::SystemClock;
use hub_storage::Store;
use nanoid::nanoid;
use tracing::info;

use super::{Config, LifecycleError, ServerInfo};

pub struct StartupResult {
    pub store: Arc<Store<SystemClock>>,
    pub server_info: ServerInfo,
    /// Held for the daemon's lifetime; dropping releases the OS lock.
    pub lock_file: std::fs::File,
}

pub async fn startup(config: &Config, auth_token: Option<String>) -> Result<StartupResult, LifecycleError> {
    validate_bind_host(&config.host, config.unsafe_bind)?;

    std::fs::create_dir_all(&config.workspace_marker)?;
    super::set_dir_owner_only(&config.workspace_marker)?;
    if let Some(parent) = config.lock_path().parent() {
        std::fs::create_dir_all(parent)?;
    }

    let lock_file = OpenOptions::new().write(true).create(true).truncate(false).open(config.lock_path())?;
    super::set_owner_only(&config.lock_path())?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockHeld)?;

    let store: Store<SystemClock> = Store::open(&config.db_path())?;
    let meta = store.meta()?;

    let server_info = ServerInfo {
        instance_id: nanoid!(16),
        db_id: meta.db_id,
        host: config.host.clone(),
        port: config.port,
        pid: std::process::id(),
        auth_token: auth_token.unwrap_or_else(|| nanoid!(24)),
        started_at: chrono::Utc::now().timestamp_millis(),
        protocol_version: crate::env::PROTOCOL_VERSION.to_string(),
        schema_version: meta.schema_version,
    };
    server_info.write(&config.server_json_path())?;
    info!(instance_id = %server_info.instance_id, db_id = %server_info.db_id, "daemon started");

    Ok(StartupResult { store: Arc::new(store), server_info, lock_file })
}

fn validate_bind_host(host: &str, unsafe_bind: bool) -> Result<(), LifecycleError> {
    super::validate_bind_host(host, unsafe_bind)
}

/// Runs on clean shutdown: checkpoint the WAL, then remove the handoff files.
pub fn cleanup(config: &Config, store: &Store<SystemClock>) {
    if let Err(err) = store.checkpoint() {
        tracing::warn!(%err, "WAL checkpoint failed during shutdown");
    }
    let _ = std::fs::remove_file(config.server_json_path());
    let _ = std::fs::remove_file(config.lock_path());
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
