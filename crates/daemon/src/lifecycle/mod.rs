// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup/shutdown: workspace layout, writer lock, `server.json`,
//! bind-safety validation.

mod startup;

pub use startup::{cleanup, startup, StartupResult};

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub workspace_marker: PathBuf,
    pub host: String,
    pub port: u16,
    pub unsafe_bind: bool,
    pub idle_shutdown: Option<std::time::Duration>,
}

impl Config {
    pub fn db_path(&self) -> PathBuf {
        self.workspace_marker.join("db.sqlite3")
    }

    pub fn server_json_path(&self) -> PathBuf {
        self.workspace_marker.join("server.json")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.workspace_marker.join("locks").join("writer.lock")
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("writer lock is held by another process")]
    LockHeld(#[source] std::io::Error),

    #[error("refusing to bind non-loopback host {0:?} without --unsafe-bind")]
    BindUnsafe(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error: {0}")]
    Storage(#[from] hub_core::HubError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LifecycleError {
    /// Process exit code per the CLI's `up` contract: 10 for lock conflicts,
    /// 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            LifecycleError::LockHeld(_) => 10,
            _ => 1,
        }
    }
}

/// Only loopback hosts are accepted unless `unsafe_bind` is set.
pub fn validate_bind_host(host: &str, unsafe_bind: bool) -> Result<(), LifecycleError> {
    let normalized = host.trim_start_matches('[').trim_end_matches(']');
    let is_loopback = normalized == "localhost"
        || normalized.parse::<IpAddr>().map(|ip| ip.is_loopback()).unwrap_or(false);
    if is_loopback || unsafe_bind {
        Ok(())
    } else {
        Err(LifecycleError::BindUnsafe(host.to_string()))
    }
}

/// Contents of `server.json`, written 0600 in the marker directory. Lets a
/// `status` caller confirm it is talking to the daemon that owns this
/// workspace, not a stale process on a reused port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub instance_id: String,
    pub db_id: String,
    pub host: String,
    pub port: u16,
    pub pid: u32,
    pub auth_token: String,
    pub started_at: i64,
    pub protocol_version: String,
    pub schema_version: i64,
}

impl ServerInfo {
    pub fn write(&self, path: &Path) -> Result<(), LifecycleError> {
        let json = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, json)?;
        set_owner_only(path)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<ServerInfo, LifecycleError> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(unix)]
pub(crate) fn set_owner_only(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
pub(crate) fn set_owner_only(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(unix)]
pub fn set_dir_owner_only(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
}

#[cfg(not(unix))]
pub fn set_dir_owner_only(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
