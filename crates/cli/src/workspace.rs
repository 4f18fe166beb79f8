// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace discovery: an external collaborator per the design (walking up
//! to a marker directory is mechanically simple), kept here rather than in
//! `hub-daemon` since only the CLI needs to locate a workspace it wasn't
//! told about explicitly.

use std::path::{Path, PathBuf};

/// Resolves the marker directory for a workspace. If `explicit` is given,
/// it is used as-is (created if absent). Otherwise walks up from the
/// current directory looking for an existing marker, stopping at `$HOME`
/// or the filesystem root; if none is found, the marker is created in the
/// current directory.
pub fn resolve_marker(explicit: Option<PathBuf>) -> std::io::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    let cwd = std::env::current_dir()?;
    let home = dirs::home_dir();

    let mut dir = cwd.as_path();
    loop {
        let candidate = dir.join(hub_daemon::env::MARKER_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        if home.as_deref() == Some(dir) {
            break;
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }

    Ok(cwd.join(hub_daemon::env::MARKER_DIR))
}

pub fn server_json_path(marker: &Path) -> PathBuf {
    marker.join("server.json")
}

pub fn db_path(marker: &Path) -> PathBuf {
    marker.join("db.sqlite3")
}
