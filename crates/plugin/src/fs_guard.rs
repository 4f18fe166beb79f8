// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort filesystem isolation for plugin workers.
//!
//! This is not a sandbox: it is a path check the worker binary runs against
//! itself before any write, matching the spec's explicit "best-effort, not
//! cryptographic" framing. A plugin written to ignore this guard (or one
//! that escapes via a symlink race) is not contained — see the Open
//! Question recorded in DESIGN.md. Network access and reads are always
//! permitted.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
#[error("plugin attempted a write under the workspace marker: {0}")]
pub struct FsGuardViolation(pub PathBuf);

/// Resolves `path` and rejects it if any component matches `marker_dir_name`
/// (e.g. `.agentlip`). Used to guard writes, not reads.
pub fn check_write(path: &Path, marker_dir_name: &str) -> Result<(), FsGuardViolation> {
    let resolved = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    if resolved.components().any(|c| c.as_os_str() == marker_dir_name) {
        return Err(FsGuardViolation(resolved));
    }
    Ok(())
}

#[cfg(test)]
#[path = "fs_guard_tests.rs"]
mod tests;
