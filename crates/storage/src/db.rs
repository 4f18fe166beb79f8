// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection setup and one-time database bootstrap.

use std::path::Path;
use std::time::Duration;

use hub_core::HubError;
use rusqlite::Connection;

use crate::schema;

/// Open a connection with the workspace's standard pragmas: WAL journaling
/// for concurrent readers, a busy timeout so a brief writer stall doesn't
/// surface as an error, and foreign keys enforced.
pub fn connect(db_path: &Path) -> Result<Connection, HubError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))?;
    conn.execute("PRAGMA foreign_keys=ON;", [])?;
    conn.execute("PRAGMA synchronous=NORMAL;", [])?;
    set_owner_only(db_path)?;
    Ok(conn)
}

/// Restrict the database file to owner-only access (mode 0600) per the
/// workspace's persisted-layout permissions.
#[cfg(unix)]
fn set_owner_only(path: &Path) -> Result<(), HubError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_owner_only(_path: &Path) -> Result<(), HubError> {
    Ok(())
}

/// Run every table/index creation statement, then make sure exactly one
/// `workspace_meta` row exists. `db_id` is generated once, on first open,
/// and never changes afterward — it's how `agentlip status` tells a stale
/// `server.json` from the database it actually points at.
pub fn bootstrap(conn: &Connection, db_id: impl Fn() -> String, now_ms: i64) -> Result<(), HubError> {
    for stmt in schema::ALL_STATEMENTS {
        conn.execute(stmt, [])?;
    }

    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM workspace_meta", [], |row| row.get(0))?;
    if existing == 0 {
        conn.execute(
            "INSERT INTO workspace_meta (schema_version, db_id, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![schema::SCHEMA_VERSION, db_id(), now_ms],
        )?;
    }
    Ok(())
}

/// Read back the workspace identity row written by [`bootstrap`].
pub fn read_meta(conn: &Connection) -> Result<hub_core::WorkspaceMeta, HubError> {
    conn.query_row(
        "SELECT schema_version, db_id, created_at FROM workspace_meta LIMIT 1",
        [],
        |row| {
            Ok(hub_core::WorkspaceMeta {
                schema_version: row.get(0)?,
                db_id: row.get(1)?,
                created_at: row.get(2)?,
            })
        },
    )
    .map_err(HubError::from)
}

/// Flush the WAL back into the main database file. Called on graceful
/// shutdown so the `.db` file alone (without `-wal`/`-shm` siblings) is a
/// complete, consistent snapshot.
pub fn checkpoint(conn: &Connection) -> Result<(), HubError> {
    conn.query_row("PRAGMA wal_checkpoint(TRUNCATE);", [], |_| Ok(()))?;
    Ok(())
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
