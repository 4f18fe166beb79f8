// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel creation and listing.

use hub_core::{Channel, ChannelId, HubError};
use rusqlite::{params, Connection, Row};

use super::events::append_event;
use super::types::Mutation;

fn row_to_channel(row: &Row<'_>) -> rusqlite::Result<Channel> {
    Ok(Channel {
        id: ChannelId::from_string(row.get::<_, String>("id")?),
        name: row.get("name")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
    })
}

pub fn create(
    conn: &mut Connection,
    name: &str,
    description: Option<&str>,
    now_ms: i64,
) -> Result<Mutation<Channel>, HubError> {
    Channel::validate_name(name).map_err(HubError::InvalidInput)?;

    let tx = conn.transaction()?;
    let id = ChannelId::new();

    let inserted = tx.execute(
        "INSERT OR IGNORE INTO channels (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![id.as_str(), name, description, now_ms],
    )?;
    if inserted == 0 {
        return Err(HubError::AlreadyExists(format!(
            "channel name {name:?} already exists"
        )));
    }

    let channel = Channel {
        id,
        name: name.to_string(),
        description: description.map(str::to_string),
        created_at: now_ms,
    };

    let event_id = append_event(
        &tx,
        now_ms,
        "channel.created",
        Some(channel.id.as_str()),
        None,
        None,
        "channel",
        channel.id.as_str(),
        &serde_json::json!({ "name": channel.name }),
    )?;
    tx.commit()?;
    Ok(Mutation::new(channel, event_id))
}

pub fn list(conn: &Connection) -> Result<Vec<Channel>, HubError> {
    let mut stmt =
        conn.prepare("SELECT id, name, description, created_at FROM channels ORDER BY created_at ASC")?;
    let rows = stmt
        .query_map([], row_to_channel)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub fn get(conn: &Connection, id: &ChannelId) -> Result<Option<Channel>, HubError> {
    conn.query_row(
        "SELECT id, name, description, created_at FROM channels WHERE id = ?1",
        params![id.as_str()],
        row_to_channel,
    )
    .map(Some)
    .or_else(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(other.into()),
    })
}

#[cfg(test)]
#[path = "channels_tests.rs"]
mod tests;
