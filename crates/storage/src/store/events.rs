// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event append, replay, and the latest-event-id query.
//!
//! `event_id` is the sole cursor for both WS replay and HTTP's `/events`
//! endpoint; every mutation in `crate::store` funnels through
//! [`append_event`] inside the same transaction as its row change.

use hub_core::HubError;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value as Json;

use hub_core::{ChannelId, Event, TopicId};

/// Append one event row. Must be called within the same `rusqlite`
/// transaction as the row mutation it describes, never on its own.
#[allow(clippy::too_many_arguments)]
pub fn append_event(
    conn: &Connection,
    ts: i64,
    name: &str,
    scope_channel_id: Option<&str>,
    scope_topic_id: Option<&str>,
    scope_topic_id2: Option<&str>,
    entity_type: &str,
    entity_id: &str,
    data_json: &Json,
) -> Result<i64, HubError> {
    conn.execute(
        "INSERT INTO events
            (ts, name, scope_channel_id, scope_topic_id, scope_topic_id2, entity_type, entity_id, data_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            ts,
            name,
            scope_channel_id,
            scope_topic_id,
            scope_topic_id2,
            entity_type,
            entity_id,
            data_json.to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn row_to_event(row: &Row<'_>) -> rusqlite::Result<Event> {
    let data_raw: String = row.get("data_json")?;
    Ok(Event {
        event_id: row.get("event_id")?,
        ts: row.get("ts")?,
        name: row.get("name")?,
        scope_channel_id: row
            .get::<_, Option<String>>("scope_channel_id")?
            .map(ChannelId::from_string),
        scope_topic_id: row
            .get::<_, Option<String>>("scope_topic_id")?
            .map(TopicId::from_string),
        scope_topic_id2: row
            .get::<_, Option<String>>("scope_topic_id2")?
            .map(TopicId::from_string),
        entity_type: row.get("entity_type")?,
        entity_id: row.get("entity_id")?,
        data_json: serde_json::from_str(&data_raw).unwrap_or(Json::Null),
    })
}

/// `MAX(event_id)`, or 0 for an empty log.
pub fn latest_event_id(conn: &Connection) -> Result<i64, HubError> {
    let max: Option<i64> =
        conn.query_row("SELECT MAX(event_id) FROM events", [], |row| row.get(0))?;
    Ok(max.unwrap_or(0))
}

/// Plain cursor read for the `/events` HTTP endpoint: every event with
/// `event_id > after`, ascending, capped at `limit`.
pub fn list_events(conn: &Connection, after: i64, limit: i64) -> Result<Vec<Event>, HubError> {
    let mut stmt = conn.prepare(
        "SELECT event_id, ts, name, scope_channel_id, scope_topic_id, scope_topic_id2,
                entity_type, entity_id, data_json
         FROM events WHERE event_id > ?1 ORDER BY event_id ASC LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(params![after, limit], row_to_event)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Scope-filtered replay used by both the WS handshake's replay phase and
/// any caller that wants a deterministic historical slice. An event matches
/// when `channel_ids` is empty and `topic_ids` is empty (wildcard), or when
/// its channel is in `channel_ids`, or either topic scope is in `topic_ids`
/// (OR semantics — see the Open Question this preserves in DESIGN.md).
///
/// The scope predicate is pushed into the `WHERE` clause itself rather than
/// applied as a post-query filter, so `LIMIT` bounds the number of *matching*
/// rows, not the number of candidate rows scanned before filtering — with a
/// post-filter, a scoped subscriber could have matching events beyond the
/// limit silently dropped by rows that never matched in the first place.
pub fn replay(
    conn: &Connection,
    after_event_id: i64,
    replay_until: i64,
    channel_ids: &[ChannelId],
    topic_ids: &[TopicId],
    limit: i64,
) -> Result<Vec<Event>, HubError> {
    let wildcard = channel_ids.is_empty() && topic_ids.is_empty();

    if wildcard {
        let mut stmt = conn.prepare(
            "SELECT event_id, ts, name, scope_channel_id, scope_topic_id, scope_topic_id2,
                    entity_type, entity_id, data_json
             FROM events
             WHERE event_id > ?1 AND event_id <= ?2
             ORDER BY event_id ASC LIMIT ?3",
        )?;
        let rows = stmt
            .query_map(params![after_event_id, replay_until, limit], row_to_event)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        return Ok(rows);
    }

    let mut clauses: Vec<String> = Vec::new();
    let mut scope_params: Vec<String> = Vec::new();

    if !channel_ids.is_empty() {
        let placeholders = vec!["?"; channel_ids.len()].join(", ");
        clauses.push(format!("scope_channel_id IN ({placeholders})"));
        scope_params.extend(channel_ids.iter().map(|c| c.as_str().to_string()));
    }
    if !topic_ids.is_empty() {
        let placeholders = vec!["?"; topic_ids.len()].join(", ");
        clauses.push(format!("scope_topic_id IN ({placeholders})"));
        clauses.push(format!("scope_topic_id2 IN ({placeholders})"));
        scope_params.extend(topic_ids.iter().map(|t| t.as_str().to_string()));
        scope_params.extend(topic_ids.iter().map(|t| t.as_str().to_string()));
    }

    let sql = format!(
        "SELECT event_id, ts, name, scope_channel_id, scope_topic_id, scope_topic_id2,
                entity_type, entity_id, data_json
         FROM events
         WHERE event_id > ? AND event_id <= ? AND ({})
         ORDER BY event_id ASC LIMIT ?",
        clauses.join(" OR ")
    );

    let mut all_params: Vec<Box<dyn rusqlite::ToSql>> =
        vec![Box::new(after_event_id), Box::new(replay_until)];
    all_params.extend(scope_params.into_iter().map(|p| Box::new(p) as Box<dyn rusqlite::ToSql>));
    all_params.push(Box::new(limit));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(all_params.iter().map(|p| p.as_ref())), row_to_event)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Fetch a single event by id, used by tests and by the daemon's own
/// sanity checks. Not part of the public replay/list surface.
#[cfg(test)]
pub fn get_event(conn: &Connection, event_id: i64) -> Result<Option<Event>, HubError> {
    conn.query_row(
        "SELECT event_id, ts, name, scope_channel_id, scope_topic_id, scope_topic_id2,
                entity_type, entity_id, data_json
         FROM events WHERE event_id = ?1",
        params![event_id],
        row_to_event,
    )
    .optional()
    .map_err(HubError::from)
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
