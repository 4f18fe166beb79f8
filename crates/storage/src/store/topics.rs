// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Topic creation, listing, and rename.

use hub_core::{ChannelId, HubError, Topic, TopicId};
use rusqlite::{params, Connection, Row};

use super::channels;
use super::events::append_event;
use super::types::Mutation;

fn row_to_topic(row: &Row<'_>) -> rusqlite::Result<Topic> {
    Ok(Topic {
        id: TopicId::from_string(row.get::<_, String>("id")?),
        channel_id: ChannelId::from_string(row.get::<_, String>("channel_id")?),
        title: row.get("title")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn create(
    conn: &mut Connection,
    channel_id: &ChannelId,
    title: &str,
    now_ms: i64,
) -> Result<Mutation<Topic>, HubError> {
    Topic::validate_title(title).map_err(HubError::InvalidInput)?;

    let tx = conn.transaction()?;
    if channels::get(&tx, channel_id)?.is_none() {
        return Err(HubError::NotFound(format!("channel {channel_id}")));
    }

    let id = TopicId::new();
    tx.execute(
        "INSERT INTO topics (id, channel_id, title, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
        params![id.as_str(), channel_id.as_str(), title, now_ms],
    )?;

    let topic = Topic {
        id,
        channel_id: channel_id.clone(),
        title: title.to_string(),
        created_at: now_ms,
        updated_at: now_ms,
    };

    let event_id = append_event(
        &tx,
        now_ms,
        "topic.created",
        Some(topic.channel_id.as_str()),
        Some(topic.id.as_str()),
        None,
        "topic",
        topic.id.as_str(),
        &serde_json::json!({ "title": topic.title }),
    )?;
    tx.commit()?;
    Ok(Mutation::new(topic, event_id))
}

pub fn list_by_channel(conn: &Connection, channel_id: &ChannelId) -> Result<Vec<Topic>, HubError> {
    if channels::get(conn, channel_id)?.is_none() {
        return Err(HubError::NotFound(format!("channel {channel_id}")));
    }
    let mut stmt = conn.prepare(
        "SELECT id, channel_id, title, created_at, updated_at FROM topics
         WHERE channel_id = ?1 ORDER BY created_at ASC",
    )?;
    let rows = stmt
        .query_map(params![channel_id.as_str()], row_to_topic)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub fn get(conn: &Connection, id: &TopicId) -> Result<Option<Topic>, HubError> {
    conn.query_row(
        "SELECT id, channel_id, title, created_at, updated_at FROM topics WHERE id = ?1",
        params![id.as_str()],
        row_to_topic,
    )
    .map(Some)
    .or_else(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(other.into()),
    })
}

/// Bumps `updated_at` without touching `created_at`; used both by a direct
/// rename (`PATCH /topics/:id`) and internally whenever a message lands in
/// the topic.
pub fn touch(conn: &Connection, id: &TopicId, now_ms: i64) -> Result<(), HubError> {
    conn.execute(
        "UPDATE topics SET updated_at = ?2 WHERE id = ?1",
        params![id.as_str(), now_ms],
    )?;
    Ok(())
}

pub fn rename(
    conn: &mut Connection,
    id: &TopicId,
    title: &str,
    now_ms: i64,
) -> Result<Mutation<Topic>, HubError> {
    Topic::validate_title(title).map_err(HubError::InvalidInput)?;

    let tx = conn.transaction()?;
    let mut topic = match get(&tx, id)? {
        Some(t) => t,
        None => return Err(HubError::NotFound(format!("topic {id}"))),
    };

    tx.execute(
        "UPDATE topics SET title = ?2, updated_at = ?3 WHERE id = ?1",
        params![id.as_str(), title, now_ms],
    )?;
    topic.title = title.to_string();
    topic.updated_at = now_ms;

    let event_id = append_event(
        &tx,
        now_ms,
        "topic.renamed",
        Some(topic.channel_id.as_str()),
        Some(topic.id.as_str()),
        None,
        "topic",
        topic.id.as_str(),
        &serde_json::json!({ "title": topic.title }),
    )?;
    tx.commit()?;
    Ok(Mutation::new(topic, event_id))
}

#[cfg(test)]
#[path = "topics_tests.rs"]
mod tests;
