// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message create/edit/delete/retopic — the optimistic-versioning core.
//!
//! Every mutation here runs in one transaction with its event append, and
//! message rows are never removed: delete is a tombstone, not a DELETE.

use hub_core::limits::{MESSAGE_CONTENT_MAX_BYTES, TOMBSTONE_SENTINEL};
use hub_core::{ChannelId, HubError, Message, MessageId, TopicId};
use rusqlite::{params, Connection, Row, Transaction};

use super::events::append_event;
use super::topics;
use super::types::{Mutation, RetopicMode};

fn row_to_message(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: MessageId::from_string(row.get::<_, String>("id")?),
        topic_id: TopicId::from_string(row.get::<_, String>("topic_id")?),
        channel_id: ChannelId::from_string(row.get::<_, String>("channel_id")?),
        sender: row.get("sender")?,
        content_raw: row.get("content_raw")?,
        version: row.get("version")?,
        created_at: row.get("created_at")?,
        edited_at: row.get("edited_at")?,
        deleted_at: row.get("deleted_at")?,
        deleted_by: row.get("deleted_by")?,
    })
}

fn validate_content(content_raw: &str) -> Result<(), HubError> {
    if content_raw.len() > MESSAGE_CONTENT_MAX_BYTES {
        return Err(HubError::PayloadTooLarge(format!(
            "content_raw exceeds {MESSAGE_CONTENT_MAX_BYTES} bytes"
        )));
    }
    Ok(())
}

fn get_tx(tx: &Transaction<'_>, id: &MessageId) -> Result<Option<Message>, HubError> {
    tx.query_row(
        "SELECT id, topic_id, channel_id, sender, content_raw, version, created_at,
                edited_at, deleted_at, deleted_by
         FROM messages WHERE id = ?1",
        params![id.as_str()],
        row_to_message,
    )
    .map(Some)
    .or_else(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(other.into()),
    })
}

pub fn get(conn: &Connection, id: &MessageId) -> Result<Option<Message>, HubError> {
    conn.query_row(
        "SELECT id, topic_id, channel_id, sender, content_raw, version, created_at,
                edited_at, deleted_at, deleted_by
         FROM messages WHERE id = ?1",
        params![id.as_str()],
        row_to_message,
    )
    .map(Some)
    .or_else(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(other.into()),
    })
}

pub fn create(
    conn: &mut Connection,
    topic_id: &TopicId,
    sender: &str,
    content_raw: &str,
    now_ms: i64,
) -> Result<Mutation<Message>, HubError> {
    if sender.trim().is_empty() {
        return Err(HubError::InvalidInput("sender must be non-empty".into()));
    }
    validate_content(content_raw)?;

    let tx = conn.transaction()?;
    let topic = match topics::get(&tx, topic_id)? {
        Some(t) => t,
        None => return Err(HubError::NotFound(format!("topic {topic_id}"))),
    };

    let id = MessageId::new();
    tx.execute(
        "INSERT INTO messages (id, topic_id, channel_id, sender, content_raw, version, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
        params![id.as_str(), topic_id.as_str(), topic.channel_id.as_str(), sender, content_raw, now_ms],
    )?;
    topics::touch(&tx, topic_id, now_ms)?;

    let message = Message {
        id,
        topic_id: topic_id.clone(),
        channel_id: topic.channel_id.clone(),
        sender: sender.to_string(),
        content_raw: content_raw.to_string(),
        version: 1,
        created_at: now_ms,
        edited_at: None,
        deleted_at: None,
        deleted_by: None,
    };

    let event_id = append_event(
        &tx,
        now_ms,
        "message.created",
        Some(message.channel_id.as_str()),
        Some(message.topic_id.as_str()),
        None,
        "message",
        message.id.as_str(),
        &serde_json::json!({ "sender": message.sender, "version": message.version }),
    )?;
    tx.commit()?;
    Ok(Mutation::new(message, event_id))
}

fn check_version(message: &Message, expected_version: Option<i64>) -> Result<(), HubError> {
    if let Some(expected) = expected_version {
        if message.version != expected {
            return Err(HubError::VersionConflict { current: message.version });
        }
    }
    Ok(())
}

pub fn edit(
    conn: &mut Connection,
    message_id: &MessageId,
    new_content_raw: &str,
    expected_version: Option<i64>,
    now_ms: i64,
) -> Result<Mutation<Message>, HubError> {
    validate_content(new_content_raw)?;

    let tx = conn.transaction()?;
    let mut message = match get_tx(&tx, message_id)? {
        Some(m) => m,
        None => return Err(HubError::NotFound(format!("message {message_id}"))),
    };
    if message.is_deleted() {
        return Err(HubError::MessageDeleted);
    }
    check_version(&message, expected_version)?;

    let new_version = message.version + 1;
    tx.execute(
        "UPDATE messages SET content_raw = ?2, version = ?3, edited_at = ?4 WHERE id = ?1",
        params![message_id.as_str(), new_content_raw, new_version, now_ms],
    )?;
    message.content_raw = new_content_raw.to_string();
    message.version = new_version;
    message.edited_at = Some(now_ms);

    let event_id = append_event(
        &tx,
        now_ms,
        "message.edited",
        Some(message.channel_id.as_str()),
        Some(message.topic_id.as_str()),
        None,
        "message",
        message.id.as_str(),
        &serde_json::json!({ "version": message.version }),
    )?;
    tx.commit()?;
    Ok(Mutation::new(message, event_id))
}

pub fn delete(
    conn: &mut Connection,
    message_id: &MessageId,
    actor: &str,
    expected_version: Option<i64>,
    now_ms: i64,
) -> Result<Mutation<Message>, HubError> {
    let tx = conn.transaction()?;
    let mut message = match get_tx(&tx, message_id)? {
        Some(m) => m,
        None => return Err(HubError::NotFound(format!("message {message_id}"))),
    };
    if message.is_deleted() {
        // Idempotent: deleting an already-tombstoned message is a no-op.
        tx.commit()?;
        return Ok(Mutation::no_op(message));
    }
    check_version(&message, expected_version)?;

    let new_version = message.version + 1;
    tx.execute(
        "UPDATE messages SET content_raw = ?2, version = ?3, deleted_at = ?4, deleted_by = ?5
         WHERE id = ?1",
        params![message_id.as_str(), TOMBSTONE_SENTINEL, new_version, now_ms, actor],
    )?;
    message.content_raw = TOMBSTONE_SENTINEL.to_string();
    message.version = new_version;
    message.deleted_at = Some(now_ms);
    message.deleted_by = Some(actor.to_string());

    let event_id = append_event(
        &tx,
        now_ms,
        "message.deleted",
        Some(message.channel_id.as_str()),
        Some(message.topic_id.as_str()),
        None,
        "message",
        message.id.as_str(),
        &serde_json::json!({ "deleted_by": actor, "version": message.version }),
    )?;
    tx.commit()?;
    Ok(Mutation::new(message, event_id))
}

/// Move one, later-in-topic, or all messages from their current topic to
/// `to_topic_id`. Rows are processed in ascending `id` order so the emitted
/// event ids are contiguous for the batch, matching the store's tie-break
/// contract.
pub fn move_topic(
    conn: &mut Connection,
    message_id: &MessageId,
    to_topic_id: &TopicId,
    mode: RetopicMode,
    expected_version: Option<i64>,
    now_ms: i64,
) -> Result<Vec<Mutation<Message>>, HubError> {
    let tx = conn.transaction()?;

    let anchor = match get_tx(&tx, message_id)? {
        Some(m) => m,
        None => return Err(HubError::NotFound(format!("message {message_id}"))),
    };
    let dest = match topics::get(&tx, to_topic_id)? {
        Some(t) => t,
        None => return Err(HubError::NotFound(format!("topic {to_topic_id}"))),
    };
    if dest.channel_id != anchor.channel_id {
        return Err(HubError::CrossChannelMove);
    }
    check_version(&anchor, expected_version)?;

    let from_topic_id = anchor.topic_id.clone();
    let targets: Vec<Message> = match mode {
        RetopicMode::One => vec![anchor],
        RetopicMode::Later => {
            // "later" is a chronological notion (created_at), not a
            // lexicographic one — ids are random nanoids. Ties on the
            // same millisecond fall back to id so the set is well-defined.
            let mut stmt = tx.prepare(
                "SELECT id, topic_id, channel_id, sender, content_raw, version, created_at,
                        edited_at, deleted_at, deleted_by
                 FROM messages
                 WHERE topic_id = ?1
                   AND (created_at > ?2 OR (created_at = ?2 AND id >= ?3))
                 ORDER BY id ASC",
            )?;
            stmt.query_map(
                params![from_topic_id.as_str(), anchor.created_at, message_id.as_str()],
                row_to_message,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?
        }
        RetopicMode::All => {
            let mut stmt = tx.prepare(
                "SELECT id, topic_id, channel_id, sender, content_raw, version, created_at,
                        edited_at, deleted_at, deleted_by
                 FROM messages WHERE topic_id = ?1 ORDER BY id ASC",
            )?;
            stmt.query_map(params![from_topic_id.as_str()], row_to_message)?
                .collect::<rusqlite::Result<Vec<_>>>()?
        }
    };

    let mut moved = Vec::with_capacity(targets.len());
    for mut msg in targets {
        let new_version = msg.version + 1;
        tx.execute(
            "UPDATE messages SET topic_id = ?2, version = ?3 WHERE id = ?1",
            params![msg.id.as_str(), to_topic_id.as_str(), new_version],
        )?;
        msg.topic_id = to_topic_id.clone();
        msg.version = new_version;

        let event_id = append_event(
            &tx,
            now_ms,
            "message.moved_topic",
            Some(msg.channel_id.as_str()),
            Some(to_topic_id.as_str()),
            Some(from_topic_id.as_str()),
            "message",
            msg.id.as_str(),
            &serde_json::json!({ "from_topic_id": from_topic_id, "to_topic_id": to_topic_id, "version": msg.version }),
        )?;
        moved.push(Mutation::new(msg, event_id));
    }

    topics::touch(&tx, to_topic_id, now_ms)?;
    tx.commit()?;
    Ok(moved)
}

pub struct MessageFilter<'a> {
    pub channel_id: Option<&'a ChannelId>,
    pub topic_id: Option<&'a TopicId>,
    pub limit: i64,
    pub before_id: Option<&'a MessageId>,
    pub after_id: Option<&'a MessageId>,
}

/// Listing is ordered by `id` ascending (nanoid ids are not lexicographically
/// time-ordered across the prefix boundary in general, but within one topic
/// insertion order and `id` order coincide because ids are only ever
/// compared for pagination cursors the caller itself produced).
pub fn list(conn: &Connection, filter: &MessageFilter<'_>) -> Result<Vec<Message>, HubError> {
    let mut sql = String::from(
        "SELECT id, topic_id, channel_id, sender, content_raw, version, created_at,
                edited_at, deleted_at, deleted_by
         FROM messages WHERE 1=1",
    );
    let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(channel_id) = filter.channel_id {
        sql.push_str(" AND channel_id = ?");
        args.push(Box::new(channel_id.as_str().to_string()));
    }
    if let Some(topic_id) = filter.topic_id {
        sql.push_str(" AND topic_id = ?");
        args.push(Box::new(topic_id.as_str().to_string()));
    }
    if let Some(before_id) = filter.before_id {
        sql.push_str(" AND id < ?");
        args.push(Box::new(before_id.as_str().to_string()));
    }
    if let Some(after_id) = filter.after_id {
        sql.push_str(" AND id > ?");
        args.push(Box::new(after_id.as_str().to_string()));
    }
    sql.push_str(" ORDER BY id ASC LIMIT ?");
    args.push(Box::new(filter.limit));

    let mut stmt = conn.prepare(&sql)?;
    let params_ref: Vec<&dyn rusqlite::ToSql> = args.iter().map(|b| b.as_ref()).collect();
    let rows = stmt
        .query_map(params_ref.as_slice(), row_to_message)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;
