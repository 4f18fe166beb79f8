// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Attachment idempotent upsert, keyed by `(topic_id, kind, key, dedupe_key)`.

use hub_core::limits::ATTACHMENT_VALUE_MAX_BYTES;
use hub_core::{Attachment, AttachmentId, HubError, MessageId, TopicId};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use super::events::append_event;
use super::topics;
use super::types::Mutation;

fn row_to_attachment(row: &Row<'_>) -> rusqlite::Result<Attachment> {
    let value_raw: String = row.get("value_json")?;
    Ok(Attachment {
        id: AttachmentId::from_string(row.get::<_, String>("id")?),
        topic_id: TopicId::from_string(row.get::<_, String>("topic_id")?),
        kind: row.get("kind")?,
        key: row.get("key")?,
        value_json: serde_json::from_str(&value_raw).unwrap_or(serde_json::Value::Null),
        dedupe_key: row.get("dedupe_key")?,
        source_message_id: row
            .get::<_, Option<String>>("source_message_id")?
            .map(MessageId::from_string),
        created_at: row.get("created_at")?,
    })
}

fn find_existing(
    tx: &Transaction<'_>,
    topic_id: &TopicId,
    kind: &str,
    key: Option<&str>,
    dedupe_key: &str,
) -> Result<Option<Attachment>, HubError> {
    tx.query_row(
        "SELECT id, topic_id, kind, key, value_json, dedupe_key, source_message_id, created_at
         FROM attachments
         WHERE topic_id = ?1 AND kind = ?2 AND COALESCE(key, '') = COALESCE(?3, '') AND dedupe_key = ?4",
        params![topic_id.as_str(), kind, key, dedupe_key],
        row_to_attachment,
    )
    .optional()
    .map_err(HubError::from)
}

#[allow(clippy::too_many_arguments)]
pub fn create(
    conn: &mut Connection,
    topic_id: &TopicId,
    kind: &str,
    key: Option<&str>,
    value_json: &serde_json::Value,
    dedupe_key: &str,
    source_message_id: Option<&MessageId>,
    now_ms: i64,
) -> Result<Mutation<Attachment>, HubError> {
    if kind.trim().is_empty() {
        return Err(HubError::InvalidInput("attachment kind must be non-empty".into()));
    }
    if dedupe_key.trim().is_empty() {
        return Err(HubError::InvalidInput("dedupe_key must be non-empty".into()));
    }
    let value_raw = value_json.to_string();
    if value_raw.len() > ATTACHMENT_VALUE_MAX_BYTES {
        return Err(HubError::PayloadTooLarge(format!(
            "value_json exceeds {ATTACHMENT_VALUE_MAX_BYTES} bytes"
        )));
    }

    let tx = conn.transaction()?;
    let topic = match topics::get(&tx, topic_id)? {
        Some(t) => t,
        None => return Err(HubError::NotFound(format!("topic {topic_id}"))),
    };

    if let Some(existing) = find_existing(&tx, topic_id, kind, key, dedupe_key)? {
        tx.commit()?;
        return Ok(Mutation::no_op(existing));
    }

    let id = AttachmentId::new();
    tx.execute(
        "INSERT INTO attachments
            (id, topic_id, kind, key, value_json, dedupe_key, source_message_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id.as_str(),
            topic_id.as_str(),
            kind,
            key,
            value_raw,
            dedupe_key,
            source_message_id.map(|m| m.as_str()),
            now_ms,
        ],
    )?;

    let attachment = Attachment {
        id,
        topic_id: topic_id.clone(),
        kind: kind.to_string(),
        key: key.map(str::to_string),
        value_json: value_json.clone(),
        dedupe_key: dedupe_key.to_string(),
        source_message_id: source_message_id.cloned(),
        created_at: now_ms,
    };

    let event_id = append_event(
        &tx,
        now_ms,
        "topic.attachment_added",
        Some(topic.channel_id.as_str()),
        Some(topic_id.as_str()),
        None,
        "attachment",
        attachment.id.as_str(),
        &serde_json::json!({ "kind": attachment.kind }),
    )?;
    tx.commit()?;
    Ok(Mutation::new(attachment, event_id))
}

pub fn list(
    conn: &Connection,
    topic_id: &TopicId,
    kind: Option<&str>,
) -> Result<Vec<Attachment>, HubError> {
    if topics::get(conn, topic_id)?.is_none() {
        return Err(HubError::NotFound(format!("topic {topic_id}")));
    }
    let rows = if let Some(kind) = kind {
        let mut stmt = conn.prepare(
            "SELECT id, topic_id, kind, key, value_json, dedupe_key, source_message_id, created_at
             FROM attachments WHERE topic_id = ?1 AND kind = ?2 ORDER BY created_at ASC",
        )?;
        stmt.query_map(params![topic_id.as_str(), kind], row_to_attachment)?
            .collect::<rusqlite::Result<Vec<_>>>()?
    } else {
        let mut stmt = conn.prepare(
            "SELECT id, topic_id, kind, key, value_json, dedupe_key, source_message_id, created_at
             FROM attachments WHERE topic_id = ?1 ORDER BY created_at ASC",
        )?;
        stmt.query_map(params![topic_id.as_str()], row_to_attachment)?
            .collect::<rusqlite::Result<Vec<_>>>()?
    };
    Ok(rows)
}

#[cfg(test)]
#[path = "attachments_tests.rs"]
mod tests;
