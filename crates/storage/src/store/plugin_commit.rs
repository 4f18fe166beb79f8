// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The staleness-guarded commit: the transactional boundary where plugin
//! output either lands atomically alongside its derived event, or is
//! silently discarded because the message moved on while the plugin ran.

use hub_core::limits::ATTACHMENT_VALUE_MAX_BYTES;
use hub_core::{EnrichmentId, HubError, MessageId};
use rusqlite::Connection;
use serde_json::Value as Json;

use super::events::append_event;
use super::{attachments, enrichments, messages};

/// The `(message_id, content_raw, version)` tuple captured before a plugin
/// runs, re-checked here before its output is allowed to land.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub message_id: MessageId,
    pub content_raw: String,
    pub version: i64,
}

/// Why a guarded commit was discarded. Never surfaced as an HTTP error;
/// the caller logs it and moves on (see `EXECUTION_ERROR` vs. these in
/// DESIGN.md — staleness is not a plugin failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StalenessReason {
    Missing,
    Deleted,
    StaleVersion,
    StaleContent,
}

pub struct LinkifierItem {
    pub kind: String,
    pub span_start: i64,
    pub span_end: i64,
    pub data_json: Json,
}

pub struct ExtractorItem {
    pub kind: String,
    pub key: Option<String>,
    pub value_json: Json,
    /// Caller-supplied identity token. Falls back to
    /// `value_json.to_string()` when absent (see the ordering-sensitivity
    /// Open Question recorded in DESIGN.md).
    pub dedupe_key: Option<String>,
}

fn check_snapshot(conn: &Connection, snapshot: &Snapshot) -> Result<Option<StalenessReason>, HubError> {
    let current = match messages::get(conn, &snapshot.message_id)? {
        Some(m) => m,
        None => return Ok(Some(StalenessReason::Missing)),
    };
    if current.deleted_at.is_some() {
        return Ok(Some(StalenessReason::Deleted));
    }
    if current.version != snapshot.version {
        return Ok(Some(StalenessReason::StaleVersion));
    }
    if current.content_raw != snapshot.content_raw {
        return Ok(Some(StalenessReason::StaleContent));
    }
    Ok(None)
}

/// Commit linkifier output: one `enrichments` row per item, then one
/// aggregated `message.enriched` event naming every inserted enrichment id.
/// Empty `items` is a legal success that commits nothing.
pub fn commit_linkifier_output(
    conn: &mut Connection,
    snapshot: &Snapshot,
    plugin_name: &str,
    items: Vec<LinkifierItem>,
    now_ms: i64,
) -> Result<Result<Vec<EnrichmentId>, StalenessReason>, HubError> {
    let tx = conn.transaction()?;
    if let Some(reason) = check_snapshot(&tx, snapshot)? {
        tx.commit()?;
        return Ok(Err(reason));
    }
    if items.is_empty() {
        tx.commit()?;
        return Ok(Ok(Vec::new()));
    }

    let message = messages::get(&tx, &snapshot.message_id)?
        .ok_or_else(|| HubError::Internal("message vanished after staleness check".into()))?;

    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        let enrichment = enrichments::insert_tx(
            &tx,
            &snapshot.message_id,
            &item.kind,
            item.span_start,
            item.span_end,
            &item.data_json,
            now_ms,
        )?;
        ids.push(enrichment.id);
    }

    append_event(
        &tx,
        now_ms,
        "message.enriched",
        Some(message.channel_id.as_str()),
        Some(message.topic_id.as_str()),
        None,
        "message",
        message.id.as_str(),
        &serde_json::json!({ "plugin": plugin_name, "enrichment_ids": ids }),
    )?;
    tx.commit()?;
    Ok(Ok(ids))
}

/// Commit extractor output: idempotent attachment upsert per item, emitting
/// `topic.attachment_added` only for rows that were actually newly inserted.
pub fn commit_extractor_output(
    conn: &mut Connection,
    snapshot: &Snapshot,
    items: Vec<ExtractorItem>,
    now_ms: i64,
) -> Result<Result<Vec<hub_core::AttachmentId>, StalenessReason>, HubError> {
    {
        if let Some(reason) = check_snapshot(conn, snapshot)? {
            return Ok(Err(reason));
        }
    }
    if items.is_empty() {
        return Ok(Ok(Vec::new()));
    }

    let message = messages::get(conn, &snapshot.message_id)?
        .ok_or_else(|| HubError::Internal("message vanished after staleness check".into()))?;

    let mut inserted = Vec::new();
    for item in items {
        let value_raw = item.value_json.to_string();
        if value_raw.len() > ATTACHMENT_VALUE_MAX_BYTES {
            return Err(HubError::PayloadTooLarge(format!(
                "extractor value_json exceeds {ATTACHMENT_VALUE_MAX_BYTES} bytes"
            )));
        }
        let dedupe_key = item.dedupe_key.clone().unwrap_or_else(|| value_raw.clone());

        let mutation = attachments::create(
            conn,
            &message.topic_id,
            &item.kind,
            item.key.as_deref(),
            &item.value_json,
            &dedupe_key,
            Some(&snapshot.message_id),
            now_ms,
        )?;
        if mutation.event_id.is_some() {
            inserted.push(mutation.row.id);
        }
    }
    Ok(Ok(inserted))
}

#[cfg(test)]
#[path = "plugin_commit_tests.rs"]
mod tests;
