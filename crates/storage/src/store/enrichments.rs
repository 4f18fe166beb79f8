// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Enrichment rows. Only ever inserted by the plugin pipeline's
//! staleness-guarded commit (see [`crate::store::plugin_commit`]); there is
//! no standalone `create` here because an enrichment never exists without a
//! linkifier run that validated its span first.

use hub_core::{Enrichment, EnrichmentId, HubError, MessageId};
use rusqlite::{params, Connection, Row, Transaction};

fn row_to_enrichment(row: &Row<'_>) -> rusqlite::Result<Enrichment> {
    let data_raw: String = row.get("data_json")?;
    Ok(Enrichment {
        id: EnrichmentId::from_string(row.get::<_, String>("id")?),
        message_id: MessageId::from_string(row.get::<_, String>("message_id")?),
        kind: row.get("kind")?,
        span_start: row.get("span_start")?,
        span_end: row.get("span_end")?,
        data_json: serde_json::from_str(&data_raw).unwrap_or(serde_json::Value::Null),
        created_at: row.get("created_at")?,
    })
}

/// Insert one enrichment row within an already-open transaction.
pub(crate) fn insert_tx(
    tx: &Transaction<'_>,
    message_id: &MessageId,
    kind: &str,
    span_start: i64,
    span_end: i64,
    data_json: &serde_json::Value,
    now_ms: i64,
) -> Result<Enrichment, HubError> {
    if kind.trim().is_empty() {
        return Err(HubError::InvalidInput("enrichment kind must be non-empty".into()));
    }
    Enrichment::validate_span(span_start, span_end).map_err(HubError::InvalidInput)?;

    let id = EnrichmentId::new();
    tx.execute(
        "INSERT INTO enrichments (id, message_id, kind, span_start, span_end, data_json, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id.as_str(),
            message_id.as_str(),
            kind,
            span_start,
            span_end,
            data_json.to_string(),
            now_ms,
        ],
    )?;
    Ok(Enrichment {
        id,
        message_id: message_id.clone(),
        kind: kind.to_string(),
        span_start,
        span_end,
        data_json: data_json.clone(),
        created_at: now_ms,
    })
}

pub fn list_by_message(conn: &Connection, message_id: &MessageId) -> Result<Vec<Enrichment>, HubError> {
    let mut stmt = conn.prepare(
        "SELECT id, message_id, kind, span_start, span_end, data_json, created_at
         FROM enrichments WHERE message_id = ?1 ORDER BY span_start ASC",
    )?;
    let rows = stmt
        .query_map(params![message_id.as_str()], row_to_enrichment)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

#[cfg(test)]
#[path = "enrichments_tests.rs"]
mod tests;
