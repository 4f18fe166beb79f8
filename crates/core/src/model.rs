// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain entities: channels, topics, messages, attachments, enrichments,
//! events, and the workspace's own identity record.

use serde::{Deserialize, Serialize};

use crate::define_id;
use crate::limits::{CHANNEL_NAME_MAX_CHARS, TOPIC_TITLE_MAX_CHARS};

define_id! {
    pub struct ChannelId("cha-");
}

define_id! {
    pub struct TopicId("top-");
}

define_id! {
    pub struct MessageId("msg-");
}

define_id! {
    pub struct AttachmentId("att-");
}

define_id! {
    pub struct EnrichmentId("enr-");
}

/// A named conversation scope. The coarsest grouping in the hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: i64,
}

impl Channel {
    /// `name` must be 1..=100 chars; enforced here rather than at the
    /// HTTP boundary so the store's direct callers (plugins, CLI) get it too.
    pub fn validate_name(name: &str) -> Result<(), String> {
        let len = name.chars().count();
        if len == 0 || len > CHANNEL_NAME_MAX_CHARS {
            return Err(format!(
                "channel name must be 1..={} chars, got {}",
                CHANNEL_NAME_MAX_CHARS, len
            ));
        }
        Ok(())
    }
}

/// A thread of messages within a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub channel_id: ChannelId,
    pub title: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Topic {
    pub fn validate_title(title: &str) -> Result<(), String> {
        let len = title.chars().count();
        if len == 0 || len > TOPIC_TITLE_MAX_CHARS {
            return Err(format!(
                "topic title must be 1..={} chars, got {}",
                TOPIC_TITLE_MAX_CHARS, len
            ));
        }
        Ok(())
    }
}

/// A single message within a topic. `channel_id` is denormalized from the
/// topic for scope-filtered queries and cross-channel-move rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub topic_id: TopicId,
    pub channel_id: ChannelId,
    pub sender: String,
    pub content_raw: String,
    /// Optimistic-concurrency version, starts at 1 and increments on every edit.
    pub version: i64,
    pub created_at: i64,
    pub edited_at: Option<i64>,
    pub deleted_at: Option<i64>,
    pub deleted_by: Option<String>,
}

impl Message {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A piece of structured data (e.g. a pinned link, a file reference) attached
/// to a topic, deduplicated by `dedupe_key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: AttachmentId,
    pub topic_id: TopicId,
    pub kind: String,
    pub key: Option<String>,
    pub value_json: serde_json::Value,
    /// Identity for idempotent upsert: `(topic_id, kind, key.unwrap_or(""))`
    /// when the caller omits an explicit one.
    pub dedupe_key: String,
    pub source_message_id: Option<MessageId>,
    pub created_at: i64,
}

/// A plugin-produced annotation over a span of a message's raw content
/// (e.g. a detected URL, an extracted entity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrichment {
    pub id: EnrichmentId,
    pub message_id: MessageId,
    pub kind: String,
    pub span_start: i64,
    pub span_end: i64,
    pub data_json: serde_json::Value,
    pub created_at: i64,
}

impl Enrichment {
    pub fn validate_span(start: i64, end: i64) -> Result<(), String> {
        if start < 0 || end <= start {
            return Err(format!("invalid enrichment span [{start}, {end})"));
        }
        Ok(())
    }
}

/// An append-only log entry. `event_id` is a monotonically increasing
/// per-database sequence number, not a random ID, so replay can resume from
/// a `since` cursor with a plain `WHERE event_id > ?` scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: i64,
    pub ts: i64,
    pub name: String,
    pub scope_channel_id: Option<ChannelId>,
    pub scope_topic_id: Option<TopicId>,
    /// Second topic scope, used only by `topic.retopic` to notify the
    /// destination topic as well as the source.
    pub scope_topic_id2: Option<TopicId>,
    pub entity_type: String,
    pub entity_id: String,
    pub data_json: serde_json::Value,
}

/// One row, written once at database creation, identifying this workspace's
/// database instance for daemon handoff and `agentlip status` verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceMeta {
    pub schema_version: i64,
    pub db_id: String,
    pub created_at: i64,
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
