// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request/response bodies for the `/api/v1` HTTP surface.
//!
//! These are pure data shapes; validation and dispatch live in `hub-daemon`.

use hub_core::{AttachmentId, ChannelId, MessageId, TopicId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateChannelRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTopicRequest {
    pub channel_id: ChannelId,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatchTopicRequest {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMessageRequest {
    pub topic_id: TopicId,
    pub sender: String,
    pub content_raw: String,
}

/// The three `PATCH /messages/:id` shapes collapse into one body; `op`
/// selects which of the optional fields are required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchMessageOp {
    Edit,
    Delete,
    MoveTopic,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatchMessageRequest {
    pub op: PatchMessageOp,
    #[serde(default)]
    pub content_raw: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub to_topic_id: Option<TopicId>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub expected_version: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAttachmentRequest {
    pub kind: String,
    #[serde(default)]
    pub key: Option<String>,
    pub value_json: serde_json::Value,
    #[serde(default)]
    pub dedupe_key: Option<String>,
    #[serde(default)]
    pub source_message_id: Option<MessageId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageQuery {
    pub channel_id: Option<ChannelId>,
    pub topic_id: Option<TopicId>,
    pub limit: Option<i64>,
    pub before_id: Option<MessageId>,
    pub after_id: Option<MessageId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentQuery {
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsQuery {
    pub after: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub instance_id: String,
    pub db_id: String,
    pub schema_version: i64,
    pub protocol_version: String,
    pub pid: u32,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttachmentIdView {
    pub id: AttachmentId,
    pub event_id: Option<i64>,
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
