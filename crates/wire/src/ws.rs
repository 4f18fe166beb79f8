// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket fanout frame shapes (`/ws`, protocol `v1`).
//!
//! `hello` / `hello_ok` is the handshake; everything after is an `event`
//! frame, replay and live, in strictly increasing `event_id`.

use hub_core::{ChannelId, TopicId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Subscriptions {
    #[serde(default)]
    pub channels: Option<Vec<ChannelId>>,
    #[serde(default)]
    pub topics: Option<Vec<TopicId>>,
}

/// The client's required first frame. Anything else first → close 1003.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    Hello {
        after_event_id: i64,
        #[serde(default)]
        subscriptions: Option<Subscriptions>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[allow(clippy::large_enum_variant)]
pub enum ServerFrame {
    HelloOk {
        replay_until: i64,
        instance_id: String,
    },
    Event {
        event_id: i64,
        ts: i64,
        name: String,
        scope: EventScope,
        data: serde_json::Value,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct EventScope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<ChannelId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<TopicId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id2: Option<TopicId>,
}

/// Close codes the fanout uses; matches RFC 6455 + the app-specific ones
/// named in the routing table (1008 backpressure, 1009 oversized frame).
pub mod close_code {
    pub const SHUTDOWN: u16 = 1001;
    pub const PROTOCOL_VIOLATION: u16 = 1003;
    pub const BACKPRESSURE: u16 = 1008;
    pub const MESSAGE_TOO_LARGE: u16 = 1009;
    pub const INTERNAL_ERROR: u16 = 1011;
}

#[cfg(test)]
#[path = "ws_tests.rs"]
mod tests;
