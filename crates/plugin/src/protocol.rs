// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The RPC shape exchanged with a plugin worker over the length-prefixed
//! JSON framing in `hub_wire::frame`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginKind {
    Linkifier,
    Extractor,
}

/// Path-blind by construction: only the message's own fields and the
/// plugin's own config cross the wire, never the workspace directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub plugin_name: String,
    pub kind: PluginKind,
    pub message_id: String,
    pub content_raw: String,
    pub config: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkifierSpan {
    pub start: i64,
    pub end: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkifierOutputItem {
    pub kind: String,
    pub span: LinkifierSpan,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorOutputItem {
    pub kind: String,
    #[serde(default)]
    pub key: Option<String>,
    pub value_json: serde_json::Value,
    #[serde(default)]
    pub dedupe_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkerResponse {
    Linkifier { items: Vec<LinkifierOutputItem> },
    Extractor { items: Vec<ExtractorOutputItem> },
    Error { message: String },
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
