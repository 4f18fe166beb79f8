// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn dispatch_routes_to_url_linkifier() {
    let request = WorkerRequest {
        plugin_name: "url-linkifier".to_string(),
        kind: PluginKind::Linkifier,
        message_id: "msg-1".to_string(),
        content_raw: "https://example.com".to_string(),
        config: serde_json::json!({}),
    };
    assert!(matches!(dispatch(&request), WorkerResponse::Linkifier { .. }));
}

#[test]
fn dispatch_rejects_unknown_plugin_name() {
    let request = WorkerRequest {
        plugin_name: "does-not-exist".to_string(),
        kind: PluginKind::Linkifier,
        message_id: "msg-1".to_string(),
        content_raw: String::new(),
        config: serde_json::json!({}),
    };
    assert!(matches!(dispatch(&request), WorkerResponse::Error { .. }));
}
