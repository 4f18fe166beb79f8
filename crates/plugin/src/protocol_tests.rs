// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn worker_request_serializes_kind_as_snake_case() {
    let req = WorkerRequest {
        plugin_name: "url-linkifier".to_string(),
        kind: PluginKind::Linkifier,
        message_id: "msg-1".to_string(),
        content_raw: "see https://example.com".to_string(),
        config: serde_json::json!({}),
    };
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["kind"], "linkifier");
}

#[test]
fn worker_response_round_trips_linkifier_items() {
    let response = WorkerResponse::Linkifier {
        items: vec![LinkifierOutputItem {
            kind: "url".to_string(),
            span: LinkifierSpan { start: 4, end: 23 },
            data: serde_json::json!({ "url": "https://example.com" }),
        }],
    };
    let json = serde_json::to_string(&response).unwrap();
    let back: WorkerResponse = serde_json::from_str(&json).unwrap();
    match back {
        WorkerResponse::Linkifier { items } => assert_eq!(items.len(), 1),
        other => panic!("expected Linkifier, got {other:?}"),
    }
}
