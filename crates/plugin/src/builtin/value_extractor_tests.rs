// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::protocol::PluginKind;

fn request(content: &str) -> WorkerRequest {
    WorkerRequest {
        plugin_name: "value-extractor".to_string(),
        kind: PluginKind::Extractor,
        message_id: "msg-1".to_string(),
        content_raw: content.to_string(),
        config: serde_json::json!({}),
    }
}

#[test]
fn extracts_one_attachment_per_url() {
    let response = run(&request("visit https://example.com/a"));
    match response {
        WorkerResponse::Extractor { items } => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].kind, "link");
            assert_eq!(items[0].dedupe_key.as_deref(), Some("https://example.com/a"));
        }
        other => panic!("expected Extractor, got {other:?}"),
    }
}

#[test]
fn no_urls_yields_empty_extraction() {
    let response = run(&request("nothing here"));
    match response {
        WorkerResponse::Extractor { items } => assert!(items.is_empty()),
        other => panic!("expected Extractor, got {other:?}"),
    }
}
