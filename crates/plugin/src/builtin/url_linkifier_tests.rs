// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::protocol::PluginKind;

fn request(content: &str) -> WorkerRequest {
    WorkerRequest {
        plugin_name: "url-linkifier".to_string(),
        kind: PluginKind::Linkifier,
        message_id: "msg-1".to_string(),
        content_raw: content.to_string(),
        config: serde_json::json!({}),
    }
}

#[test]
fn finds_a_single_url_with_correct_span() {
    let content = "see https://example.com/path for details";
    let response = run(&request(content));
    match response {
        WorkerResponse::Linkifier { items } => {
            assert_eq!(items.len(), 1);
            let item = &items[0];
            assert_eq!(&content[item.span.start as usize..item.span.end as usize], "https://example.com/path");
        }
        other => panic!("expected Linkifier, got {other:?}"),
    }
}

#[test]
fn finds_multiple_urls_in_order() {
    let content = "http://a.example and https://b.example";
    let response = run(&request(content));
    match response {
        WorkerResponse::Linkifier { items } => assert_eq!(items.len(), 2),
        other => panic!("expected Linkifier, got {other:?}"),
    }
}

#[test]
fn no_urls_returns_empty_items() {
    let response = run(&request("just some text"));
    match response {
        WorkerResponse::Linkifier { items } => assert!(items.is_empty()),
        other => panic!("expected Linkifier, got {other:?}"),
    }
}
