// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;

use crate::support::{patch_json, post_json, Daemon};

/// Delay injected into the worker subprocess so the ABA edit race below has
/// a window to land before the plugin's output comes back.
const PLUGIN_DELAY_MS: &str = "500";

#[tokio::test]
async fn edit_during_slow_plugin_run_is_discarded_as_stale() {
    let daemon = Daemon::start_with_env(&[("AGENTLIP_PLUGIN_TEST_DELAY_MS", PLUGIN_DELAY_MS)]).await;
    let client = reqwest::Client::new();
    let token = daemon.auth_token.clone();

    let (_, channel) =
        post_json(&client, daemon.url("/api/v1/channels"), Some(&token), json!({"name": "general"})).await;
    let channel_id = channel["id"].as_str().unwrap().to_string();

    let (_, topic) = post_json(
        &client,
        daemon.url("/api/v1/topics"),
        Some(&token),
        json!({"channel_id": channel_id, "title": "t"}),
    )
    .await;
    let topic_id = topic["id"].as_str().unwrap().to_string();

    // Content carries a URL so both bundled plugins have something to
    // produce — otherwise a no-op enrichment/extraction would pass the
    // staleness check trivially and prove nothing.
    let (status, message) = post_json(
        &client,
        daemon.url("/api/v1/messages"),
        Some(&token),
        json!({"topic_id": topic_id, "sender": "a", "content_raw": "see http://example.com hello"}),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(message["version"], 1);
    let message_id = message["id"].as_str().unwrap().to_string();

    // The pipeline run this message just triggered is in flight, sleeping
    // inside the worker per AGENTLIP_PLUGIN_TEST_DELAY_MS above — land the
    // ABA edit (v1 -> v2 -> v3, ending on the exact content the snapshot
    // captured) while it's still asleep.
    let (status, edited) = patch_json(
        &client,
        daemon.url(&format!("/api/v1/messages/{message_id}")),
        &token,
        json!({"op": "edit", "content_raw": "x", "expected_version": 1}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(edited["version"], 2);

    let (status, reverted) = patch_json(
        &client,
        daemon.url(&format!("/api/v1/messages/{message_id}")),
        &token,
        json!({"op": "edit", "content_raw": "see http://example.com hello", "expected_version": 2}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(reverted["version"], 3);

    // Give the delayed worker time to return and the guarded commit to run.
    tokio::time::sleep(std::time::Duration::from_millis(1500)).await;

    let events: serde_json::Value = client
        .get(daemon.url("/api/v1/events?after=0&limit=100"))
        .send()
        .await
        .expect("list events")
        .json()
        .await
        .expect("parse events");
    let enriched = events
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["name"] == "message.enriched" && e["entity_id"] == message_id);
    assert!(!enriched, "a stale guarded commit must never publish message.enriched");

    let messages: serde_json::Value = client
        .get(daemon.url(&format!("/api/v1/messages?topic_id={topic_id}")))
        .send()
        .await
        .expect("list messages")
        .json()
        .await
        .expect("parse messages");
    let current = messages
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["id"] == message_id)
        .expect("message still present");
    assert_eq!(current["version"], 3);
    assert_eq!(current["content_raw"], "see http://example.com hello");
}
