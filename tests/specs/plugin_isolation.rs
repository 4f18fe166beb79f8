// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives the filesystem guard and circuit breaker through the real
//! worker-process boundary, not as a unit test against `hub_plugin`
//! directly: `AGENTLIP_FS_GUARD_PROBE_PATH` makes every plugin invocation
//! attempt a write under the workspace marker before it runs its own logic,
//! the same call site a misbehaving real plugin would hit.

use serde_json::json;

use crate::support::{post_json, Daemon};

#[tokio::test]
async fn guarded_write_fails_closed_and_commits_nothing() {
    let daemon = Daemon::start_with_env(&[
        ("AGENTLIP_FS_GUARD_PROBE_PATH", "contraband/.agentlip/db.sqlite3"),
        // One failure is enough to open the circuit, so the second message
        // below demonstrates the breaker is actually latched, not just that
        // a single invocation happened to fail.
        ("AGENTLIP_CIRCUIT_THRESHOLD", "1"),
    ])
    .await;
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

    // Content carries a URL: absent the guard, both bundled plugins would
    // have real output to commit, so an empty result here is meaningful.
    for content in ["see http://example.com first", "see http://example.org second"] {
        let (status, message) = post_json(
            &client,
            daemon.url("/api/v1/messages"),
            Some(&token),
            json!({"topic_id": topic_id, "sender": "a", "content_raw": content}),
        )
        .await;
        assert_eq!(status, 201);
        let message_id = message["id"].as_str().unwrap().to_string();

        tokio::time::sleep(std::time::Duration::from_millis(300)).await;

        let events: serde_json::Value = client
            .get(daemon.url("/api/v1/events?after=0&limit=200"))
            .send()
            .await
            .expect("list events")
            .json()
            .await
            .expect("parse events");
        // `message.enriched` carries the message's own id as entity_id;
        // `topic.attachment_added` carries the attachment's id instead, but
        // nothing in this test ever creates an attachment through any other
        // route, so any occurrence at all would have to be a leak from the
        // blocked extractor.
        let committed = events.as_array().unwrap().iter().any(|e| {
            (e["name"] == "message.enriched" && e["entity_id"] == message_id)
                || e["name"] == "topic.attachment_added"
        });
        assert!(!committed, "a write blocked by the filesystem guard must leave no partial state");
    }
}
