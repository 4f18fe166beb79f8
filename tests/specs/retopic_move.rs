// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;

use crate::support::{patch_json, post_json, Daemon};

#[tokio::test]
async fn move_topic_one_emits_dual_scope_event() {
    let daemon = Daemon::start().await;
    let client = reqwest::Client::new();
    let token = daemon.auth_token.clone();

    let (_, channel) =
        post_json(&client, daemon.url("/api/v1/channels"), Some(&token), json!({"name": "general"})).await;
    let channel_id = channel["id"].as_str().unwrap().to_string();

    let (_, t1) = post_json(
        &client,
        daemon.url("/api/v1/topics"),
        Some(&token),
        json!({"channel_id": channel_id, "title": "t1"}),
    )
    .await;
    let t1_id = t1["id"].as_str().unwrap().to_string();

    let (_, t2) = post_json(
        &client,
        daemon.url("/api/v1/topics"),
        Some(&token),
        json!({"channel_id": channel_id, "title": "t2"}),
    )
    .await;
    let t2_id = t2["id"].as_str().unwrap().to_string();

    let (_, message) = post_json(
        &client,
        daemon.url("/api/v1/messages"),
        Some(&token),
        json!({"topic_id": t1_id, "sender": "a", "content_raw": "hello"}),
    )
    .await;
    let message_id = message["id"].as_str().unwrap().to_string();

    let (status, moved) = patch_json(
        &client,
        daemon.url(&format!("/api/v1/messages/{message_id}")),
        &token,
        json!({"op": "move_topic", "to_topic_id": t2_id, "mode": "one"}),
    )
    .await;
    assert_eq!(status, 200);
    let moved_rows = moved.as_array().expect("move_topic returns a batch of rows");
    assert_eq!(moved_rows.len(), 1);
    assert_eq!(moved_rows[0]["topic_id"], t2_id);

    let events = client
        .get(daemon.url("/api/v1/events?after=0&limit=100"))
        .send()
        .await
        .expect("list events")
        .json::<serde_json::Value>()
        .await
        .expect("parse events");
    let moved_event = events
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["name"] == "message.moved_topic")
        .expect("a message.moved_topic event was published");
    assert_eq!(moved_event["scope_topic_id"], t2_id);
    assert_eq!(moved_event["scope_topic_id2"], t1_id);
}
