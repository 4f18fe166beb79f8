// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;

use crate::support::{patch_json, post_json, Daemon};

#[tokio::test]
async fn edit_with_stale_expected_version_is_rejected() {
    let daemon = Daemon::start().await;
    let client = reqwest::Client::new();
    let token = daemon.auth_token.clone();

    let (status, channel) = post_json(
        &client,
        daemon.url("/api/v1/channels"),
        Some(&token),
        json!({"name": "general"}),
    )
    .await;
    assert_eq!(status, 201);
    let channel_id = channel["id"].as_str().unwrap().to_string();

    let (status, topic) = post_json(
        &client,
        daemon.url("/api/v1/topics"),
        Some(&token),
        json!({"channel_id": channel_id, "title": "t"}),
    )
    .await;
    assert_eq!(status, 201);
    let topic_id = topic["id"].as_str().unwrap().to_string();

    let (status, message) = post_json(
        &client,
        daemon.url("/api/v1/messages"),
        Some(&token),
        json!({"topic_id": topic_id, "sender": "a", "content_raw": "hello"}),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(message["version"], 1);
    let message_id = message["id"].as_str().unwrap().to_string();

    let (status, edited) = patch_json(
        &client,
        daemon.url(&format!("/api/v1/messages/{message_id}")),
        &token,
        json!({"op": "edit", "content_raw": "bye", "expected_version": 1}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(edited["version"], 2);
    assert_eq!(edited["content_raw"], "bye");

    let (status, conflict) = patch_json(
        &client,
        daemon.url(&format!("/api/v1/messages/{message_id}")),
        &token,
        json!({"op": "edit", "content_raw": "!", "expected_version": 1}),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(conflict["code"], "VERSION_CONFLICT");
    assert_eq!(conflict["details"]["current"], 2);
}
