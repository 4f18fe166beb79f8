// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;

use crate::support::{patch_json, post_json, Daemon};

#[tokio::test]
async fn move_topic_across_channels_is_rejected() {
    let daemon = Daemon::start().await;
    let client = reqwest::Client::new();
    let token = daemon.auth_token.clone();

    let (_, channel_a) =
        post_json(&client, daemon.url("/api/v1/channels"), Some(&token), json!({"name": "a"})).await;
    let channel_a_id = channel_a["id"].as_str().unwrap().to_string();

    let (_, channel_b) =
        post_json(&client, daemon.url("/api/v1/channels"), Some(&token), json!({"name": "b"})).await;
    let channel_b_id = channel_b["id"].as_str().unwrap().to_string();

    let (_, topic_a) = post_json(
        &client,
        daemon.url("/api/v1/topics"),
        Some(&token),
        json!({"channel_id": channel_a_id, "title": "t_a"}),
    )
    .await;
    let topic_a_id = topic_a["id"].as_str().unwrap().to_string();

    let (_, topic_b) = post_json(
        &client,
        daemon.url("/api/v1/topics"),
        Some(&token),
        json!({"channel_id": channel_b_id, "title": "t_b"}),
    )
    .await;
    let topic_b_id = topic_b["id"].as_str().unwrap().to_string();

    let (_, message) = post_json(
        &client,
        daemon.url("/api/v1/messages"),
        Some(&token),
        json!({"topic_id": topic_a_id, "sender": "a", "content_raw": "hello"}),
    )
    .await;
    let message_id = message["id"].as_str().unwrap().to_string();

    let (status, rejection) = patch_json(
        &client,
        daemon.url(&format!("/api/v1/messages/{message_id}")),
        &token,
        json!({"op": "move_topic", "to_topic_id": topic_b_id, "mode": "one"}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(rejection["code"], "CROSS_CHANNEL_MOVE");

    let messages = client
        .get(daemon.url(&format!("/api/v1/messages?topic_id={topic_a_id}")))
        .send()
        .await
        .expect("list messages")
        .json::<serde_json::Value>()
        .await
        .expect("parse messages");
    let rows = messages.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], message_id);
    assert_eq!(rows[0]["version"], 1);
}
