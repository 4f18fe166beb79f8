// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;

use crate::support::{post_json, Daemon};

#[tokio::test]
async fn repeated_attachment_insert_is_a_no_op() {
    let daemon = Daemon::start().await;
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

    let body = json!({
        "kind": "file",
        "key": "readme.md",
        "value_json": {"path": "/tmp/readme.md", "size": 1024},
        "dedupe_key": "file:/tmp/readme.md",
    });

    let (status, first) =
        post_json(&client, daemon.url(&format!("/api/v1/topics/{topic_id}/attachments")), Some(&token), body.clone())
            .await;
    assert_eq!(status, 201);
    assert!(!first["event_id"].is_null());
    let attachment_id = first["id"].as_str().unwrap().to_string();

    let (status, second) =
        post_json(&client, daemon.url(&format!("/api/v1/topics/{topic_id}/attachments")), Some(&token), body).await;
    assert_eq!(status, 200);
    assert_eq!(second["id"], attachment_id);
    assert!(second["event_id"].is_null());

    let list = client
        .get(daemon.url(&format!("/api/v1/topics/{topic_id}/attachments")))
        .send()
        .await
        .expect("list attachments");
    let attachments: serde_json::Value = list.json().await.expect("parse attachments");
    assert_eq!(attachments.as_array().unwrap().len(), 1);
}
