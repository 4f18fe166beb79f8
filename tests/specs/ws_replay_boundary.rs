// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives `/ws` with a real client instead of asserting against
//! `hub_storage::store::replay` directly, so a regression in how the
//! handshake stitches the replay and live phases together — not just in
//! the SQL underneath — would show up here.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::support::{post_json, Daemon};

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// `channel.created` itself is a channel-scoped event, so the seed phase is
/// one event ahead of the 100 topics it creates.
const SEED_TOPICS: i64 = 100;
const LIVE_TOPICS: i64 = 50;

#[tokio::test]
async fn replay_and_live_events_are_disjoint_and_gapless() {
    let daemon = Daemon::start().await;
    let client = reqwest::Client::new();
    let token = daemon.auth_token.clone();

    let (_, channel) =
        post_json(&client, daemon.url("/api/v1/channels"), Some(&token), json!({"name": "ch1"})).await;
    let channel_id = channel["id"].as_str().unwrap().to_string();

    for i in 0..SEED_TOPICS {
        let (status, _) = post_json(
            &client,
            daemon.url("/api/v1/topics"),
            Some(&token),
            json!({"channel_id": channel_id, "title": format!("seed-{i}")}),
        )
        .await;
        assert_eq!(status, 201);
    }
    let replay_until = 1 + SEED_TOPICS; // channel.created + the 100 topics above

    let ws_url = format!("{}/ws?token={}", daemon.base_url.replacen("http", "ws", 1), token);
    let (mut socket, _) = tokio_tungstenite::connect_async(&ws_url).await.expect("connect ws");

    let hello = json!({
        "type": "hello",
        "after_event_id": 0,
        "subscriptions": {"channels": [channel_id]},
    });
    socket.send(WsMessage::Text(hello.to_string())).await.expect("send hello");

    let hello_ok = next_frame(&mut socket).await;
    assert_eq!(hello_ok["type"], "hello_ok");
    assert_eq!(hello_ok["replay_until"], replay_until);

    // Fire the live batch from a separate task so it races the replay send
    // instead of waiting for it — the scenario this test exists for.
    let channel_id_live = channel_id.clone();
    let token_live = token.clone();
    let base_url = daemon.base_url.clone();
    let live_client = client.clone();
    let live_writer = tokio::spawn(async move {
        for i in 0..LIVE_TOPICS {
            let (status, _) = post_json(
                &live_client,
                format!("{base_url}/api/v1/topics"),
                Some(&token_live),
                json!({"channel_id": channel_id_live, "title": format!("live-{i}")}),
            )
            .await;
            assert_eq!(status, 201);
        }
    });

    let expected_total = replay_until + LIVE_TOPICS;
    let mut seen = Vec::new();
    while (seen.len() as i64) < expected_total {
        let frame = tokio::time::timeout(Duration::from_secs(10), next_frame(&mut socket))
            .await
            .expect("event frame within deadline");
        assert_eq!(frame["type"], "event");
        seen.push(frame["event_id"].as_i64().expect("event_id is an integer"));
    }

    live_writer.await.expect("live writer task panicked");

    for pair in seen.windows(2) {
        assert!(pair[0] < pair[1], "event_id must strictly increase across replay and live: {pair:?}");
    }
    assert_eq!(seen.first(), Some(&1));
    assert_eq!(seen.last(), Some(&expected_total));
    assert_eq!(seen.len(), expected_total as usize);

    let replay_ids = seen.iter().filter(|&&id| id <= replay_until).count();
    assert_eq!(replay_ids as i64, replay_until, "replay phase must deliver every event up to replay_until exactly once");
}

async fn next_frame(socket: &mut Socket) -> Value {
    loop {
        match socket.next().await {
            Some(Ok(WsMessage::Text(text))) => return serde_json::from_str(&text).expect("frame is JSON"),
            Some(Ok(WsMessage::Ping(_))) => continue,
            other => panic!("unexpected ws message: {other:?}"),
        }
    }
}
