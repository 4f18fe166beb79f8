// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `/ws` upgrade: token query-param auth before the upgrade, then the
//! hello/hello_ok handshake, replay, and live phase described in
//! `hub_wire::ws`. Socket I/O lives here; connection bookkeeping lives in
//! [`crate::fanout`] — this module only ever calls `register`/`unregister`.

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use hub_core::limits::{EVENT_REPLAY_BATCH_MAX, WS_FRAME_MAX_BYTES};
use hub_wire::{close_code, ClientFrame, ServerFrame};

use crate::auth::constant_time_eq;
use crate::fanout::Filter;
use crate::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    token: Option<String>,
}

pub async fn upgrade(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> Response {
    if state.is_shutting_down() {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    match query.token {
        Some(token) if constant_time_eq(&state.server_info.auth_token, &token) => {
            ws.on_upgrade(move |socket| handle_socket(socket, state))
        }
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn close_with(socket: &mut WebSocket, code: u16, reason: &'static str) {
    let _ = socket.send(Message::Close(Some(CloseFrame { code, reason: reason.into() }))).await;
}

async fn send_frame(socket: &mut WebSocket, frame: &ServerFrame) -> Result<(), axum::Error> {
    let text = serde_json::to_string(frame).map_err(axum::Error::new)?;
    socket.send(Message::Text(text)).await
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let first_text = match tokio::time::timeout(crate::env::handshake_timeout(), socket.recv()).await {
        Ok(Some(Ok(Message::Text(text)))) => text,
        Ok(Some(Ok(Message::Close(_)))) | Ok(None) | Err(_) => return,
        _ => {
            close_with(&mut socket, close_code::PROTOCOL_VIOLATION, "expected text hello frame").await;
            return;
        }
    };

    if first_text.len() > WS_FRAME_MAX_BYTES {
        close_with(&mut socket, close_code::MESSAGE_TOO_LARGE, "hello frame exceeds frame limit").await;
        return;
    }

    let ClientFrame::Hello { after_event_id, subscriptions } = match serde_json::from_str(&first_text) {
        Ok(frame) => frame,
        Err(_) => {
            close_with(&mut socket, close_code::PROTOCOL_VIOLATION, "malformed hello frame").await;
            return;
        }
    };

    let filter = Filter::from_subscriptions(subscriptions);

    let replay_until = match state.store.latest_event_id() {
        Ok(id) => id,
        Err(_) => {
            close_with(&mut socket, close_code::INTERNAL_ERROR, "failed to read event log").await;
            return;
        }
    };

    let registration = state.fanout.register(filter.clone());
    let mut receiver = registration.receiver;

    if send_frame(
        &mut socket,
        &ServerFrame::HelloOk { replay_until, instance_id: state.server_info.instance_id.clone() },
    )
    .await
    .is_err()
    {
        state.fanout.unregister(registration.id);
        return;
    }

    if !matches!(filter, Filter::None) {
        let (channel_ids, topic_ids) = match &filter {
            Filter::Scoped { channels, topics } => {
                (channels.iter().cloned().collect::<Vec<_>>(), topics.iter().cloned().collect::<Vec<_>>())
            }
            _ => (Vec::new(), Vec::new()),
        };
        let replay = match state.store.replay(after_event_id, replay_until, &channel_ids, &topic_ids, EVENT_REPLAY_BATCH_MAX) {
            Ok(events) => events,
            Err(_) => {
                close_with(&mut socket, close_code::INTERNAL_ERROR, "replay failed").await;
                state.fanout.unregister(registration.id);
                return;
            }
        };
        for event in &replay {
            if send_frame(&mut socket, &crate::fanout::to_server_frame(event)).await.is_err() {
                state.fanout.unregister(registration.id);
                return;
            }
        }
    }

    let mut shutdown_rx = state.fanout.subscribe_shutdown();

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                close_with(&mut socket, close_code::SHUTDOWN, "server shutting down").await;
                break;
            }
            published = receiver.recv() => {
                match published {
                    Some(frame) => {
                        if send_frame(&mut socket, &frame).await.is_err() {
                            break;
                        }
                    }
                    // The sender was dropped, which only happens when the
                    // fanout evicted this connection for backpressure.
                    None => {
                        close_with(&mut socket, close_code::BACKPRESSURE, "slow consumer").await;
                        return;
                    }
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                    Some(Ok(_)) => {
                        close_with(&mut socket, close_code::PROTOCOL_VIOLATION, "unexpected frame after handshake").await;
                        break;
                    }
                    Some(Err(_)) => break,
                }
            }
        }
    }

    state.fanout.unregister(registration.id);
}
