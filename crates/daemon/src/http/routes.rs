// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `/api/v1` route table and `/health`. Every handler is thin: parse,
//! call the store (which owns validation), publish the resulting event,
//! shape the response. See `hub-storage::store` for the actual mutation
//! logic this dispatches to.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;

use hub_core::{ChannelId, MessageId, TopicId};
use hub_storage::store::{MessageFilter, RetopicMode, Snapshot};
use hub_wire::{
    AttachmentIdView, AttachmentQuery, CreateAttachmentRequest, CreateChannelRequest,
    CreateMessageRequest, CreateTopicRequest, EventsQuery, HealthResponse, MessageQuery,
    PatchMessageOp, PatchMessageRequest, PatchTopicRequest,
};

use super::error::ApiError;
use super::state::AppState;
use crate::fanout::Fanout;

const DEFAULT_MESSAGE_LIMIT: i64 = 100;
const MAX_EVENT_BATCH: i64 = hub_core::limits::EVENT_REPLAY_BATCH_MAX;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/channels", get(list_channels).post(create_channel))
        .route("/channels/:channel_id/topics", get(list_topics))
        .route("/topics", post(create_topic))
        .route("/topics/:topic_id", patch(patch_topic))
        .route("/messages", get(list_messages).post(create_message))
        .route("/messages/:message_id", patch(patch_message))
        .route(
            "/topics/:topic_id/attachments",
            get(list_attachments).post(create_attachment),
        )
        .route("/events", get(list_events));

    Router::new()
        .route("/health", get(health))
        .route("/ws", get(crate::ws::upgrade))
        .nest("/api/v1", api)
        .with_state(state)
}

fn publish_if_present(store: &hub_storage::Store, fanout: &Fanout, event_id: Option<i64>) {
    let Some(event_id) = event_id else { return };
    match store.list_events(event_id - 1, 1) {
        Ok(events) => {
            if let Some(event) = events.into_iter().next() {
                for backpressured in fanout.publish(&event) {
                    fanout.unregister(backpressured);
                }
            }
        }
        Err(err) => tracing::warn!(%err, event_id, "failed to refetch event for publication"),
    }
}

fn parse_retopic_mode(mode: &str) -> Result<RetopicMode, ApiError> {
    match mode {
        "one" => Ok(RetopicMode::One),
        "later" => Ok(RetopicMode::Later),
        "all" => Ok(RetopicMode::All),
        other => Err(ApiError::new(
            hub_wire::ErrorCode::InvalidInput,
            format!("unknown move_topic mode: {other:?}"),
        )),
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::new(hub_wire::ErrorCode::InvalidInput, format!("{field} is required")))
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let meta = state.store.meta()?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        instance_id: state.server_info.instance_id.clone(),
        db_id: meta.db_id,
        schema_version: meta.schema_version,
        protocol_version: crate::env::PROTOCOL_VERSION.to_string(),
        pid: state.server_info.pid,
        uptime_seconds: state.uptime_seconds(),
    }))
}

async fn list_channels(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.store.list_channels()?))
}

async fn create_channel(
    State(state): State<AppState>,
    Json(body): Json<CreateChannelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mutation = state.store.create_channel(&body.name, body.description.as_deref())?;
    publish_if_present(&state.store, &state.fanout, mutation.event_id);
    Ok((StatusCode::CREATED, Json(mutation.row)))
}

async fn list_topics(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let channel_id = ChannelId::from(channel_id);
    if state.store.get_channel(&channel_id)?.is_none() {
        return Err(ApiError::new(hub_wire::ErrorCode::NotFound, format!("channel {channel_id} not found")));
    }
    Ok(Json(state.store.list_topics(&channel_id)?))
}

async fn create_topic(
    State(state): State<AppState>,
    Json(body): Json<CreateTopicRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mutation = state.store.create_topic(&body.channel_id, &body.title)?;
    publish_if_present(&state.store, &state.fanout, mutation.event_id);
    Ok((StatusCode::CREATED, Json(mutation.row)))
}

async fn patch_topic(
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
    Json(body): Json<PatchTopicRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let topic_id = TopicId::from(topic_id);
    let mutation = state.store.rename_topic(&topic_id, &body.title)?;
    publish_if_present(&state.store, &state.fanout, mutation.event_id);
    Ok(Json(mutation.row))
}

async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_MESSAGE_LIMIT).clamp(1, MAX_EVENT_BATCH);
    let filter = MessageFilter {
        channel_id: query.channel_id.as_ref(),
        topic_id: query.topic_id.as_ref(),
        limit,
        before_id: query.before_id.as_ref(),
        after_id: query.after_id.as_ref(),
    };
    Ok(Json(state.store.list_messages(&filter)?))
}

async fn create_message(
    State(state): State<AppState>,
    Json(body): Json<CreateMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mutation = state.store.create_message(&body.topic_id, &body.sender, &body.content_raw)?;
    publish_if_present(&state.store, &state.fanout, mutation.event_id);

    if mutation.event_id.is_some() {
        if let Some(pipeline) = state.plugin_pipeline.clone() {
            let snapshot = Snapshot {
                message_id: mutation.row.id.clone(),
                content_raw: mutation.row.content_raw.clone(),
                version: mutation.row.version,
            };
            tokio::spawn(async move {
                if let Err(err) = pipeline.run_for_message(snapshot).await {
                    tracing::warn!(%err, "plugin pipeline invocation failed");
                }
            });
        }
    }

    Ok((StatusCode::CREATED, Json(mutation.row)))
}

async fn patch_message(
    State(state): State<AppState>,
    Path(message_id): Path<String>,
    Json(body): Json<PatchMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message_id = MessageId::from(message_id);

    let value = match body.op {
        PatchMessageOp::Edit => {
            let content = required(body.content_raw, "content_raw")?;
            let mutation = state.store.edit_message(&message_id, &content, body.expected_version)?;
            publish_if_present(&state.store, &state.fanout, mutation.event_id);
            serde_json::to_value(mutation.row).map_err(|err| {
                ApiError::new(hub_wire::ErrorCode::InternalError, err.to_string())
            })?
        }
        PatchMessageOp::Delete => {
            let actor = required(body.actor, "actor")?;
            let mutation = state.store.delete_message(&message_id, &actor, body.expected_version)?;
            publish_if_present(&state.store, &state.fanout, mutation.event_id);
            serde_json::to_value(mutation.row).map_err(|err| {
                ApiError::new(hub_wire::ErrorCode::InternalError, err.to_string())
            })?
        }
        PatchMessageOp::MoveTopic => {
            let to_topic_id = required(body.to_topic_id, "to_topic_id")?;
            let mode_str = required(body.mode, "mode")?;
            let mode = parse_retopic_mode(&mode_str)?;
            let mutations = state.store.move_topic(&message_id, &to_topic_id, mode, body.expected_version)?;
            for mutation in &mutations {
                publish_if_present(&state.store, &state.fanout, mutation.event_id);
            }
            let rows: Vec<_> = mutations.into_iter().map(|m| m.row).collect();
            serde_json::to_value(rows).map_err(|err| {
                ApiError::new(hub_wire::ErrorCode::InternalError, err.to_string())
            })?
        }
    };

    Ok((StatusCode::OK, Json(value)))
}

async fn list_attachments(
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
    Query(query): Query<AttachmentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let topic_id = TopicId::from(topic_id);
    if state.store.get_topic(&topic_id)?.is_none() {
        return Err(ApiError::new(hub_wire::ErrorCode::NotFound, format!("topic {topic_id} not found")));
    }
    Ok(Json(state.store.list_attachments(&topic_id, query.kind.as_deref())?))
}

async fn create_attachment(
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
    Json(body): Json<CreateAttachmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let topic_id = TopicId::from(topic_id);
    let dedupe_key = body.dedupe_key.clone().unwrap_or_else(|| body.value_json.to_string());

    let mutation = state.store.create_attachment(
        &topic_id,
        &body.kind,
        body.key.as_deref(),
        &body.value_json,
        &dedupe_key,
        body.source_message_id.as_ref(),
    )?;
    publish_if_present(&state.store, &state.fanout, mutation.event_id);

    let status = if mutation.event_id.is_some() { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(AttachmentIdView { id: mutation.row.id, event_id: mutation.event_id })))
}

async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let after = query.after.unwrap_or(0);
    let limit = query.limit.unwrap_or(MAX_EVENT_BATCH).clamp(1, MAX_EVENT_BATCH);
    Ok(Json(state.store.list_events(after, limit)?))
}
