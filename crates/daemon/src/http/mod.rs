// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `/api/v1` HTTP surface: router, error mapping, shared state, and the
//! auth/rate-limit gate every mutating route passes through.

pub mod error;
pub mod routes;
pub mod state;

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::trace::TraceLayer;

use error::ApiError;
use state::AppState;

/// Builds the full router: `/health` is always reachable and never gated;
/// everything under `/api/v1` passes through [`gate`] first.
pub fn build_router(state: AppState) -> Router {
    routes::router(state.clone())
        .layer(middleware::from_fn_with_state(state, gate))
        .layer(TraceLayer::new_for_http())
}

fn is_mutating(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PATCH | Method::DELETE)
}

/// Rate-limits every request, authenticates mutating ones, and rejects
/// everything but `/health` while the daemon is shutting down.
async fn gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if req.uri().path() == "/health" {
        return next.run(req).await;
    }

    if state.is_shutting_down() {
        return ApiError::shutting_down().into_response();
    }

    if !state.rate_limiter.try_acquire() {
        return ApiError::rate_limited().into_response();
    }

    if is_mutating(req.method()) {
        let header = req
            .headers()
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let token = match crate::auth::extract_bearer(header) {
            Some(token) => token,
            None => return ApiError::missing_auth().into_response(),
        };
        if !crate::auth::constant_time_eq(&state.server_info.auth_token, token) {
            return ApiError::invalid_auth().into_response();
        }
    }

    next.run(req).await
}
