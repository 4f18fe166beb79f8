// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps `HubError` and daemon-local failures onto the HTTP error envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hub_core::HubError;
use hub_wire::{ErrorBody, ErrorCode};

pub struct ApiError {
    code: ErrorCode,
    message: String,
    details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), details: None }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn missing_auth() -> Self {
        Self::new(ErrorCode::MissingAuth, "missing Authorization header")
    }

    pub fn invalid_auth() -> Self {
        Self::new(ErrorCode::InvalidAuth, "invalid bearer token")
    }

    pub fn rate_limited() -> Self {
        Self::new(ErrorCode::RateLimited, "rate limit exceeded")
    }

    pub fn shutting_down() -> Self {
        Self::new(ErrorCode::ShuttingDown, "daemon is shutting down")
    }

    pub fn invalid_json() -> Self {
        Self::new(ErrorCode::InvalidInput, "invalid JSON body")
    }
}

impl From<HubError> for ApiError {
    fn from(err: HubError) -> Self {
        let code = ErrorCode::from_hub_error_code(err.code());
        match &err {
            HubError::VersionConflict { current } => {
                Self::new(code, err.to_string()).with_details(serde_json::json!({ "current": current }))
            }
            _ => Self::new(code, err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut body = ErrorBody::new(self.code, self.message);
        if let Some(details) = self.details {
            body = body.with_details(details);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
