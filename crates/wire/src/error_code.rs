// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The HTTP-facing error-code vocabulary and envelope.

use serde::{Deserialize, Serialize};

/// Stable machine-readable error kind, distinct from `HubError`'s Rust-level
/// variants — this is what clients pattern-match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    MissingAuth,
    InvalidAuth,
    NoAuthConfigured,
    InvalidInput,
    PayloadTooLarge,
    NotFound,
    VersionConflict,
    CrossChannelMove,
    RateLimited,
    ShuttingDown,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MissingAuth => "MISSING_AUTH",
            ErrorCode::InvalidAuth => "INVALID_AUTH",
            ErrorCode::NoAuthConfigured => "NO_AUTH_CONFIGURED",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::VersionConflict => "VERSION_CONFLICT",
            ErrorCode::CrossChannelMove => "CROSS_CHANNEL_MOVE",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::ShuttingDown => "SHUTTING_DOWN",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::MissingAuth | ErrorCode::InvalidAuth => 401,
            ErrorCode::NoAuthConfigured => 401,
            ErrorCode::InvalidInput => 400,
            ErrorCode::PayloadTooLarge => 413,
            ErrorCode::NotFound => 404,
            ErrorCode::VersionConflict => 409,
            ErrorCode::CrossChannelMove => 400,
            ErrorCode::RateLimited => 429,
            ErrorCode::ShuttingDown => 503,
            ErrorCode::InternalError => 500,
        }
    }

    /// Map from `hub_core::HubError::code()`'s string vocabulary. Errors
    /// that only exist at the HTTP boundary (auth, rate limiting, shutdown)
    /// aren't reachable from a `HubError` and are constructed directly by
    /// `hub-daemon`.
    pub fn from_hub_error_code(code: &str) -> ErrorCode {
        match code {
            "NOT_FOUND" => ErrorCode::NotFound,
            "VERSION_CONFLICT" => ErrorCode::VersionConflict,
            "CROSS_CHANNEL_MOVE" => ErrorCode::CrossChannelMove,
            "INVALID_INPUT" => ErrorCode::InvalidInput,
            "PAYLOAD_TOO_LARGE" => ErrorCode::PayloadTooLarge,
            _ => ErrorCode::InternalError,
        }
    }
}

/// `{error, code, details?}` — the one error shape every HTTP route returns.
/// Never carries request-body content or the auth token (§7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { error: message.into(), code: code.as_str().to_string(), details: None }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
#[path = "error_code_tests.rs"]
mod tests;
