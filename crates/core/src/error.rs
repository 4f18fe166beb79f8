// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical domain error type shared by the store, plugin pipeline, and daemon.
//!
//! HTTP/WS-facing error codes live in `hub-wire`; this type is the Rust-level
//! error that the store and mutation layer actually return.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("message has been deleted")]
    MessageDeleted,

    #[error("version conflict: current version is {current}")]
    VersionConflict { current: i64 },

    #[error("cannot move a message across channels")]
    CrossChannelMove,

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HubError {
    /// Stable error code, matching the spec's error-kind vocabulary.
    pub fn code(&self) -> &'static str {
        match self {
            HubError::NotFound(_) => "NOT_FOUND",
            HubError::MessageDeleted => "NOT_FOUND",
            HubError::VersionConflict { .. } => "VERSION_CONFLICT",
            HubError::CrossChannelMove => "CROSS_CHANNEL_MOVE",
            HubError::AlreadyExists(_) => "INVALID_INPUT",
            HubError::InvalidInput(_) => "INVALID_INPUT",
            HubError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            HubError::Sqlite(_) | HubError::Io(_) | HubError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
