// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared result shapes for mutation operations.

/// Result of a mutation that may be a no-op (idempotent delete, deduplicated
/// attachment insert). `event_id` is `None` exactly when nothing was
/// appended to the event log.
#[derive(Debug, Clone)]
pub struct Mutation<T> {
    pub row: T,
    pub event_id: Option<i64>,
}

impl<T> Mutation<T> {
    pub fn new(row: T, event_id: i64) -> Self {
        Self { row, event_id: Some(event_id) }
    }

    pub fn no_op(row: T) -> Self {
        Self { row, event_id: None }
    }
}

/// How far a `move_topic` mutation reaches within the source topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetopicMode {
    /// Move only the named message.
    One,
    /// Move the named message and every later message in its topic.
    Later,
    /// Move every message currently in the origin topic.
    All,
}
