// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Size limits shared by the store, HTTP surface, and WS fanout.

pub const CHANNEL_NAME_MAX_CHARS: usize = 100;
pub const TOPIC_TITLE_MAX_CHARS: usize = 200;
pub const MESSAGE_CONTENT_MAX_BYTES: usize = 64 * 1024;
pub const ATTACHMENT_VALUE_MAX_BYTES: usize = 16 * 1024;
pub const WS_FRAME_MAX_BYTES: usize = 256 * 1024;
pub const EVENT_REPLAY_BATCH_MAX: i64 = 1000;

/// Sentinel content written over a tombstoned message's `content_raw`.
pub const TOMBSTONE_SENTINEL: &str = "[deleted]";
