// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-format shapes shared between `hub-daemon`, `hub-plugin`, and clients:
//! HTTP request/response bodies, the WebSocket fanout protocol, the
//! error-code vocabulary, and the length-prefixed framing used for plugin
//! worker RPC.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod error_code;
pub mod frame;
pub mod http;
pub mod ws;

pub use error_code::{ErrorBody, ErrorCode};
pub use frame::{decode, encode, read_json, read_message, write_json, write_message, FrameError};
pub use http::{
    AttachmentIdView, AttachmentQuery, CreateAttachmentRequest, CreateChannelRequest,
    CreateMessageRequest, CreateTopicRequest, EventsQuery, HealthResponse, MessageQuery,
    PatchMessageOp, PatchMessageRequest, PatchTopicRequest,
};
pub use ws::{close_code, ClientFrame, EventScope, ServerFrame, Subscriptions};
