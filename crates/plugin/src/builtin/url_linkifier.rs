// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Default linkifier: tags `http(s)://` URLs with their byte span.

use regex::Regex;
use std::sync::OnceLock;

use crate::protocol::{LinkifierOutputItem, LinkifierSpan, WorkerRequest, WorkerResponse};

#[allow(clippy::expect_used)]
fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("constant regex pattern is valid"))
}

pub fn run(request: &WorkerRequest) -> WorkerResponse {
    let items = url_pattern()
        .find_iter(&request.content_raw)
        .map(|m| LinkifierOutputItem {
            kind: "url".to_string(),
            span: LinkifierSpan { start: m.start() as i64, end: m.end() as i64 },
            data: serde_json::json!({ "url": m.as_str() }),
        })
        .collect();
    WorkerResponse::Linkifier { items }
}

#[cfg(test)]
#[path = "url_linkifier_tests.rs"]
mod tests;
