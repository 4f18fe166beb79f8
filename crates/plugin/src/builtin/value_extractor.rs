// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Default extractor: turns each linkified URL into a `link` attachment.
//! Demonstrates the extractor shape; real deployments configure their own.

use regex::Regex;
use std::sync::OnceLock;

use crate::protocol::{ExtractorOutputItem, WorkerRequest, WorkerResponse};

#[allow(clippy::expect_used)]
fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("constant regex pattern is valid"))
}

pub fn run(request: &WorkerRequest) -> WorkerResponse {
    let items = url_pattern()
        .find_iter(&request.content_raw)
        .map(|m| ExtractorOutputItem {
            kind: "link".to_string(),
            key: None,
            value_json: serde_json::json!({ "url": m.as_str() }),
            dedupe_key: Some(m.as_str().to_string()),
        })
        .collect();
    WorkerResponse::Extractor { items }
}

#[cfg(test)]
#[path = "value_extractor_tests.rs"]
mod tests;
