// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal HTTP client for talking to a running daemon. Only `/health` is
//! needed by the CLI today; it is unauthenticated by design (§6).

use std::time::Duration;

use hub_wire::HealthResponse;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

pub struct DaemonClient {
    base_url: String,
    http: reqwest::Client,
}

impl DaemonClient {
    pub fn new(host: &str, port: u16) -> Self {
        let http = reqwest::Client::builder().timeout(HEALTH_TIMEOUT).build().unwrap_or_default();
        Self { base_url: format!("http://{host}:{port}"), http }
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self.http.get(format!("{}/health", self.base_url)).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        Ok(response.json().await?)
    }
}
