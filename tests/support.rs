// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared scaffolding for the scenario tests: spawn `agentlipd` against a
//! throwaway workspace, wait for it to come up, and give back a client
//! already carrying its bearer token.

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use serde_json::Value;

pub struct Daemon {
    child: Child,
    pub base_url: String,
    pub auth_token: String,
    _workspace: tempfile::TempDir,
}

impl Daemon {
    /// Spawns `agentlipd` bound to an OS-assigned loopback port inside a
    /// fresh temp workspace, and blocks until `server.json` is written and
    /// `/health` answers.
    pub async fn start() -> Self {
        Self::start_with_env(&[]).await
    }

    pub async fn start_with_env(extra_env: &[(&str, &str)]) -> Self {
        let workspace = tempfile::tempdir().expect("create temp workspace");
        let marker = workspace.path().join(".agentlip");
        let token = format!("test-token-{}", nanoid_like());

        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin("agentlipd"));
        cmd.env("AGENTLIP_WORKSPACE", &marker)
            .env("AGENTLIP_HOST", "127.0.0.1")
            .env("AGENTLIP_PORT", "0")
            .env("AGENTLIP_AUTH_TOKEN", &token)
            .env("AGENTLIP_PLUGIN_WORKER_BIN", assert_cmd::cargo::cargo_bin("agentlip-plugin-worker"))
            .env("RUST_LOG", "warn")
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        for (key, value) in extra_env {
            cmd.env(key, value);
        }
        let child = cmd.spawn().expect("spawn agentlipd");

        let server_json = marker.join("server.json");
        let deadline = Instant::now() + Duration::from_secs(10);
        let port = loop {
            if let Ok(bytes) = std::fs::read(&server_json) {
                if let Ok(value) = serde_json::from_slice::<Value>(&bytes) {
                    if let Some(port) = value.get("port").and_then(Value::as_u64) {
                        break port as u16;
                    }
                }
            }
            if Instant::now() > deadline {
                panic!("agentlipd did not write server.json in time");
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        };

        let base_url = format!("http://127.0.0.1:{port}");
        wait_for_health(&base_url, deadline).await;

        Daemon { child, base_url, auth_token: token, _workspace: workspace }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

async fn wait_for_health(base_url: &str, deadline: Instant) {
    let client = reqwest::Client::new();
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/health")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("agentlipd did not become healthy in time");
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

fn nanoid_like() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hash, Hasher};

    let mut hasher = RandomState::new().build_hasher();
    std::process::id().hash(&mut hasher);
    Instant::now().elapsed().hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

pub async fn post_json(client: &reqwest::Client, url: String, token: Option<&str>, body: Value) -> (u16, Value) {
    let mut req = client.post(url).json(&body);
    if let Some(token) = token {
        req = req.bearer_auth(token);
    }
    let resp = req.send().await.expect("request failed");
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.unwrap_or(Value::Null);
    (status, body)
}

pub async fn patch_json(client: &reqwest::Client, url: String, token: &str, body: Value) -> (u16, Value) {
    let resp = client.patch(url).bearer_auth(token).json(&body).send().await.expect("request failed");
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.unwrap_or(Value::Null);
    (status, body)
}
