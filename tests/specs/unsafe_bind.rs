// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::support::Daemon;

#[tokio::test]
async fn non_loopback_bind_is_rejected_without_unsafe_flag() {
    let workspace = tempfile::tempdir().expect("create temp workspace");
    let marker = workspace.path().join(".agentlip");

    let mut child = Command::new(assert_cmd::cargo::cargo_bin("agentlipd"))
        .env("AGENTLIP_WORKSPACE", &marker)
        .env("AGENTLIP_HOST", "0.0.0.0")
        .env("AGENTLIP_PORT", "0")
        .env("RUST_LOG", "error")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn agentlipd");

    let deadline = Instant::now() + Duration::from_secs(5);
    let status = loop {
        if let Some(status) = child.try_wait().expect("poll child") {
            break status;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("agentlipd kept running on an unsafe bind request");
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    };

    assert!(!status.success(), "expected a nonzero exit for a rejected unsafe bind");
}

#[tokio::test]
async fn non_loopback_bind_succeeds_with_unsafe_flag() {
    let daemon = Daemon::start_with_env(&[("AGENTLIP_HOST", "0.0.0.0"), ("AGENTLIP_UNSAFE_BIND", "1")]).await;

    let health = reqwest::Client::new()
        .get(daemon.url("/health"))
        .send()
        .await
        .expect("health request");
    assert!(health.status().is_success());
}
