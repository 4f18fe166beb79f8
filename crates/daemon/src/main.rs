// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agentlipd` — the daemon binary. Reads its workspace and bind settings
//! from the environment (the `agentlip up` CLI command sets these); see
//! `hub_daemon::lifecycle::Config` for what each one controls.

use std::path::PathBuf;
use std::time::Duration;

use hub_daemon::lifecycle::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "agentlipd=info,hub_daemon=info,hub_plugin=info".to_string());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn config_from_env() -> Config {
    let workspace_marker = std::env::var("AGENTLIP_WORKSPACE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".agentlip"));
    let host = std::env::var("AGENTLIP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("AGENTLIP_PORT").ok().and_then(|s| s.parse().ok()).unwrap_or(0);
    let unsafe_bind = std::env::var("AGENTLIP_UNSAFE_BIND").is_ok();
    let idle_shutdown = std::env::var("AGENTLIP_IDLE_SHUTDOWN_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis);

    Config { workspace_marker, host, port, unsafe_bind, idle_shutdown }
}

#[tokio::main]
async fn main() {
    init_logging();

    let config = config_from_env();
    let auth_token = std::env::var("AGENTLIP_AUTH_TOKEN").ok();

    if let Err(err) = hub_daemon::run(config, auth_token).await {
        tracing::error!(%err, "daemon exited with an error");
        std::process::exit(err.exit_code());
    }
}
