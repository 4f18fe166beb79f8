// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agentlip up` — runs the daemon in the foreground until it shuts down.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use hub_daemon::lifecycle::Config;

use crate::exit_error::ExitError;
use crate::workspace;

#[derive(Args)]
pub struct UpArgs {
    #[arg(long)]
    pub workspace: Option<PathBuf>,

    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, default_value_t = 0)]
    pub port: u16,

    #[arg(long)]
    pub idle_shutdown_ms: Option<u64>,

    #[arg(long)]
    pub json: bool,

    /// Accept binds to non-loopback hosts. Off by default (§2, §6).
    #[arg(long)]
    pub unsafe_bind: bool,
}

pub async fn run(args: UpArgs) -> Result<(), ExitError> {
    let workspace_marker = workspace::resolve_marker(args.workspace.clone())
        .map_err(|err| ExitError::new(1, format!("failed to resolve workspace: {err}")))?;

    let config = Config {
        workspace_marker,
        host: args.host,
        port: args.port,
        unsafe_bind: args.unsafe_bind,
        idle_shutdown: args.idle_shutdown_ms.map(Duration::from_millis),
    };

    let auth_token = std::env::var("AGENTLIP_AUTH_TOKEN").ok();

    match hub_daemon::run(config, auth_token).await {
        Ok(()) => {
            if args.json {
                println!("{}", serde_json::json!({ "status": "stopped" }));
            } else {
                println!("daemon stopped");
            }
            Ok(())
        }
        Err(err) => Err(ExitError::new(err.exit_code(), err.to_string())),
    }
}
