// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agentlip status` — reads `server.json`, calls `/health`, and compares
//! the reported `db_id` against the on-disk store meta.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::client::DaemonClient;
use crate::exit_error::ExitError;
use crate::workspace;

#[derive(Args)]
pub struct StatusArgs {
    /// Workspace directory. Defaults to walking up from the current
    /// directory looking for a marker directory.
    #[arg(long)]
    pub workspace: Option<PathBuf>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StatusOutput {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    instance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    protocol_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uptime_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl StatusOutput {
    fn not_running(error: impl Into<String>) -> Self {
        Self {
            status: "not_running",
            instance_id: None,
            db_id: None,
            schema_version: None,
            protocol_version: None,
            port: None,
            pid: None,
            uptime_seconds: None,
            error: Some(error.into()),
        }
    }

    fn stale(error: impl Into<String>) -> Self {
        Self { status: "stale", ..Self::not_running(error) }
    }
}

pub async fn run(args: StatusArgs) -> Result<(), ExitError> {
    let marker = workspace::resolve_marker(args.workspace.clone())
        .map_err(|err| ExitError::new(1, format!("failed to resolve workspace: {err}")))?;

    let server_info = match hub_daemon::lifecycle::ServerInfo::read(&workspace::server_json_path(&marker)) {
        Ok(info) => info,
        Err(_) => return emit(args.json, StatusOutput::not_running("no server.json found"), 3),
    };

    let client = DaemonClient::new(&server_info.host, server_info.port);
    let health = match client.health().await {
        Ok(health) => health,
        Err(err) => return emit(args.json, StatusOutput::not_running(err.to_string()), 3),
    };

    if health.db_id != server_info.db_id {
        return emit(
            args.json,
            StatusOutput::stale(format!("server.json db_id {} does not match health db_id {}", server_info.db_id, health.db_id)),
            3,
        );
    }

    let on_disk = hub_storage::Store::open(&workspace::db_path(&marker))
        .and_then(|store| store.meta())
        .map_err(|err| ExitError::new(1, format!("failed to read on-disk meta: {err}")))?;

    if on_disk.db_id != health.db_id {
        return emit(
            args.json,
            StatusOutput::stale(format!("on-disk db_id {} does not match daemon-reported db_id {}", on_disk.db_id, health.db_id)),
            3,
        );
    }

    emit(
        args.json,
        StatusOutput {
            status: "running",
            instance_id: Some(health.instance_id),
            db_id: Some(health.db_id),
            schema_version: Some(health.schema_version),
            protocol_version: Some(health.protocol_version.to_string()),
            port: Some(server_info.port),
            pid: Some(health.pid),
            uptime_seconds: Some(health.uptime_seconds),
            error: None,
        },
        0,
    )
}

fn emit(json: bool, output: StatusOutput, exit_code: i32) -> Result<(), ExitError> {
    if json {
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string()));
    } else if let Some(error) = &output.error {
        println!("{}: {error}", output.status);
    } else {
        println!(
            "{} (instance {}, uptime {}s)",
            output.status,
            output.instance_id.as_deref().unwrap_or("?"),
            output.uptime_seconds.unwrap_or(0)
        );
    }

    if exit_code == 0 {
        Ok(())
    } else {
        Err(ExitError::new(exit_code, String::new()))
    }
}
