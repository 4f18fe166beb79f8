// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawns `agentlip-plugin-worker` as a child process per invocation and
//! exchanges one request/response pair over its stdin/stdout using the
//! length-prefixed JSON framing from `hub_wire::frame`.

use std::process::Stdio;
use std::time::Duration;

use hub_wire::frame;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};

use crate::protocol::{WorkerRequest, WorkerResponse};

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("plugin timed out after {0:?}")]
    Timeout(Duration),
    #[error("failed to spawn worker binary: {0}")]
    LoadError(std::io::Error),
    #[error("worker process crashed: {0}")]
    WorkerCrash(String),
    #[error("plugin produced invalid output: {0}")]
    InvalidOutput(String),
    #[error("plugin execution error: {0}")]
    ExecutionError(String),
    #[error("circuit is open for this plugin")]
    CircuitOpen,
}

/// Path to the compiled worker binary. Overridable via
/// `AGENTLIP_PLUGIN_WORKER_BIN` so tests and packaging can point at a
/// specific build output.
pub fn worker_binary_path() -> std::path::PathBuf {
    std::env::var("AGENTLIP_PLUGIN_WORKER_BIN")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("agentlip-plugin-worker"))
}

pub async fn run(request: WorkerRequest, timeout: Duration) -> Result<WorkerResponse, WorkerError> {
    let mut child = spawn(&worker_binary_path()).await?;

    let Some(mut stdin) = child.stdin.take() else {
        return Err(WorkerError::WorkerCrash("worker stdin was not piped".to_string()));
    };
    let payload = frame::encode(&request).map_err(|e| WorkerError::ExecutionError(e.to_string()))?;
    let write_fut = frame::write_message(&mut stdin, &payload);
    if tokio::time::timeout(timeout, write_fut).await.is_err() {
        let _ = child.kill().await;
        return Err(WorkerError::Timeout(timeout));
    }
    drop(stdin);

    let Some(stdout) = child.stdout.take() else {
        let _ = child.kill().await;
        return Err(WorkerError::WorkerCrash("worker stdout was not piped".to_string()));
    };
    let mut reader = BufReader::new(stdout);
    let read_result = tokio::time::timeout(timeout, frame::read_message(&mut reader)).await;

    let bytes = match read_result {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(err)) => {
            let _ = child.kill().await;
            return Err(WorkerError::WorkerCrash(err.to_string()));
        }
        Err(_) => {
            let _ = child.kill().await;
            return Err(WorkerError::Timeout(timeout));
        }
    };

    let _ = child.wait().await;
    frame::decode(&bytes).map_err(|e| WorkerError::InvalidOutput(e.to_string()))
}

async fn spawn(binary: &std::path::Path) -> Result<Child, WorkerError> {
    Command::new(binary)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(WorkerError::LoadError)
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
