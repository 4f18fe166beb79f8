// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker entrypoint: read one length-prefixed `WorkerRequest` from stdin,
//! install the filesystem guard, dispatch to the compiled-in plugin
//! registry, write one `WorkerResponse` to stdout, exit.

use std::path::Path;
use std::time::Duration;

use hub_plugin::builtin::dispatch;
use hub_plugin::fs_guard;
use hub_plugin::protocol::WorkerResponse;
use hub_wire::frame;
use tokio::io::{stdin, stdout};

/// Marker directory name the filesystem guard checks against. Mirrors
/// `hub_plugin::config::PipelineConfig`'s own default — the worker never
/// receives the workspace path itself, only this fixed name.
const MARKER_DIR_NAME: &str = ".agentlip";

#[tokio::main]
async fn main() {
    let mut input = stdin();
    let mut output = stdout();

    let request = match frame::read_json(&mut input).await {
        Ok(request) => request,
        Err(err) => {
            let response = WorkerResponse::Error { message: format!("malformed request: {err}") };
            let _ = frame::write_json(&mut output, &response).await;
            std::process::exit(1);
        }
    };

    if let Some(delay_ms) = test_delay_ms() {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    let response = match guarded_write_probe() {
        Ok(()) => dispatch(&request),
        Err(violation) => WorkerResponse::Error { message: violation.to_string() },
    };

    if frame::write_json(&mut output, &response).await.is_err() {
        std::process::exit(1);
    }
}

/// Filesystem guard installed before any plugin logic runs, per the
/// isolation section: a plugin that tries to write under the workspace
/// marker fails closed instead of touching the store's own files.
///
/// The only write path this worker binary could ever attempt is the one a
/// test asks it to probe via `AGENTLIP_FS_GUARD_PROBE_PATH`, since neither
/// bundled plugin writes to disk — this exists so that guard has a real
/// call site to exercise end-to-end rather than sitting dead.
fn guarded_write_probe() -> Result<(), fs_guard::FsGuardViolation> {
    match std::env::var("AGENTLIP_FS_GUARD_PROBE_PATH") {
        Ok(path) => fs_guard::check_write(Path::new(&path), MARKER_DIR_NAME),
        Err(_) => Ok(()),
    }
}

/// Artificial per-invocation delay, used only to simulate a slow plugin in
/// the staleness-guard scenario test.
fn test_delay_ms() -> Option<u64> {
    std::env::var("AGENTLIP_PLUGIN_TEST_DELAY_MS").ok().and_then(|s| s.parse().ok())
}
