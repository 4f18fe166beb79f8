// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn test_config(dir: &std::path::Path) -> Config {
    Config {
        workspace_marker: dir.to_path_buf(),
        host: "127.0.0.1".to_string(),
        port: 0,
        unsafe_bind: false,
        idle_shutdown: None,
    }
}

#[tokio::test]
async fn startup_creates_server_json_and_acquires_lock() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let result = startup(&config, Some("token-123".to_string())).await.unwrap();
    assert_eq!(result.server_info.auth_token, "token-123");
    assert!(config.server_json_path().exists());

    cleanup(&config, &result.store);
    assert!(!config.server_json_path().exists());
}

#[tokio::test]
async fn startup_fails_with_lock_held_when_already_running() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let first = startup(&config, None).await.unwrap();
    let second = startup(&config, None).await;
    assert!(matches!(second.unwrap_err(), LifecycleError::LockHeld(_)));

    cleanup(&config, &first.store);
}
