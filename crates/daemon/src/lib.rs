// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The hub daemon: lifecycle (writer lock, `server.json`, bind safety), the
//! `/api/v1` + `/ws` surface, and the fanout that bridges committed events to
//! live subscribers.

pub mod auth;
pub mod env;
pub mod fanout;
pub mod http;
pub mod lifecycle;
pub mod rate_limit;
pub mod ws;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use tokio::net::TcpListener;
use tracing::{info, warn};

use fanout::Fanout;
use http::state::AppState;
use lifecycle::{Config, LifecycleError};
use rate_limit::RateLimiter;

/// Runs the daemon to completion: startup, serve until a shutdown signal or
/// idle timeout, then checkpoint and clean up. Returns once the process is
/// safe to exit; the caller maps [`LifecycleError::exit_code`] to a status.
pub async fn run(mut config: Config, auth_token: Option<String>) -> Result<(), LifecycleError> {
    lifecycle::validate_bind_host(&config.host, config.unsafe_bind)?;

    // Bind before acquiring the writer lock: `server.json` must record the
    // port actually in use, and a `--port 0` request only resolves once the
    // socket exists.
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    config.port = listener.local_addr()?.port();
    info!(addr = %listener.local_addr()?, "listening");

    let startup = lifecycle::startup(&config, auth_token).await?;

    let fanout = Arc::new(Fanout::new());
    let pipeline = build_pipeline(startup.store.clone(), fanout.clone());

    let state = AppState {
        store: startup.store.clone(),
        fanout: fanout.clone(),
        server_info: Arc::new(startup.server_info.clone()),
        rate_limiter: Arc::new(RateLimiter::new(env::rate_limit_capacity(), env::rate_limit_window())),
        shutting_down: Arc::new(AtomicBool::new(false)),
        started_at: Instant::now(),
        plugin_pipeline: Some(pipeline),
    };

    let router = http::build_router(state.clone());

    let shutdown = shutdown_signal(config.idle_shutdown, &state);
    let server = axum::serve(listener, router).with_graceful_shutdown(shutdown);

    if let Err(err) = server.await {
        warn!(%err, "http server exited with an error");
    }

    lifecycle::cleanup(&config, &startup.store);
    drop(startup.lock_file);

    Ok(())
}

fn build_pipeline(store: Arc<hub_storage::Store<hub_core::SystemClock>>, fanout: Arc<Fanout>) -> Arc<hub_plugin::Pipeline> {
    let config = hub_plugin::config::PipelineConfig {
        timeout: env::plugin_timeout(),
        circuit_breaker_threshold: env::circuit_breaker_threshold(),
        circuit_breaker_cooldown: env::circuit_breaker_cooldown(),
        marker_dir_name: env::MARKER_DIR.to_string(),
        ..hub_plugin::config::PipelineConfig::default()
    };
    let on_event: hub_plugin::pipeline::EventSink = Arc::new(move |event| {
        for backpressured in fanout.publish(&event) {
            fanout.unregister(backpressured);
        }
    });
    Arc::new(hub_plugin::Pipeline::new(store, config, on_event))
}

/// Resolves when either a shutdown signal arrives or the idle timer expires.
/// Marks the daemon shutting-down and tells every open `/ws` connection to
/// close with code 1001 before axum stops accepting new connections.
async fn shutdown_signal(idle_shutdown: Option<std::time::Duration>, state: &AppState) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(%err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let idle = async {
        match idle_shutdown {
            Some(duration) => idle_watch(state, duration).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
        _ = idle => info!("idle timeout elapsed, shutting down"),
    }

    state.begin_shutdown();
    state.fanout.shutdown();
}

/// Polls connection count on a fixed interval; fires once the fanout has
/// been empty for a full `duration`.
async fn idle_watch(state: &AppState, duration: std::time::Duration) {
    let poll = std::cmp::min(duration, std::time::Duration::from_secs(5));
    let mut idle_since: Option<Instant> = None;
    loop {
        tokio::time::sleep(poll).await;
        if state.fanout.connection_count() == 0 {
            let since = idle_since.get_or_insert_with(Instant::now);
            if since.elapsed() >= duration {
                return;
            }
        } else {
            idle_since = None;
        }
    }
}
