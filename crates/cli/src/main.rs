// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agentlip` — the CLI surface: `status` and `up`. Everything else (flag
//! parsing, help text) is handled by `clap` per the design's external
//! collaborators.

mod client;
mod commands;
mod exit_error;
mod workspace;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::{status, up};
use exit_error::ExitError;

#[derive(Parser)]
#[command(
    name = "agentlip",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")),
    about = "Local workspace hub for agent-to-agent conversation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the workspace's daemon is running and healthy.
    Status(status::StatusArgs),
    /// Start the daemon for this workspace in the foreground.
    Up(up::UpArgs),
}

fn init_logging() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "agentlip=info".to_string());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Status(args) => status::run(args).await,
        Commands::Up(args) => up::run(args).await,
    };

    if let Err(err) = result {
        report(err);
    }
}

fn report(err: ExitError) -> ! {
    if !err.message.is_empty() {
        eprintln!("error: {}", err.message);
    }
    std::process::exit(err.code);
}
