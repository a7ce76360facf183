// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bridged`: the Bridge daemon binary.

use bridge::bridge::{Bridge, Config};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let log_dir = std::env::var("BRIDGE_LOG_DIR").unwrap_or_else(|_| ".".into());
    let file_appender = tracing_appender::rolling::daily(log_dir, "bridge.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "bridge=info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();
    guard
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let _log_guard = init_logging();
    let config = Config::load();

    tracing::info!(worker_bind = %config.worker_bind, client_bind = %config.client_bind, "starting bridge");

    let worker_bind = config.worker_bind.clone();
    let client_bind = config.client_bind.clone();
    let bridge = Arc::new(Bridge::new(config));
    bridge.start();

    let worker_bridge = Arc::clone(&bridge);
    let worker_task = tokio::spawn(async move { bridge::listener::worker::run(worker_bridge, &worker_bind).await });

    let client_bridge = Arc::clone(&bridge);
    let client_task = tokio::spawn(async move { bridge::listener::client::run(client_bridge, &client_bind).await });

    let result = tokio::select! {
        res = worker_task => res.unwrap_or_else(|err| Err(std::io::Error::other(err))),
        res = client_task => res.unwrap_or_else(|err| Err(std::io::Error::other(err))),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
            Ok(())
        }
    };

    bridge.stop();

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "bridge exited with an error");
            std::process::ExitCode::FAILURE
        }
    }
}
