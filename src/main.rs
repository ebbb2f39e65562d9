// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use phantom_aegis_server::{
    api::router,
    config::{LogFormat, ServerConfig, StorageKind, DEFAULT_LOG_FILTER},
    monitor::RestartMonitor,
    state::AppState,
    storage::{FileStore, StoragePaths},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env();
    init_tracing(config.log_format);

    let state = match config.storage {
        StorageKind::File => {
            let store = Arc::new(FileStore::new(StoragePaths::new(&config.data_dir)));
            if let Err(e) = store.initialize() {
                error!(error = %e, data_dir = %config.data_dir.display(), "Failed to create data directory");
                std::process::exit(1);
            }
            info!(data_dir = %config.data_dir.display(), "Using file storage");
            AppState::with_file_store(store)
        }
        StorageKind::Memory => {
            info!("Using in-memory storage; configuration is lost on exit");
            AppState::in_memory()
        }
    };

    let shutdown = CancellationToken::new();

    {
        let gate = state.gate.lock().await;
        let monitor = RestartMonitor::new(gate.subscribe_restarts());
        tokio::spawn(monitor.run(shutdown.clone()));
    }

    let addr = match config.bind_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!(error = %e, host = %config.host, port = config.port, "Invalid bind address");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %addr, "Failed to bind");
            std::process::exit(1);
        }
    };

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
        }
        signal_token.cancel();
    });

    info!(%addr, "Phantom Aegis gate listening (docs at /docs)");

    if let Err(e) = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
    {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
