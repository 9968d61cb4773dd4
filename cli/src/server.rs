// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Gateway HTTP server lifecycle
//!
//! Builds the dispatcher and router from a validated configuration, binds the
//! listener and serves until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use devfs_core::application::dispatcher::{Dispatcher, DispatcherSettings};
use devfs_core::domain::gateway_config::GatewayConfigManifest;
use devfs_core::infrastructure::storage::{create_storage_provider, StorageBackend};
use devfs_core::presentation::api::app;

/// Run the gateway. `config` must already have absolute paths and pass
/// validation.
pub async fn run(config: GatewayConfigManifest) -> Result<()> {
    let storage = &config.spec.storage;
    let network = &config.spec.network;

    if !storage.root.is_dir() {
        anyhow::bail!("Gateway root {:?} is not a directory", storage.root);
    }
    tokio::fs::create_dir_all(&storage.staging_dir)
        .await
        .with_context(|| format!("Failed to create staging directory {:?}", storage.staging_dir))?;
    warn_if_cross_device(&storage.root, &storage.staging_dir);

    if let Some(metrics_port) = config.spec.observability.metrics_port {
        let addr = socket_addr(&network.bind_address, metrics_port)?;
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("Failed to install Prometheus exporter")?;
        info!("Metrics exporter listening on {}", addr);
    }

    let dispatcher = Dispatcher::new(
        DispatcherSettings::from(&config),
        create_storage_provider(StorageBackend::Local),
    );
    let router = app(Arc::new(dispatcher), network.max_body_bytes);

    let addr = socket_addr(&network.bind_address, network.port)?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(
        root = %storage.root.display(),
        staging_dir = %storage.staging_dir.display(),
        "Gateway listening on http://{}/{}/",
        addr,
        network.route_prefix
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Gateway shutting down");

    Ok(())
}

pub fn socket_addr(bind_address: &str, port: u16) -> Result<SocketAddr> {
    let ip: IpAddr = bind_address
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", bind_address))?;
    Ok(SocketAddr::new(ip, port))
}

/// Uploads across filesystems are copied instead of renamed
#[cfg(unix)]
fn warn_if_cross_device(root: &Path, staging_dir: &Path) {
    use std::os::unix::fs::MetadataExt;

    if let (Ok(root_meta), Ok(staging_meta)) =
        (std::fs::metadata(root), std::fs::metadata(staging_dir))
    {
        if root_meta.dev() != staging_meta.dev() {
            warn!(
                root = %root.display(),
                staging_dir = %staging_dir.display(),
                "Staging directory is on a different filesystem than the root; uploads will be copied"
            );
        }
    }
}

#[cfg(not(unix))]
fn warn_if_cross_device(_root: &Path, _staging_dir: &Path) {}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
