// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `devfs serve`
//!
//! Settings are layered: configuration file, then `DEVFS_*` environment
//! variables, then the flags below.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use devfs_core::domain::gateway_config::GatewayConfigManifest;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Directory exposed to clients (overrides spec.storage.root)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Upload staging directory (overrides spec.storage.staging_dir)
    #[arg(long, value_name = "DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Bind address (overrides spec.network.bind_address)
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP port (overrides spec.network.port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Prometheus exporter port (overrides spec.observability.metrics_port)
    #[arg(long, value_name = "PORT")]
    pub metrics_port: Option<u16>,
}

impl ServeArgs {
    pub fn apply(&self, config: &mut GatewayConfigManifest) {
        if let Some(root) = &self.root {
            config.spec.storage.root = root.clone();
        }
        if let Some(staging_dir) = &self.staging_dir {
            config.spec.storage.staging_dir = staging_dir.clone();
        }
        if let Some(host) = &self.host {
            config.spec.network.bind_address = host.clone();
        }
        if let Some(port) = self.port {
            config.spec.network.port = port;
        }
        if let Some(metrics_port) = self.metrics_port {
            config.spec.observability.metrics_port = Some(metrics_port);
        }
    }
}

pub async fn handle_command(args: ServeArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut config = GatewayConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;
    args.apply(&mut config);
    config
        .resolve_paths()
        .context("Failed to resolve storage paths")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::server::run(config).await
}
