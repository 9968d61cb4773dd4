// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # devfs Gateway CLI
//!
//! The `devfs` binary serves one directory tree over HTTP to a browser-based
//! development client.
//!
//! ## Commands
//!
//! - `devfs serve` - Run the gateway until Ctrl+C / SIGTERM
//! - `devfs config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use devfs_core::domain::gateway_config::GatewayConfigManifest;
use devfs_gateway::commands::{self, ConfigCommand, ServeArgs};

/// devfs Gateway - HTTP access to a rooted development filesystem
#[derive(Parser)]
#[command(name = "devfs")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "DEVFS_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); defaults to the
    /// configuration's observability.log_level
    #[arg(long, global = true, env = "DEVFS_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the gateway HTTP server
    #[command(name = "serve")]
    Serve {
        #[command(flatten)]
        args: ServeArgs,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match &cli.log_level {
        Some(level) => level.clone(),
        None => configured_log_level(cli.config.clone()),
    };
    init_logging(&level)?;

    match cli.command {
        Some(Commands::Serve { args }) => commands::serve::handle_command(args, cli.config).await,
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        None => {
            // No command provided - show help
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Log level from the configuration file, or `info` if none can be loaded
fn configured_log_level(config_path: Option<PathBuf>) -> String {
    GatewayConfigManifest::load_or_default(config_path)
        .map(|config| config.spec.observability.log_level)
        .unwrap_or_else(|_| "info".to_string())
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
