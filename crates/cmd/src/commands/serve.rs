// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use clap::Args;
use contact::{ContactConfig, Pipeline};
use diagnostics::*;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// YAML configuration file (environment variables override it)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub async fn serve_command(args: &ServeArgs) -> Result<()> {
    let config = ContactConfig::from_process_env(args.config.as_deref())
        .context("Failed to load contact configuration")?;

    for warning in config.warnings() {
        warn!("Configuration: {warning}");
    }
    let posture = format!("{:?}", config.posture);
    let destination = config.destination.clone().unwrap_or_else(|| "monkeysmail".to_string());
    info!("Starting contact relay (posture: {posture}, destination: {destination})");

    let pipeline = Pipeline::from_config(config).context("Failed to build HTTP client")?;

    let (addr, server) = warp::serve(contact::routes(pipeline))
        .try_bind_with_graceful_shutdown(args.bind, shutdown_signal())
        .with_context(|| format!("Failed to bind {}", args.bind))?;

    let addr = addr.to_string();
    info!("Listening on {addr}");
    server.await;
    info!("Contact relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        let detail = e.to_string();
        error!("Failed to listen for shutdown signal: {detail}");
        // Without a signal handler, keep serving until killed
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
