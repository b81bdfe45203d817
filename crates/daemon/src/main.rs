//! PM2 Manager - Daemon Entry Point
//! Serves the PM2 service to UI clients over JSON-RPC

mod config;
mod logging;
mod telemetry;

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

// Import workspace crates
use pm2_manager_api_rpc::RpcServer;
use pm2_manager_core::application::Pm2Service;
use pm2_manager_core::port::time_provider::SystemTimeProvider;
use pm2_manager_infra_system::SystemPm2Cli;

use crate::config::Settings;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration (defaults < file < env)
    let settings = Settings::load()?;

    // 2. Initialize logging (+ optional OpenTelemetry)
    let _logging_guard = logging::init(&settings)?;

    info!("PM2 Manager v{} starting...", VERSION);
    if telemetry::endpoint_configured() && !cfg!(feature = "telemetry") {
        warn!("OpenTelemetry endpoint set but feature 'telemetry' not enabled");
        warn!("Rebuild with: cargo build --features telemetry");
    }

    info!(
        pm2_bin = %settings.pm2_bin,
        timeout_secs = settings.command_timeout_secs,
        log_dir = ?settings.log_dir,
        "Configuration loaded"
    );

    // 3. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let cli = Arc::new(SystemPm2Cli::new(
        settings.cli_config(),
        time_provider.clone(),
    ));
    let service = Arc::new(
        Pm2Service::new(cli, time_provider).with_settle_delay(settings.update_settle_delay()),
    );

    // 4. Check pm2 once so a missing install shows up in the logs right away
    match service.get_version().await {
        Ok(v) if v.installed => info!(version = %v.version, "PM2 detected"),
        Ok(v) => warn!("{}", v.message),
        Err(e) => warn!(error = %e, "PM2 version check failed"),
    }

    // 5. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let started = RpcServer::new(settings.rpc_config(), service)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(addr = %started.addr, "System ready. Waiting for requests...");
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    started
        .handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    started.handle.stopped().await;

    info!("Shutdown complete.");

    Ok(())
}
