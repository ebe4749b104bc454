//! Healthgate Server - Main entry point

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use healthgate_core::{
    api,
    config::Config,
    health::HealthService,
    telemetry::{self, init_logging},
};

/// Healthgate - dependency health report server
#[derive(Parser)]
#[command(name = "healthgate-server", version, about)]
struct Args {
    /// Configuration file (TOML, YAML or JSON); HEALTHGATE__* environment
    /// variables override it
    #[arg(short, long, env = "HEALTHGATE_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match args.config.as_deref() {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    init_logging(&config.logging)?;
    telemetry::describe_metrics();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Healthgate Server"
    );

    let service = HealthService::from_config(&config.health, &config.probes)?;
    tracing::info!(
        probes = ?service.probes(),
        check_timeout = ?service.check_timeout(),
        "Probes registered"
    );

    let app = api::build_router(Arc::new(service), &config.health.path);

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address).await?;
    tracing::info!(address = %address, path = %config.health.path, "Starting HTTP server");

    api::serve(listener, app, shutdown_signal()).await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
