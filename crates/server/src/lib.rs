//! # Transit Composite Server
//!
//! The HTTP face of the transit composite service. It answers route queries
//! with equipment status for the subway stations on each route, and saves,
//! lists and removes the routes users keep. The API routes are served open at
//! the top level and again under `/protected` behind bearer-token validation.

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;

use crate::{
    config::{get_config, AppConfig},
    router::create_router,
    state::build_app_state,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;

/// Serves the composite API on `listener` until Ctrl-C.
///
/// Opens the saved-route database (creating the tables if needed) and the
/// downstream service clients described by `config` before accepting
/// connections.
pub async fn run(listener: TcpListener, config: AppConfig) -> anyhow::Result<()> {
    debug!(?config, "Server configuration loaded");
    info!(
        maps = %config.services.maps.api_url,
        equipment = %config.services.equipment.api_url,
        email = %config.services.email.api_url,
        auth_enabled = config.auth.enabled,
        "Composing downstream services."
    );

    let app_state = build_app_state(config).await?;
    let app = create_router(app_state);

    info!("Transit composite service listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Transit composite service stopped.");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
        // Without a signal handler, keep serving until the process is killed.
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received; draining connections.");
}

/// Entry point of the `server` binary.
///
/// Loads `.env`, installs the compact `tracing` subscriber (filtered by
/// `RUST_LOG`), reads the layered configuration and binds `0.0.0.0:{port}`.
pub async fn start() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = get_config(None)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    run(listener, config).await
}
