//! TrustHire gateway binary.
//!
//! - Strict YAML config (`$TRUSTHIRE_CONFIG` or `trusthire.yaml`)
//! - Request metrics recorded for every request
//! - Graceful shutdown on Ctrl-C (`/readyz` reports draining)

use std::process::ExitCode;

use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

use trusthire_core::error::{Result, TrustHireError};
use trusthire_gateway::{app_state::AppState, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, code = e.client_code().as_str(), "trusthire-gateway failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cfg = config::load()?;
    let listen = cfg.gateway.listen_addr()?;
    tracing::info!(
        name = %cfg.app.name,
        version = %cfg.app.version,
        environment = ?cfg.app.environment,
        "configuration loaded"
    );

    let state = AppState::new(cfg);
    let app = router::build_router(state.clone());

    let listener = TcpListener::bind(listen)
        .await
        .map_err(|e| TrustHireError::Internal(format!("bind {listen} failed: {e}")))?;
    tracing::info!(%listen, "trusthire-gateway starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| TrustHireError::Internal(format!("server failed: {e}")))?;

    tracing::info!("trusthire-gateway stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable, running until killed");
        std::future::pending::<()>().await;
    }
    state.set_draining();
    tracing::info!("shutdown signal received, draining");
}
