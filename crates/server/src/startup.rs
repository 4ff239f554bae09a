use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::{markers::MarkerStore, runtime};

/// Any origin may call the API.
pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// `config.toml` (or `CONFIG_PATH`) when present, else env vars over defaults.
pub fn load_config() -> Result<AppConfig, StartupError> {
    AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    cfg.server
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address {}: {e}", cfg.server.bind_addr())))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Build the app and run the HTTP server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let frontend_dir = cfg.storage.frontend_dir.clone();
    let markers_file = cfg.storage.markers_file.clone();
    runtime::ensure_env(&frontend_dir, &markers_file).await?;

    let store = MarkerStore::new(&markers_file)
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    // a broken file is reported now but only fails the requests that touch it
    match store.list().await {
        Ok(map) => info!(path = %store.path().display(), count = map.len(), "markers file ready"),
        Err(e) => warn!(path = %store.path().display(), error = %e, "markers file unreadable"),
    }

    let state = ServerState::new(store);
    let app: Router = routes::build_router(state, build_cors(), &frontend_dir);

    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Any(anyhow::anyhow!("cannot bind {addr}: {e}")))?;
    info!(%addr, "garden map server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    Ok(())
}
