//! Web server setup and routing

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::api;
use crate::state::AppState;
use crate::ws;

/// Run the web server until a shutdown signal arrives
pub async fn run(state: Arc<AppState>, bind: &str) -> Result<()> {
    let app = Router::new()
        // API routes
        .route("/api/controllers", get(api::list_controllers))
        .route("/api/controllers/{id}/rumble", post(api::set_rumble))
        .route("/api/controllers/{id}/reset_pose", post(api::reset_pose))
        // WebSocket for frames and events
        .route("/ws", get(ws::websocket_handler))
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // State
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(address = %bind, "Starting web server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Received shutdown signal, stopping service");
}
