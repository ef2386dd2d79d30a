pub mod error;
pub mod handlers;
pub mod state;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::{error, info};

use state::ApiState;

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/webhook", post(handlers::webhook::receive))
        .route("/heartBeat", get(handlers::heartbeat::alive))
        .with_state(state)
}

pub async fn serve(state: Arc<ApiState>, port: u16) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Webhook listener ready on port {}", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Webhook listener stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
