//! Liveness endpoint for uptime probes.
//!
//! `GET /` answers 200 with an empty body. It shares nothing with the
//! routing engine.

use std::net::SocketAddr;

use anyhow::Context;
use axum::routing::get;
use axum::Router;
use tracing::info;

/// Build the liveness router.
pub fn build_router() -> Router {
    Router::new().route("/", get(liveness_handler))
}

async fn liveness_handler() -> &'static str {
    ""
}

/// Serve the liveness router on `0.0.0.0:{port}` until the task is dropped.
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails.
pub async fn serve(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind liveness endpoint on {addr}"))?;
    info!(%addr, "liveness endpoint listening");
    axum::serve(listener, build_router())
        .await
        .context("liveness server failed")
}
