//! HTTP Server - Bind, Serve, Graceful Shutdown
//!
//! Serves the ledger router until the shutdown future resolves. On
//! shutdown, readiness flips to 503 before the listener stops.

use std::future::Future;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use super::routes::{AppState, router};

/// Serve the API on `bind_address` until `shutdown` resolves.
#[instrument(skip(state, shutdown))]
pub async fn serve<F>(state: AppState, bind_address: &str, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let ready = state.ready.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    info!(address = %bind_address, "Ledger API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            ready.store(false, Ordering::Relaxed);
            info!("Shutdown signal received, draining requests");
        })
        .await
        .context("HTTP server failed")?;

    info!("Ledger API stopped");
    Ok(())
}
