//! HTTP server for dataprepper.
//!
//! An axum REST API over the core: every operation is a `POST` taking a
//! multipart body (a `file` part with the CSV upload plus text fields) and
//! an optional `rows` query parameter bounding the returned preview.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  HTTP layer (axum handlers)                  │
//! │  - multipart parsing, field decoding         │
//! │  - JSON responses, error mapping             │
//! └──────────────────────┬───────────────────────┘
//!                        │ spawn_blocking
//! ┌──────────────────────▼───────────────────────┐
//! │  Core: ops, lifecycle, diagnostics           │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Failures come back as `{"code", "message"}` with status 400 for caller
//! errors and 500 otherwise.

pub mod dto;
pub mod error;
pub mod form;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;

use crate::config::AppConfig;
use anyhow::Context as _;
use std::net::SocketAddr;

/// Bind the configured address and serve until Ctrl-C.
///
/// Also runs a background sweep of idle sessions and cached drops every
/// `storage.purge_interval_secs`.
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let state = AppState::new(config);
    let purge = spawn_purge_task(state.clone());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    purge.abort();
    tracing::info!("Server stopped");
    Ok(())
}

/// Periodically drop expired sessions and cache entries.
pub fn spawn_purge_task(state: AppState) -> tokio::task::JoinHandle<()> {
    let period = state.config.storage.purge_interval();
    tokio::spawn(async move {
        if period.is_zero() {
            return;
        }
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match state.purge_expired() {
                Ok((0, 0)) => {}
                Ok((sessions, drops)) => tracing::info!(
                    "Purged {} idle session(s) and {} cached drop(s)",
                    sessions,
                    drops
                ),
                Err(e) => tracing::error!("Purge failed: {}", e),
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
