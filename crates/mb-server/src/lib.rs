//! mb-server: HTTP API for browsing and streaming a media directory.
//!
//! This crate exposes the media root over HTTP. It provides:
//!
//! - Directory listings with per-entry classification and metadata
//! - Range-aware byte streaming for inline playback
//! - Whole-file downloads as attachments
//! - Graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod listing;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod sandbox;

use std::net::SocketAddr;

use mb_core::config::Config;

use crate::context::AppContext;

/// Start the mediabrowse server.
///
/// Opens the media root, builds the [`AppContext`] and serves until a
/// shutdown signal is received.
pub async fn start(config: Config) -> mb_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| mb_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let ctx = AppContext::new(config)?;
    tracing::info!("Serving media from {}", ctx.root.path().display());

    let app = router::build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| mb_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
