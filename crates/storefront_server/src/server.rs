//! Listener lifecycle.

use axum::Router;
use std::future::Future;
use storefront_error::{ServerError, ServerErrorKind, StorefrontResult};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, instrument, warn};

/// Bind `address` and serve `router` until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server loop fails.
#[instrument(skip(router))]
pub async fn serve(router: Router, address: &str) -> StorefrontResult<()> {
    let listener = TcpListener::bind(address).await.map_err(|e| {
        ServerError::new(ServerErrorKind::Bind {
            address: address.to_string(),
            reason: e.to_string(),
        })
    })?;
    serve_with_shutdown(router, listener, shutdown_signal()).await
}

/// Serve `router` on an already bound listener until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server loop fails.
pub async fn serve_with_shutdown<F>(
    router: Router,
    listener: TcpListener,
    shutdown: F,
) -> StorefrontResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    match listener.local_addr() {
        Ok(addr) => info!(%addr, "Storefront API listening"),
        Err(e) => warn!(error = %e, "Listening on unknown address"),
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())))?;

    info!("Storefront API stopped");
    Ok(())
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install signal handler");
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
}
