//! Server assembly and lifecycle.
//!
//! [`app`] builds the complete service without binding a socket, so tests
//! can drive it with `tower::ServiceExt::oneshot`. [`serve`] runs it until
//! Ctrl+C or SIGTERM and then drains the store.

use crate::config::Config;
use crate::router::todo_router;
use crate::TodoStore;
use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::io;
use todo_store_web::correlation_id_layer;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Build the full application router.
///
/// Adds `GET /metrics` when a Prometheus handle is given. Every route gets
/// correlation ids, request tracing and permissive CORS.
pub fn app(store: TodoStore, metrics: Option<PrometheusHandle>) -> Router {
    let mut router = todo_router(store);

    if let Some(handle) = metrics {
        router = router.route(
            "/metrics",
            get(move || {
                let handle = handle.clone();
                async move { handle.render() }
            }),
        );
    }

    router
        .layer(correlation_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve `app` on `listener` until a shutdown signal, then drain the store.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve(
    listener: TcpListener,
    store: TodoStore,
    metrics: Option<PrometheusHandle>,
    config: &Config,
) -> io::Result<()> {
    let address = listener.local_addr()?;
    info!(%address, "Backend listening");
    info!("  GET    /list          - List todos");
    info!("  POST   /add           - Add todo");
    info!("  POST   /toggle        - Toggle todo");
    info!("  GET    /health        - Liveness probe");
    info!("  GET    /health/ready  - Store health");
    if metrics.is_some() {
        info!("  GET    /metrics       - Prometheus metrics");
    }

    axum::serve(listener, app(store.clone(), metrics))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped, draining store");
    match store.shutdown(config.shutdown_duration()).await {
        Ok(()) => info!("Graceful shutdown complete"),
        Err(error) => warn!(%error, "Store did not drain before the shutdown timeout"),
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            warn!(%error, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            },
            Err(error) => {
                warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        () = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}
